//! Chart data preparation.
//!
//! The preparer picks a view from the number of distinct calendar days in
//! the input: two or more days give a time series (raw points plus a daily
//! median line), fewer give a fixed-width price histogram. No priced, dated
//! points at all gives [`ChartPreparation::Empty`].

use std::{collections::BTreeSet, fmt, str::FromStr};

use anyhow::{Result, anyhow};
use chrono::{Days, NaiveDate};
use clap::ValueEnum;
use itertools::Itertools;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{listing::NormalizedListing, stats::median_sorted};

pub const HISTOGRAM_BIN_WIDTH: f64 = 250_000.0;
/// Upper limit on histogram bins; outlying prices share the last bin.
pub const MAX_HISTOGRAM_BINS: usize = 400;
const LABEL_DIVISOR: f64 = 1_000_000.0;
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Which date on a listing positions it on the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum DateField {
    #[default]
    Posted,
    Scraped,
}

impl DateField {
    fn key<'a>(&self, listing: &'a NormalizedListing) -> &'a str {
        match self {
            DateField::Posted => &listing.date_key,
            DateField::Scraped => &listing.scrape_date_key,
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            DateField::Posted => "posting",
            DateField::Scraped => "scrape",
        }
    }
}

impl FromStr for DateField {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "posted" | "date" => Ok(DateField::Posted),
            "scraped" | "scrapedate" | "scrape_date" => Ok(DateField::Scraped),
            other => Err(anyhow!("Unknown date field '{other}'")),
        }
    }
}

impl fmt::Display for DateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DateField::Posted => f.write_str("posted"),
            DateField::Scraped => f.write_str("scraped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries {
    pub points: Vec<ChartPoint>,
    pub daily_median: Vec<ChartPoint>,
    /// One day before the earliest date. `None` when the key is not a
    /// well-formed `YYYY-MM-DD` date.
    pub axis_min: Option<NaiveDate>,
    pub axis_max: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    pub bin_width: f64,
    pub bins: Vec<HistogramBin>,
    pub note: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChartPreparation {
    Time(TimeSeries),
    Hist(Histogram),
    Empty,
}

impl ChartPreparation {
    pub fn mode(&self) -> &'static str {
        match self {
            ChartPreparation::Time(_) => "time",
            ChartPreparation::Hist(_) => "hist",
            ChartPreparation::Empty => "empty",
        }
    }
}

pub fn prepare_chart(records: &[NormalizedListing], date_field: DateField) -> ChartPreparation {
    let mut points = records
        .iter()
        .filter_map(|listing| {
            let date = date_field.key(listing);
            match listing.price {
                Some(price) if !date.is_empty() => Some(ChartPoint {
                    date: date.to_string(),
                    price,
                }),
                _ => None,
            }
        })
        .collect::<Vec<_>>();

    if points.is_empty() {
        debug!("No priced listings with a {} date; chart is empty", date_field.describe());
        return ChartPreparation::Empty;
    }

    let distinct_dates = points
        .iter()
        .map(|point| point.date.as_str())
        .collect::<BTreeSet<_>>();
    debug!(
        "{} point(s) across {} distinct {} date(s)",
        points.len(),
        distinct_dates.len(),
        date_field.describe()
    );

    if distinct_dates.len() >= 2 {
        points.sort_by(|a, b| a.date.cmp(&b.date));
        return ChartPreparation::Time(build_time_series(points));
    }

    let only_date = distinct_dates.iter().next().map(|date| date.to_string());
    let note = histogram_note(only_date.as_deref(), date_field);
    let prices = points.iter().map(|point| point.price).collect::<Vec<_>>();
    ChartPreparation::Hist(build_histogram(&prices, note))
}

/// Groups date-sorted points into one median per day and pads the axis by a
/// calendar day on each side.
fn build_time_series(points: Vec<ChartPoint>) -> TimeSeries {
    let daily_median = points
        .iter()
        .chunk_by(|point| point.date.clone())
        .into_iter()
        .filter_map(|(date, group)| {
            let mut prices = group.map(|point| point.price).collect::<Vec<_>>();
            prices.sort_by(f64::total_cmp);
            median_sorted(&prices).map(|price| ChartPoint { date, price })
        })
        .collect::<Vec<_>>();

    let axis_min = points
        .first()
        .and_then(|point| parse_day(&point.date))
        .and_then(|date| date.checked_sub_days(Days::new(1)));
    let axis_max = points
        .last()
        .and_then(|point| parse_day(&point.date))
        .and_then(|date| date.checked_add_days(Days::new(1)));

    TimeSeries {
        points,
        daily_median,
        axis_min,
        axis_max,
    }
}

fn parse_day(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DATE_FORMAT).ok()
}

/// Explains why a histogram is shown instead of a trend.
pub fn histogram_note(only_date: Option<&str>, date_field: DateField) -> String {
    match only_date {
        Some(date) => format!(
            "All listings share one {} day ({date}); showing the price distribution instead of a trend.",
            date_field.describe()
        ),
        None => format!(
            "No usable {} date data; showing the price distribution instead of a trend.",
            date_field.describe()
        ),
    }
}

/// Buckets `prices` into contiguous [`HISTOGRAM_BIN_WIDTH`] bins aligned to
/// multiples of the width.
///
/// At most [`MAX_HISTOGRAM_BINS`] bins are produced. When the prices span
/// more, the bins start at the lowest price and everything beyond the last
/// bin is counted in it; that bin's `end` is raised to cover the highest
/// price.
pub fn build_histogram(prices: &[f64], note: String) -> Histogram {
    let mut sorted = prices
        .iter()
        .copied()
        .filter(|price| price.is_finite())
        .collect::<Vec<_>>();
    sorted.sort_by(f64::total_cmp);

    let (Some(&first), Some(&last)) = (sorted.first(), sorted.last()) else {
        return Histogram {
            bin_width: HISTOGRAM_BIN_WIDTH,
            bins: Vec::new(),
            note,
        };
    };

    let lower = (first / HISTOGRAM_BIN_WIDTH).floor() * HISTOGRAM_BIN_WIDTH;
    let upper = (last / HISTOGRAM_BIN_WIDTH).ceil() * HISTOGRAM_BIN_WIDTH;
    // A lone price on a bin boundary still needs one bin to land in, and
    // prices beyond f64 precision collapse the span to nothing.
    let span_bins = ((upper - lower) / HISTOGRAM_BIN_WIDTH).round();
    let bin_count = if span_bins.is_finite() {
        span_bins.clamp(1.0, MAX_HISTOGRAM_BINS as f64) as usize
    } else {
        MAX_HISTOGRAM_BINS
    };
    if span_bins > MAX_HISTOGRAM_BINS as f64 {
        debug!(
            "Prices span {span_bins} bins; clamping the histogram to {MAX_HISTOGRAM_BINS}"
        );
    }

    let mut bins = (0..bin_count)
        .map(|idx| {
            let start = lower + idx as f64 * HISTOGRAM_BIN_WIDTH;
            HistogramBin {
                start,
                end: start + HISTOGRAM_BIN_WIDTH,
                count: 0,
                label: bin_label(start),
            }
        })
        .collect::<Vec<_>>();

    let last_index = bin_count - 1;
    for price in sorted {
        let index = ((price - lower) / HISTOGRAM_BIN_WIDTH).floor() as usize;
        bins[index.min(last_index)].count += 1;
    }
    if let Some(last_bin) = bins.last_mut()
        && upper > last_bin.end
    {
        last_bin.end = upper;
    }

    Histogram {
        bin_width: HISTOGRAM_BIN_WIDTH,
        bins,
        note,
    }
}

// Halves round up: 250000 is "0.3M".
fn bin_label(start: f64) -> String {
    let millions = (start / LABEL_DIVISOR * 10.0).round() / 10.0;
    format!("{millions:.1}M")
}
