use serde::{Deserialize, Serialize};

use crate::listing::NormalizedListing;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
}

impl PriceSummary {
    pub fn render_rows(&self) -> Vec<Vec<String>> {
        vec![vec![
            "price".to_string(),
            self.count.to_string(),
            format_metric(self.min),
            format_metric(self.max),
            format_metric(self.median),
        ]]
    }
}

/// Summarizes the prices of `records`, skipping any listing without one.
pub fn summarize_prices(records: &[NormalizedListing]) -> PriceSummary {
    let mut prices = records
        .iter()
        .filter_map(|listing| listing.price)
        .collect::<Vec<_>>();
    prices.sort_by(f64::total_cmp);
    PriceSummary {
        count: prices.len(),
        min: prices.first().copied(),
        max: prices.last().copied(),
        median: median_sorted(&prices),
    }
}

/// Median of an ascending slice. Even-length input averages the two middle
/// values and rounds to the nearest integer.
pub fn median_sorted(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len().is_multiple_of(2) {
        Some(((sorted[mid - 1] + sorted[mid]) / 2.0).round())
    } else {
        Some(sorted[mid])
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    median_sorted(&sorted)
}

pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

pub fn format_metric(metric: Option<f64>) -> String {
    metric.map(format_number).unwrap_or_default()
}
