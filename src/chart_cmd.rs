use anyhow::{Context, Result};
use log::info;

use crate::{
    chart::{ChartPreparation, DateField, Histogram, TimeSeries},
    cli::ChartArgs,
    load_records, resolve_criteria,
    stats::format_number,
    table,
    view::ListingView,
};

pub fn execute(args: &ChartArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let resolved = resolve_criteria(&args.filter)?;
    let view = ListingView::build(&records, &resolved.criteria, None, args.date_field);
    info!(
        "Prepared {} chart from {} listing(s) by {} date",
        view.chart.mode(),
        view.listings.len(),
        args.date_field
    );

    if args.json {
        let rendered =
            serde_json::to_string_pretty(&view.chart).context("Serializing chart data")?;
        println!("{rendered}");
        return Ok(());
    }

    match &view.chart {
        ChartPreparation::Time(series) => print_time_series(series),
        ChartPreparation::Hist(histogram) => print_histogram(histogram),
        ChartPreparation::Empty if view.listings.is_empty() => {
            println!("No priced listings to chart.")
        }
        ChartPreparation::Empty => print_missing_dates(args.date_field, view.listings.len()),
    }
    Ok(())
}

fn print_time_series(series: &TimeSeries) {
    let rows = series
        .daily_median
        .iter()
        .map(|day| {
            let listings = series
                .points
                .iter()
                .filter(|point| point.date == day.date)
                .count();
            vec![
                day.date.clone(),
                format_number(day.price),
                listings.to_string(),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["date", "median_price", "listings"], &rows, &[1, 2]);
    let bound = |date: Option<chrono::NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "auto".to_string())
    };
    println!(
        "axis: {} .. {}",
        bound(series.axis_min),
        bound(series.axis_max)
    );
}

fn print_histogram(histogram: &Histogram) {
    let rows = histogram
        .bins
        .iter()
        .map(|bin| {
            vec![
                bin.label.clone(),
                format_number(bin.start),
                format_number(bin.end),
                bin.count.to_string(),
                "#".repeat(bin.count),
            ]
        })
        .collect::<Vec<_>>();
    table::print_table(&["bin", "from", "to", "count", ""], &rows, &[1, 2, 3]);
    println!("note: {}", histogram.note);
}

// Usable listings always carry a posting date, so only the scrape field can
// leave matching listings off the chart.
fn print_missing_dates(date_field: DateField, listings: usize) {
    println!(
        "No usable {} date data on {listings} matching listing(s); nothing to chart.",
        date_field.describe()
    );
    if date_field == DateField::Scraped {
        println!("hint: try --date-field posted");
    }
}
