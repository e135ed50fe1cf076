use anyhow::Result;
use log::{debug, info};

use crate::{
    cli::ListArgs,
    export, filter, io_utils,
    listing::NormalizedListing,
    load_records, resolve_criteria,
    sort::{self, SortKey},
    stats::format_metric,
    table,
};

const HEADERS: [&str; 5] = ["title", "price", "date", "location", "mileage_km"];
const NUMERIC_COLUMNS: [usize; 2] = [1, 4];

pub fn execute(args: &ListArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let resolved = resolve_criteria(&args.filter)?;
    let sort_name = args
        .sort
        .clone()
        .or(resolved.sort)
        .unwrap_or_else(|| SortKey::default().to_string());

    let filtered = filter::filter_listings(&records, &resolved.criteria);
    let sorted = sort::sort_listings_by_name(&filtered, &sort_name);
    info!(
        "Retained {} of {} listing(s), sorted by {}",
        sorted.len(),
        records.len(),
        sort_name
    );

    if let Some(path) = args.output.as_deref() {
        let encoding = io_utils::resolve_encoding(args.output_encoding.as_deref())?;
        export::write_listings(&sorted, Some(path), encoding)?;
        if !io_utils::is_dash(path) {
            info!("Wrote {} listing(s) to {path:?}", sorted.len());
        }
        return Ok(());
    }

    let shown = if args.limit > 0 {
        &sorted[..sorted.len().min(args.limit)]
    } else {
        &sorted[..]
    };
    if shown.len() < sorted.len() {
        debug!("Showing first {} of {} listing(s)", shown.len(), sorted.len());
    }
    let rows = shown.iter().map(table_row).collect::<Vec<_>>();
    table::print_table(&HEADERS, &rows, &NUMERIC_COLUMNS);
    Ok(())
}

fn table_row(listing: &NormalizedListing) -> Vec<String> {
    vec![
        listing.title.clone(),
        format_metric(listing.price),
        listing.date_key.clone(),
        listing.location.clone(),
        format_metric(listing.mileage),
    ]
}
