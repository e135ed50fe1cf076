use anyhow::Result;
use log::info;

use crate::{cli::StatsArgs, filter, load_records, resolve_criteria, stats, table};

const HEADERS: [&str; 5] = ["column", "count", "min", "max", "median"];

pub fn execute(args: &StatsArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let resolved = resolve_criteria(&args.filter)?;
    let filtered = filter::filter_listings(&records, &resolved.criteria);
    let summary = stats::summarize_prices(&filtered);
    table::print_table(&HEADERS, &summary.render_rows(), &[1, 2, 3, 4]);
    info!(
        "Computed price summary over {} of {} listing(s)",
        summary.count,
        records.len()
    );
    Ok(())
}
