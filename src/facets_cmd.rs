use anyhow::Result;
use log::info;

use crate::{cli::FacetsArgs, facets, load_records, table};

const HEADERS: [&str; 4] = ["facet", "value", "count", "percent"];

pub fn execute(args: &FacetsArgs) -> Result<()> {
    let records = load_records(&args.input)?;
    let makes = facets::make_facets(&records);
    let cities = facets::city_facets(&records);
    let mut rows = facets::render_rows("make", &makes, args.top);
    rows.extend(facets::render_rows("city", &cities, args.top));
    table::print_table(&HEADERS, &rows, &[2, 3]);
    info!(
        "Found {} make(s) and {} city value(s)",
        makes.len(),
        cities.len()
    );
    Ok(())
}
