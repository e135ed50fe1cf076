use std::{io::Write, path::Path};

use anyhow::{Context, Result};
use encoding_rs::Encoding;

use crate::{io_utils, listing::NormalizedListing, stats::format_metric};

pub const EXPORT_HEADERS: [&str; 7] = [
    "title",
    "price",
    "date",
    "scrape_date",
    "location",
    "mileage_km",
    "link",
];

pub fn listing_row(listing: &NormalizedListing) -> [String; 7] {
    [
        listing.title.clone(),
        format_metric(listing.price),
        listing.date_key.clone(),
        listing.scrape_date_key.clone(),
        listing.location.clone(),
        format_metric(listing.mileage),
        listing.link.clone().unwrap_or_default(),
    ]
}

/// Serializes listings as CSV text.
pub fn listings_to_csv(listings: &[NormalizedListing]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(EXPORT_HEADERS)
        .context("Writing CSV header")?;
    for listing in listings {
        writer
            .write_record(listing_row(listing))
            .with_context(|| format!("Writing listing '{}'", listing.title))?;
    }
    let bytes = writer.into_inner().context("Finishing CSV output")?;
    String::from_utf8(bytes).context("CSV output is not UTF-8")
}

/// Writes listings as CSV to `path`, or stdout when `path` is `None` or `-`.
pub fn write_listings(
    listings: &[NormalizedListing],
    path: Option<&Path>,
    encoding: &'static Encoding,
) -> Result<()> {
    let text = listings_to_csv(listings)?;
    let encoded = io_utils::encode_text(&text, encoding)?;
    let mut output = io_utils::open_output(path)?;
    output.write_all(&encoded).context("Writing CSV output")?;
    output.flush().context("Flushing CSV output")
}
