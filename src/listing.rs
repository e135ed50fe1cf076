//! Record normalization for raw vehicle listings.
//!
//! Raw listings arrive as loosely shaped JSON objects (`Title`, `Price`,
//! `Location`, `Date`, `ScrapeDate`, `MileageKm`, `Link`). Every entry is
//! coerced into a [`NormalizedListing`]; nothing is rejected here. Entries
//! without a price or posting date survive normalization and are dropped by
//! the filter stage instead (see [`NormalizedListing::is_usable`]).

use serde::{Deserialize, Serialize};
use serde_json::Value;

const DATE_KEY_LEN: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub title: String,
    pub price: Option<f64>,
    pub date_key: String,
    pub scrape_date_key: String,
    pub mileage: Option<f64>,
    pub location: String,
    pub link: Option<String>,
}

impl NormalizedListing {
    /// A listing takes part in filtering, sorting, statistics and charting
    /// only when it has a price and a posting-date key.
    pub fn is_usable(&self) -> bool {
        self.price.is_some() && !self.date_key.is_empty()
    }
}

/// Normalizes a parsed JSON document. Anything other than an array yields an
/// empty sequence.
pub fn normalize_listings(document: &Value) -> Vec<NormalizedListing> {
    match document {
        Value::Array(entries) => entries.iter().map(normalize_listing).collect(),
        _ => Vec::new(),
    }
}

pub fn normalize_listing(raw: &Value) -> NormalizedListing {
    NormalizedListing {
        title: text_field(raw, "Title"),
        price: raw.get("Price").and_then(parse_numeric),
        date_key: raw.get("Date").map(date_key).unwrap_or_default(),
        scrape_date_key: raw.get("ScrapeDate").map(date_key).unwrap_or_default(),
        mileage: raw.get("MileageKm").and_then(parse_numeric),
        location: text_field(raw, "Location"),
        link: raw
            .get("Link")
            .and_then(Value::as_str)
            .map(str::to_string)
            .filter(|link| !link.is_empty()),
    }
}

/// Numbers are taken as-is. Strings keep only their ASCII digits, so
/// `"Rs. 3,200,000"` becomes `3200000` and `"12.5"` becomes `125`.
pub fn parse_numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => parse_numeric_str(text),
        _ => None,
    }
}

pub fn parse_numeric_str(text: &str) -> Option<f64> {
    let digits = text
        .chars()
        .filter(char::is_ascii_digit)
        .collect::<String>();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// First ten characters of a date-like value; no calendar validation.
pub fn date_key(value: &Value) -> String {
    let text = match value {
        Value::String(text) => text.clone(),
        Value::Number(number) => number.to_string(),
        _ => return String::new(),
    };
    text.chars().take(DATE_KEY_LEN).collect()
}

fn text_field(raw: &Value, field: &str) -> String {
    match raw.get(field) {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}
