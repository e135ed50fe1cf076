use std::{cmp::Ordering, fmt, str::FromStr};

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::listing::NormalizedListing;

const MISSING_MILEAGE_LOW: f64 = -1.0;
const MISSING_MILEAGE_HIGH: f64 = f64::INFINITY;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    DateDesc,
    DateAsc,
    PriceDesc,
    PriceAsc,
    MileageAsc,
    MileageDesc,
}

impl SortKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateDesc => "date_desc",
            SortKey::DateAsc => "date_asc",
            SortKey::PriceDesc => "price_desc",
            SortKey::PriceAsc => "price_asc",
            SortKey::MileageAsc => "mileage_asc",
            SortKey::MileageDesc => "mileage_desc",
        }
    }

    pub fn compare(&self, a: &NormalizedListing, b: &NormalizedListing) -> Ordering {
        match self {
            SortKey::DateDesc => b
                .date_key
                .cmp(&a.date_key)
                .then_with(|| price(b).total_cmp(&price(a))),
            SortKey::DateAsc => a
                .date_key
                .cmp(&b.date_key)
                .then_with(|| price(a).total_cmp(&price(b))),
            SortKey::PriceDesc => price(b).total_cmp(&price(a)),
            SortKey::PriceAsc => price(a).total_cmp(&price(b)),
            SortKey::MileageDesc => mileage_or(b, MISSING_MILEAGE_LOW)
                .total_cmp(&mileage_or(a, MISSING_MILEAGE_LOW)),
            SortKey::MileageAsc => mileage_or(a, MISSING_MILEAGE_HIGH)
                .total_cmp(&mileage_or(b, MISSING_MILEAGE_HIGH)),
        }
    }
}

impl FromStr for SortKey {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "date_desc" => Ok(SortKey::DateDesc),
            "date_asc" => Ok(SortKey::DateAsc),
            "price_desc" => Ok(SortKey::PriceDesc),
            "price_asc" => Ok(SortKey::PriceAsc),
            "mileage_asc" => Ok(SortKey::MileageAsc),
            "mileage_desc" => Ok(SortKey::MileageDesc),
            other => Err(anyhow!("Unknown sort key '{other}'")),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Usable listings always carry a price; zero keeps the comparator total
// for callers that sort unfiltered records.
fn price(listing: &NormalizedListing) -> f64 {
    listing.price.unwrap_or(0.0)
}

fn mileage_or(listing: &NormalizedListing, missing: f64) -> f64 {
    listing.mileage.unwrap_or(missing)
}

/// Returns a new sequence ordered by `key`. Equal keys keep their input
/// order.
pub fn sort_listings(records: &[NormalizedListing], key: SortKey) -> Vec<NormalizedListing> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Sorts by a key name as selected in the presentation layer. An unknown
/// name leaves the order unchanged.
pub fn sort_listings_by_name(records: &[NormalizedListing], name: &str) -> Vec<NormalizedListing> {
    match name.parse::<SortKey>() {
        Ok(key) => sort_listings(records, key),
        Err(err) => {
            debug!("{err}; keeping input order");
            records.to_vec()
        }
    }
}
