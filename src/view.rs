use std::sync::Arc;

use log::debug;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{
    chart::{ChartPreparation, DateField, prepare_chart},
    filter::{FilterCriteria, filter_listings},
    listing::NormalizedListing,
    sort::{SortKey, sort_listings},
    stats::{PriceSummary, summarize_prices},
};

/// Everything the presentation layer renders for one set of inputs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingView {
    pub listings: Vec<NormalizedListing>,
    pub summary: PriceSummary,
    pub chart: ChartPreparation,
}

impl ListingView {
    /// `sort_key` of `None` keeps the filtered order.
    pub fn build(
        records: &[NormalizedListing],
        criteria: &FilterCriteria,
        sort_key: Option<SortKey>,
        date_field: DateField,
    ) -> Self {
        let filtered = filter_listings(records, criteria);
        let listings = match sort_key {
            Some(key) => sort_listings(&filtered, key),
            None => filtered,
        };
        let summary = summarize_prices(&listings);
        let chart = prepare_chart(&listings, date_field);
        Self {
            listings,
            summary,
            chart,
        }
    }
}

#[derive(Serialize)]
struct ViewKey<'a> {
    records: &'a [NormalizedListing],
    criteria: &'a FilterCriteria,
    sort_key: Option<SortKey>,
    date_field: DateField,
}

type Fingerprint = [u8; 32];

/// Single-entry memo of the last derived view. Any change to the inputs
/// replaces the entry wholesale.
#[derive(Debug, Default)]
pub struct ViewCache {
    entry: Option<(Fingerprint, Arc<ListingView>)>,
    hits: usize,
    misses: usize,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(
        &mut self,
        records: &[NormalizedListing],
        criteria: &FilterCriteria,
        sort_key: Option<SortKey>,
        date_field: DateField,
    ) -> Arc<ListingView> {
        let key = ViewKey {
            records,
            criteria,
            sort_key,
            date_field,
        };
        let Some(fingerprint) = fingerprint(&key) else {
            self.misses += 1;
            return Arc::new(ListingView::build(records, criteria, sort_key, date_field));
        };

        if let Some((cached, view)) = &self.entry
            && *cached == fingerprint
        {
            self.hits += 1;
            debug!("View cache hit ({} hit(s))", self.hits);
            return Arc::clone(view);
        }

        self.misses += 1;
        debug!("View cache miss; recomputing ({} miss(es))", self.misses);
        let view = Arc::new(ListingView::build(records, criteria, sort_key, date_field));
        self.entry = Some((fingerprint, Arc::clone(&view)));
        view
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn misses(&self) -> usize {
        self.misses
    }
}

fn fingerprint(key: &ViewKey<'_>) -> Option<Fingerprint> {
    let encoded = serde_json::to_vec(key).ok()?;
    Some(Sha256::digest(&encoded).into())
}
