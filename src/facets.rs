use std::collections::HashMap;

use crate::listing::NormalizedListing;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    pub value: String,
    pub count: usize,
}

/// Distinct makes, taken as the first word of each usable title. Matching
/// is case-insensitive; the first spelling seen is kept for display.
pub fn make_facets(records: &[NormalizedListing]) -> Vec<Facet> {
    let mut accumulator = FacetAccumulator::default();
    for listing in records.iter().filter(|l| l.is_usable()) {
        if let Some(make) = listing.title.split_whitespace().next() {
            accumulator.ingest(&make.to_lowercase(), make);
        }
    }
    accumulator.into_facets()
}

/// Distinct non-empty locations of usable listings, compared exactly.
pub fn city_facets(records: &[NormalizedListing]) -> Vec<Facet> {
    let mut accumulator = FacetAccumulator::default();
    for listing in records.iter().filter(|l| l.is_usable()) {
        if !listing.location.is_empty() {
            accumulator.ingest(&listing.location, &listing.location);
        }
    }
    accumulator.into_facets()
}

pub fn render_rows(name: &str, facets: &[Facet], top: usize) -> Vec<Vec<String>> {
    let total = facets.iter().map(|facet| facet.count).sum::<usize>();
    if total == 0 {
        return Vec::new();
    }
    let limit = if top > 0 { top } else { facets.len() };
    facets
        .iter()
        .take(limit)
        .map(|facet| {
            let percent = (facet.count as f64 / total as f64) * 100.0;
            vec![
                name.to_string(),
                facet.value.clone(),
                facet.count.to_string(),
                format!("{percent:.2}%"),
            ]
        })
        .collect()
}

#[derive(Default)]
struct FacetAccumulator {
    counts: HashMap<String, usize>,
    display: HashMap<String, String>,
}

impl FacetAccumulator {
    fn ingest(&mut self, key: &str, display: &str) {
        *self.counts.entry(key.to_string()).or_insert(0) += 1;
        self.display
            .entry(key.to_string())
            .or_insert_with(|| display.to_string());
    }

    fn into_facets(self) -> Vec<Facet> {
        let Self {
            counts,
            mut display,
        } = self;
        let mut items = counts
            .into_iter()
            .map(|(key, count)| Facet {
                value: display.remove(&key).unwrap_or(key),
                count,
            })
            .collect::<Vec<_>>();
        items.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));
        items
    }
}
