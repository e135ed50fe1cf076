use serde::{Deserialize, Serialize};

use crate::listing::NormalizedListing;

const ANY: &str = "any";

/// User-selected constraints. Every field is optional; `None`, an empty
/// string and `"any"` all mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub make: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
}

impl FilterCriteria {
    /// Lower-cased search tokens, split on whitespace.
    pub fn search_tokens(&self) -> Vec<String> {
        self.search
            .as_deref()
            .unwrap_or("")
            .split_whitespace()
            .map(str::to_lowercase)
            .collect()
    }

    pub fn make_prefix(&self) -> Option<String> {
        selection(self.make.as_deref()).map(|make| format!("{} ", make.to_lowercase()))
    }

    pub fn city(&self) -> Option<&str> {
        selection(self.city.as_deref())
    }

    pub fn min_price(&self) -> Option<f64> {
        self.min_price.filter(|bound| bound.is_finite())
    }

    pub fn max_price(&self) -> Option<f64> {
        self.max_price.filter(|bound| bound.is_finite())
    }

    pub fn date_from(&self) -> Option<&str> {
        self.date_from.as_deref().filter(|bound| !bound.is_empty())
    }

    pub fn date_to(&self) -> Option<&str> {
        self.date_to.as_deref().filter(|bound| !bound.is_empty())
    }

    /// Overlays every constraint that `other` sets on top of `self`.
    pub fn merged_with(mut self, other: &FilterCriteria) -> Self {
        if other.search.is_some() {
            self.search = other.search.clone();
        }
        if other.make.is_some() {
            self.make = other.make.clone();
        }
        if other.city.is_some() {
            self.city = other.city.clone();
        }
        if other.min_price.is_some() {
            self.min_price = other.min_price;
        }
        if other.max_price.is_some() {
            self.max_price = other.max_price;
        }
        if other.date_from.is_some() {
            self.date_from = other.date_from.clone();
        }
        if other.date_to.is_some() {
            self.date_to = other.date_to.clone();
        }
        self
    }
}

// Blank and "any" are checked trimmed; the value itself is used as given.
fn selection(value: Option<&str>) -> Option<&str> {
    value.filter(|v| {
        let v = v.trim();
        !v.is_empty() && !v.eq_ignore_ascii_case(ANY)
    })
}

/// Parses a user-entered price bound. Empty or unparseable text is no bound,
/// never zero.
pub fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|bound| bound.is_finite())
}

/// Applies every constraint in `criteria`, preserving input order.
pub fn filter_listings(
    records: &[NormalizedListing],
    criteria: &FilterCriteria,
) -> Vec<NormalizedListing> {
    let tokens = criteria.search_tokens();
    let make_prefix = criteria.make_prefix();
    let city = criteria.city();
    let min_price = criteria.min_price();
    let max_price = criteria.max_price();
    let date_from = criteria.date_from();
    let date_to = criteria.date_to();

    records
        .iter()
        .filter(|listing| listing.is_usable())
        .filter(|listing| match &make_prefix {
            Some(prefix) => listing.title.to_lowercase().starts_with(prefix.as_str()),
            None => true,
        })
        .filter(|listing| city.is_none_or(|city| listing.location == city))
        .filter(|listing| {
            if tokens.is_empty() {
                return true;
            }
            let title = listing.title.to_lowercase();
            tokens.iter().all(|token| title.contains(token.as_str()))
        })
        .filter(|listing| match (min_price, listing.price) {
            (Some(min), Some(price)) => price >= min,
            _ => true,
        })
        .filter(|listing| match (max_price, listing.price) {
            (Some(max), Some(price)) => price <= max,
            _ => true,
        })
        .filter(|listing| date_from.is_none_or(|from| listing.date_key.as_str() >= from))
        .filter(|listing| date_to.is_none_or(|to| listing.date_key.as_str() <= to))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn listing(title: &str, price: Option<f64>, location: &str, date: &str) -> NormalizedListing {
        NormalizedListing {
            title: title.to_string(),
            price,
            date_key: date.to_string(),
            scrape_date_key: String::new(),
            mileage: None,
            location: location.to_string(),
            link: None,
        }
    }

    fn sample() -> Vec<NormalizedListing> {
        vec![
            listing("Toyota Aqua 2014", Some(3_200_000.0), "Colombo", "2024-01-05"),
            listing("Honda Fit 2015", Some(4_500_000.0), "Kandy", "2024-01-06"),
            listing("Toyota Vitz 2018", Some(5_100_000.0), "Colombo", "2024-01-09"),
            listing("Used Toyota Premio", Some(6_000_000.0), "Galle", "2024-01-07"),
            listing("Suzuki Alto", None, "Colombo", "2024-01-05"),
            listing("Nissan Leaf", Some(2_900_000.0), "Kandy", ""),
        ]
    }

    fn titles(records: &[NormalizedListing]) -> Vec<&str> {
        records.iter().map(|l| l.title.as_str()).collect()
    }

    #[test]
    fn unusable_records_are_always_dropped() {
        let filtered = filter_listings(&sample(), &FilterCriteria::default());
        assert_eq!(
            titles(&filtered),
            vec![
                "Toyota Aqua 2014",
                "Honda Fit 2015",
                "Toyota Vitz 2018",
                "Used Toyota Premio"
            ]
        );
    }

    #[test]
    fn make_matches_only_the_first_word() {
        let criteria = FilterCriteria {
            make: Some("TOYOTA".into()),
            ..Default::default()
        };
        let filtered = filter_listings(&sample(), &criteria);
        assert_eq!(titles(&filtered), vec!["Toyota Aqua 2014", "Toyota Vitz 2018"]);
    }

    #[test]
    fn any_make_and_city_are_ignored() {
        let criteria = FilterCriteria {
            make: Some("Any".into()),
            city: Some("any".into()),
            ..Default::default()
        };
        assert_eq!(filter_listings(&sample(), &criteria).len(), 4);
    }

    #[test]
    fn city_is_case_sensitive() {
        let criteria = FilterCriteria {
            city: Some("colombo".into()),
            ..Default::default()
        };
        assert!(filter_listings(&sample(), &criteria).is_empty());
        let criteria = FilterCriteria {
            city: Some("Colombo".into()),
            ..Default::default()
        };
        assert_eq!(filter_listings(&sample(), &criteria).len(), 2);
    }

    #[test]
    fn city_padding_is_not_trimmed_away() {
        let criteria = FilterCriteria {
            city: Some(" Colombo".into()),
            ..Default::default()
        };
        assert!(filter_listings(&sample(), &criteria).is_empty());
        let criteria = FilterCriteria {
            city: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(filter_listings(&sample(), &criteria).len(), 4);
    }

    #[test]
    fn search_tokens_are_and_combined() {
        let criteria = FilterCriteria {
            search: Some("  toyota   20 ".into()),
            ..Default::default()
        };
        let filtered = filter_listings(&sample(), &criteria);
        assert_eq!(titles(&filtered), vec!["Toyota Aqua 2014", "Toyota Vitz 2018"]);
    }

    #[test]
    fn price_and_date_bounds_are_inclusive() {
        let criteria = FilterCriteria {
            min_price: Some(3_200_000.0),
            max_price: Some(5_100_000.0),
            date_from: Some("2024-01-06".into()),
            date_to: Some("2024-01-09".into()),
            ..Default::default()
        };
        let filtered = filter_listings(&sample(), &criteria);
        assert_eq!(titles(&filtered), vec!["Honda Fit 2015", "Toyota Vitz 2018"]);
    }

    #[test]
    fn empty_and_invalid_bounds_mean_no_bound() {
        assert_eq!(parse_bound(""), None);
        assert_eq!(parse_bound("abc"), None);
        assert_eq!(parse_bound(" 1500000 "), Some(1_500_000.0));
        let criteria = FilterCriteria {
            min_price: Some(f64::NAN),
            max_price: Some(f64::INFINITY),
            date_from: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(filter_listings(&sample(), &criteria).len(), 4);
    }

    #[test]
    fn merge_prefers_explicit_values() {
        let base = FilterCriteria {
            make: Some("Toyota".into()),
            min_price: Some(1.0),
            ..Default::default()
        };
        let overlay = FilterCriteria {
            min_price: Some(2.0),
            city: Some("Kandy".into()),
            ..Default::default()
        };
        let merged = base.merged_with(&overlay);
        assert_eq!(merged.make.as_deref(), Some("Toyota"));
        assert_eq!(merged.city.as_deref(), Some("Kandy"));
        assert_eq!(merged.min_price, Some(2.0));
    }

    fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
        (
            proptest::option::of(prop_oneof![Just("toyota"), Just("fit 2015"), Just("a")]),
            proptest::option::of(prop_oneof![Just("Toyota"), Just("Honda"), Just("any")]),
            proptest::option::of(prop_oneof![Just("Colombo"), Just("Kandy")]),
            proptest::option::of(0.0f64..7_000_000.0),
            proptest::option::of(0.0f64..7_000_000.0),
            proptest::option::of(prop_oneof![Just("2024-01-05"), Just("2024-01-07")]),
            proptest::option::of(prop_oneof![Just("2024-01-06"), Just("2024-01-09")]),
        )
            .prop_map(|(search, make, city, min, max, from, to)| FilterCriteria {
                search: search.map(str::to_string),
                make: make.map(str::to_string),
                city: city.map(str::to_string),
                min_price: min,
                max_price: max,
                date_from: from.map(str::to_string),
                date_to: to.map(str::to_string),
            })
    }

    fn split_criteria(criteria: &FilterCriteria) -> Vec<FilterCriteria> {
        vec![
            FilterCriteria {
                search: criteria.search.clone(),
                ..Default::default()
            },
            FilterCriteria {
                make: criteria.make.clone(),
                ..Default::default()
            },
            FilterCriteria {
                city: criteria.city.clone(),
                ..Default::default()
            },
            FilterCriteria {
                min_price: criteria.min_price,
                max_price: criteria.max_price,
                ..Default::default()
            },
            FilterCriteria {
                date_from: criteria.date_from.clone(),
                date_to: criteria.date_to.clone(),
                ..Default::default()
            },
        ]
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(criteria in criteria_strategy()) {
            let once = filter_listings(&sample(), &criteria);
            let twice = filter_listings(&once, &criteria);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn constraints_commute(criteria in criteria_strategy(), rotation in 0usize..5) {
            let combined = filter_listings(&sample(), &criteria);
            let mut parts = split_criteria(&criteria);
            parts.rotate_left(rotation);
            parts.reverse();
            let mut stepwise = sample();
            for part in &parts {
                stepwise = filter_listings(&stepwise, part);
            }
            prop_assert_eq!(combined, stepwise);
        }
    }
}
