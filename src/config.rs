//! Criteria files.
//!
//! A criteria file pre-selects filter and sort options. It is YAML; JSON
//! files such as the scraper's `scrape_config.json` parse too, since JSON
//! is a YAML subset. Keys the file does not recognise (`vtype`, `model`,
//! `pages`, ...) are ignored.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

use crate::filter::{FilterCriteria, parse_bound};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CriteriaFile {
    search: Option<String>,
    make: Option<String>,
    city: Option<String>,
    min_price: Option<Value>,
    max_price: Option<Value>,
    date_from: Option<String>,
    date_to: Option<String>,
    sort: Option<String>,
}

/// Filter criteria plus the sort key name, if the file names one. The key is
/// kept as text so an unrecognised name can fall back to input order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CriteriaConfig {
    pub criteria: FilterCriteria,
    pub sort: Option<String>,
}

pub fn load_criteria(path: &Path) -> Result<CriteriaConfig> {
    let file = File::open(path).with_context(|| format!("Opening criteria file {path:?}"))?;
    let raw: CriteriaFile = serde_yaml::from_reader(BufReader::new(file))
        .with_context(|| format!("Parsing criteria file {path:?}"))?;
    Ok(raw.into_config())
}

pub fn parse_criteria(text: &str) -> Result<CriteriaConfig> {
    let raw: CriteriaFile = serde_yaml::from_str(text).context("Parsing criteria")?;
    Ok(raw.into_config())
}

impl CriteriaFile {
    fn into_config(self) -> CriteriaConfig {
        CriteriaConfig {
            criteria: FilterCriteria {
                search: non_empty(self.search),
                make: non_empty(self.make),
                city: non_empty(self.city),
                min_price: self.min_price.as_ref().and_then(bound_from_yaml),
                max_price: self.max_price.as_ref().and_then(bound_from_yaml),
                date_from: non_empty(self.date_from),
                date_to: non_empty(self.date_to),
            },
            sort: non_empty(self.sort),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn bound_from_yaml(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64().filter(|n| n.is_finite()),
        Value::String(text) => parse_bound(text),
        _ => None,
    }
}
