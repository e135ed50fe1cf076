//! Loading the raw listings document.
//!
//! This is the boundary in front of the normalizer: it turns a file (or
//! stdin) into a parsed JSON value. Failures are reported to the user as a
//! [`SourceError`] and never reach the core as records.

use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use log::debug;
use serde_json::Value;
use thiserror::Error;

use crate::{
    io_utils,
    listing::{NormalizedListing, normalize_listings},
};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Reading listings from {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Listings in {path:?} are not valid {encoding} text")]
    Decode {
        path: PathBuf,
        encoding: &'static str,
    },
    #[error("Parsing listings JSON from {path:?}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Expected a JSON array of listings in {path:?}, found {found}")]
    NotAnArray { path: PathBuf, found: &'static str },
}

pub fn load_document(
    path: &Path,
    encoding: &'static Encoding,
    strict: bool,
) -> Result<Value, SourceError> {
    let bytes = io_utils::read_bytes(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = io_utils::decode_text(&bytes, encoding).ok_or_else(|| SourceError::Decode {
        path: path.to_path_buf(),
        encoding: encoding.name(),
    })?;
    let document: Value = serde_json::from_str(&text).map_err(|source| SourceError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    if !document.is_array() {
        if strict {
            return Err(SourceError::NotAnArray {
                path: path.to_path_buf(),
                found: json_kind(&document),
            });
        }
        debug!(
            "Document in {path:?} is a JSON {}; treating it as no listings",
            json_kind(&document)
        );
    }
    Ok(document)
}

pub fn load_listings(
    path: &Path,
    encoding: &'static Encoding,
    strict: bool,
) -> Result<Vec<NormalizedListing>, SourceError> {
    load_document(path, encoding, strict).map(|document| normalize_listings(&document))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
