//! Byte-level I/O helpers shared by the loader and the CSV exporter.
//!
//! - The `-` path convention routes through stdin/stdout.
//! - Text is decoded from and encoded to the requested `encoding_rs`
//!   encoding, defaulting to UTF-8.

use std::{
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow};
use encoding_rs::{Encoding, UTF_8};

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn read_bytes(path: &Path) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    if is_dash(path) {
        io::stdin().lock().read_to_end(&mut buf)?;
    } else {
        File::open(path)?.read_to_end(&mut buf)?;
    }
    Ok(buf)
}

/// Decodes `bytes`, honouring a byte-order mark when present.
pub fn decode_text(bytes: &[u8], encoding: &'static Encoding) -> Option<String> {
    let (text, _, had_errors) = encoding.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

pub fn encode_text(text: &str, encoding: &'static Encoding) -> Result<Vec<u8>> {
    if encoding == UTF_8 {
        return Ok(text.as_bytes().to_vec());
    }
    let (encoded, _, had_errors) = encoding.encode(text);
    if had_errors {
        return Err(anyhow!("Failed to encode output using {}", encoding.name()));
    }
    Ok(encoded.into_owned())
}

pub fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    match path {
        Some(p) if !is_dash(p) => Ok(Box::new(BufWriter::new(
            File::create(p).with_context(|| format!("Creating output file {p:?}"))?,
        ))),
        _ => Ok(Box::new(io::stdout())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_known_and_unknown_labels() {
        assert_eq!(resolve_encoding(None).unwrap(), UTF_8);
        assert_eq!(
            resolve_encoding(Some(" windows-1252 ")).unwrap().name(),
            "windows-1252"
        );
        assert!(resolve_encoding(Some("klingon")).is_err());
    }

    #[test]
    fn latin1_round_trips() {
        let encoding = resolve_encoding(Some("latin1")).unwrap();
        let bytes = encode_text("Café", encoding).unwrap();
        assert_eq!(bytes, vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(decode_text(&bytes, encoding).as_deref(), Some("Café"));
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        assert_eq!(decode_text(&[0x66, 0xFF, 0x6F], UTF_8), None);
    }
}
