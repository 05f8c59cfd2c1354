//! JSON and gzip-compressed JSON persistence
//!
//! Gantree: L2_Executable → IO
//!
//! Deserialization goes through the same validation as the builders, so a
//! file cannot smuggle in an executable the builder would reject.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use qecho_core::QechoResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Serialize to pretty JSON
pub fn to_json<T: Serialize>(value: &T) -> QechoResult<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Parse JSON
pub fn from_json<T: DeserializeOwned>(json: &str) -> QechoResult<T> {
    Ok(serde_json::from_str(json)?)
}

/// Write gzip-compressed JSON
/// Gantree: to_json_gzip(value, path) -> Result // .json.gz 저장
pub fn to_json_gzip<T: Serialize>(value: &T, path: impl AsRef<Path>) -> QechoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    serde_json::to_writer(&mut encoder, value)?;
    encoder.finish()?.flush()?;
    log::debug!("wrote {}", path.display());
    Ok(())
}

/// Read gzip-compressed JSON
/// Gantree: from_json_gzip(path) -> Result<T> // .json.gz 로드
pub fn from_json_gzip<T: DeserializeOwned>(path: impl AsRef<Path>) -> QechoResult<T> {
    let file = File::open(path.as_ref())?;
    let decoder = GzDecoder::new(BufReader::new(file));
    Ok(serde_json::from_reader(decoder)?)
}
