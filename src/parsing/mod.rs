//! Parsers that turn external records into registries and assignments.
//!
//! This module provides parsers for:
//!
//! - **NMRShiftDB spectrum strings**: `shift;intensity[multiplicity];atomIndex|...`,
//!   producing a registry and the matching assignment
//! - **TSV/CSV signal tables**: one signal per row with shift, multiplicity,
//!   intensity and an optional equivalence count
//!
//! Files ending in `.gz` are decompressed transparently.
//!
//! ## Example
//!
//! ```rust
//! use signal_registry::parsing::nmrshiftdb::parse_spectrum_text;
//!
//! let data_set = parse_spectrum_text("17.6;0.0Q;9|18.3;0.0Q;3|28.8;0.0T;5", "13C").unwrap();
//! assert_eq!(data_set.registry().signal_count(), 3);
//! assert_eq!(data_set.assignment().indices(0, 3).unwrap(), vec![1]);
//! ```

use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use thiserror::Error;

use crate::core::types::RegistryError;
use crate::utils::validation::{validate_text_content, MAX_SIGNALS};

pub mod nmrshiftdb;
pub mod tsv;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid signal record: {0}")]
    InvalidFormat(String),

    #[error("Too many signals: {0} exceeds maximum allowed ({MAX_SIGNALS})")]
    TooManySignals(usize),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Read a text input, decompressing it if the path ends in `.gz`
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or
/// `ParseError::InvalidFormat` if the content is empty or not text.
pub fn read_text_file(path: &Path) -> Result<String, ParseError> {
    let is_gzipped = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("gz"));

    let mut bytes = Vec::new();
    let file = std::fs::File::open(path)?;
    if is_gzipped {
        GzDecoder::new(file).read_to_end(&mut bytes)?;
    } else {
        std::io::BufReader::new(file).read_to_end(&mut bytes)?;
    }

    validate_text_content(&bytes)
        .map_err(|e| ParseError::InvalidFormat(format!("{}: {e}", path.display())))?;
    String::from_utf8(bytes).map_err(|e| ParseError::InvalidFormat(e.to_string()))
}
