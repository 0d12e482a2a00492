use std::num::NonZeroU32;
use std::path::Path;

use crate::core::registry::SignalRegistry;
use crate::core::signal::Signal;
use crate::parsing::{read_text_file, ParseError};
use crate::utils::validation::{check_signal_limit, normalize_multiplicity};

/// Parse a TSV/CSV file with columns: shift, [multiplicity], [intensity], [equivalences]
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_tsv_file(
    path: &Path,
    delimiter: char,
    nucleus: &str,
) -> Result<SignalRegistry, ParseError> {
    let content = read_text_file(path)?;
    parse_tsv_text(&content, delimiter, nucleus)
}

/// Parse TSV/CSV text with columns: shift, [multiplicity], [intensity], [equivalences]
///
/// Empty optional cells are left unset; `-` also stands for "no multiplicity".
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if a line has an unparsable value or no
/// signals are found, or `ParseError::TooManySignals` if the limit is exceeded.
pub fn parse_tsv_text(
    text: &str,
    delimiter: char,
    nucleus: &str,
) -> Result<SignalRegistry, ParseError> {
    let mut signals = Vec::new();
    let mut first_data_line = true;

    for (i, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let fields: Vec<&str> = line.split(delimiter).map(str::trim).collect();

        // Check if first non-empty/non-comment line is a header
        if first_data_line {
            first_data_line = false;
            let first = fields.first().map(|s| s.to_lowercase()).unwrap_or_default();
            if first == "shift" || first == "delta" || first == "ppm" {
                continue;
            }
        }

        // Line numbers in errors are 1-based for user friendliness
        let line_num = i + 1;

        let shift = fields[0]
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid shift on line {}: '{}'",
                    line_num, fields[0]
                ))
            })?;
        let mut signal = Signal::one_dimensional(nucleus, shift);

        if let Some(multiplicity) = fields.get(1).and_then(|m| normalize_multiplicity(m)) {
            signal = signal.with_multiplicity(multiplicity);
        }

        if let Some(intensity) = fields.get(2).filter(|s| !s.is_empty()) {
            let intensity: f64 = intensity.parse().map_err(|_| {
                ParseError::InvalidFormat(format!(
                    "Invalid intensity on line {line_num}: '{intensity}'"
                ))
            })?;
            signal = signal.with_intensity(intensity);
        }

        if let Some(count) = fields.get(3).filter(|s| !s.is_empty()) {
            let count = count
                .parse::<u32>()
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or_else(|| {
                    ParseError::InvalidFormat(format!(
                        "Invalid equivalence count on line {line_num}: '{count}'"
                    ))
                })?;
            signal = signal.with_equivalence_count(count);
        }

        // Check signal limit for DOS protection
        if check_signal_limit(signals.len()).is_some() {
            return Err(ParseError::TooManySignals(signals.len()));
        }

        signals.push(signal);
    }

    if signals.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No signals found in file".to_string(),
        ));
    }

    let mut registry = SignalRegistry::new([nucleus]);
    registry.add_signals(signals)?;
    Ok(registry)
}
