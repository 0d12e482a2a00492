use std::path::Path;

use tracing::warn;

use crate::core::dataset::DataSet;
use crate::core::registry::SignalRegistry;
use crate::core::signal::Signal;
use crate::parsing::{read_text_file, ParseError};
use crate::utils::validation::{check_signal_limit, normalize_multiplicity};

/// One `shift;intensity[multiplicity];atomIndex` entry of an NMRShiftDB spectrum
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumRecord {
    pub shift: f64,
    pub intensity: f64,
    pub multiplicity: Option<String>,
    pub atom_index: usize,
}

/// Parse an NMRShiftDB spectrum file (optionally gzipped)
///
/// # Errors
///
/// Returns `ParseError::Io` if the file cannot be read, or other parse errors
/// if the content is invalid.
pub fn parse_spectrum_file(path: &Path, nucleus: &str) -> Result<DataSet, ParseError> {
    let content = read_text_file(path)?;
    parse_spectrum_text(&content, nucleus)
}

/// Split an NMRShiftDB spectrum string into its records
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` if an entry does not have three fields
/// or a field cannot be parsed, or `ParseError::TooManySignals` if the limit
/// is exceeded.
pub fn parse_spectrum_records(text: &str) -> Result<Vec<SpectrumRecord>, ParseError> {
    let mut records = Vec::new();

    for (i, entry) in text.trim().split('|').enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }

        // Entry numbers in errors are 1-based for user friendliness
        let entry_num = i + 1;

        let fields: Vec<&str> = entry.split(';').map(str::trim).collect();
        if fields.len() < 3 {
            return Err(ParseError::InvalidFormat(format!(
                "Entry {entry_num} has fewer than 3 fields: '{entry}'"
            )));
        }

        let shift = fields[0]
            .parse::<f64>()
            .ok()
            .filter(|s| s.is_finite())
            .ok_or_else(|| {
                ParseError::InvalidFormat(format!(
                    "Invalid shift in entry {entry_num}: '{}'",
                    fields[0]
                ))
            })?;

        // Intensity and multiplicity share a field, e.g. "0.0Q" or "12.5"
        let split = fields[1]
            .find(|c: char| c.is_ascii_alphabetic())
            .unwrap_or(fields[1].len());
        let (intensity, multiplicity) = fields[1].split_at(split);
        let intensity: f64 = intensity.trim().parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Invalid intensity in entry {entry_num}: '{}'",
                fields[1]
            ))
        })?;

        let atom_index: usize = fields[2].parse().map_err(|_| {
            ParseError::InvalidFormat(format!(
                "Invalid atom index in entry {entry_num}: '{}'",
                fields[2]
            ))
        })?;

        if check_signal_limit(records.len()).is_some() {
            return Err(ParseError::TooManySignals(records.len()));
        }

        records.push(SpectrumRecord {
            shift,
            intensity,
            multiplicity: normalize_multiplicity(multiplicity),
            atom_index,
        });
    }

    if records.is_empty() {
        return Err(ParseError::InvalidFormat(
            "No signals found in spectrum".to_string(),
        ));
    }

    Ok(records)
}

/// Build a registry and its assignment from an NMRShiftDB spectrum string.
///
/// Every record becomes one signal. Records are then mapped back onto the
/// registry by exact shift and multiplicity; when several signals qualify,
/// the first one receives the atom. Equivalences are detected with zero
/// tolerance afterwards.
///
/// # Errors
///
/// Returns any error from [`parse_spectrum_records`].
pub fn parse_spectrum_text(text: &str, nucleus: &str) -> Result<DataSet, ParseError> {
    let records = parse_spectrum_records(text)?;

    let mut registry = SignalRegistry::new([nucleus]);
    for record in &records {
        let mut signal =
            Signal::one_dimensional(nucleus, record.shift).with_intensity(record.intensity);
        if let Some(multiplicity) = &record.multiplicity {
            signal = signal.with_multiplicity(multiplicity.as_str());
        }
        registry.add_signal(signal)?;
    }
    registry.detect_exact_equivalences();

    let mut data_set = DataSet::new(registry);
    for record in &records {
        let candidates = data_set.registry().matcher().pick_closest_with_multiplicity(
            record.shift,
            0,
            0.0,
            record.multiplicity.as_deref(),
        );
        match candidates.first() {
            Some(&signal_index) => {
                data_set
                    .assignment_mut()
                    .add_assignment_equivalence(0, signal_index, record.atom_index)?;
            }
            None => warn!(
                "No signal matches shift {} ({:?}); atom {} left unassigned",
                record.shift, record.multiplicity, record.atom_index
            ),
        }
    }

    Ok(data_set)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENTHOL_FRAGMENT: &str = "16.1;0.0Q;9|21.0;0.0Q;8|22.2;0.0Q;10|23.1;0.0T;5|\
                                    31.6;0.0D;3|34.5;0.0T;4|45.0;0.0T;6|50.1;0.0D;1|71.5;0.0D;2";

    #[test]
    fn test_parse_spectrum_records() {
        let records = parse_spectrum_records("17.6;0.0Q;9|18.3;12.5;3").unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(
            records[0],
            SpectrumRecord {
                shift: 17.6,
                intensity: 0.0,
                multiplicity: Some("q".to_string()),
                atom_index: 9,
            }
        );
        assert_eq!(records[1].intensity, 12.5);
        assert_eq!(records[1].multiplicity, None);
    }

    #[test]
    fn test_parse_spectrum_records_trailing_separator() {
        let records = parse_spectrum_records("17.6;0.0Q;9|\n").unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_parse_spectrum_records_invalid() {
        assert!(matches!(
            parse_spectrum_records("17.6;0.0Q"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_spectrum_records("abc;0.0Q;1"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_spectrum_records("17.6;Q;1"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_spectrum_records("17.6;0.0Q;-1"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_spectrum_records("NaN;0.0Q;1"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_spectrum_records("17.6;0.0Q;9|inf;0.0Q;1"),
            Err(ParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_spectrum_records("  "),
            Err(ParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_spectrum_text() {
        let data_set = parse_spectrum_text(MENTHOL_FRAGMENT, "13C").unwrap();
        let registry = data_set.registry();

        assert_eq!(registry.signal_count(), 9);
        assert_eq!(registry.nuclei(), ["13C".to_string()]);
        assert_eq!(registry.multiplicity(0).unwrap(), Some("q"));
        assert_eq!(registry.shift(8, 0).unwrap(), Some(71.5));
        assert_eq!(data_set.assignment().assignment(0, 8).unwrap(), &[2]);
        assert_eq!(data_set.assignment().indices(0, 6).unwrap(), vec![6]);
        assert!(data_set.is_consistent());
    }

    #[test]
    fn test_parse_spectrum_text_equivalent_signals() {
        // Two methyls at the same shift: both atoms land on the first signal
        let data_set = parse_spectrum_text("21.0;0.0Q;8|21.0;0.0Q;10|50.1;0.0D;1", "13C").unwrap();
        let registry = data_set.registry();

        assert_eq!(registry.equivalences(), &[None, Some(0), None]);
        assert_eq!(
            registry.equivalent_signal_classes(),
            vec![vec![0, 1], vec![2]]
        );
        assert_eq!(data_set.assignment().assignment(0, 0).unwrap(), &[8, 10]);
        assert!(data_set.assignment().assignment(0, 1).unwrap().is_empty());
    }

    #[test]
    fn test_parse_spectrum_text_same_shift_different_multiplicity() {
        let data_set = parse_spectrum_text("30.0;0.0T;1|30.0;0.0D;2", "13C").unwrap();
        assert_eq!(data_set.registry().equivalences(), &[None, None]);
        assert_eq!(data_set.assignment().indices(0, 1).unwrap(), vec![0]);
        assert_eq!(data_set.assignment().indices(0, 2).unwrap(), vec![1]);
    }
}
