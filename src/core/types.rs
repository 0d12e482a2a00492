use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised by registry and assignment operations.
///
/// Every variant is reported before any write happens, so a failed call
/// never leaves a registry or assignment partially updated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Signal index {index} out of range for {count} signals")]
    SignalIndexOutOfRange { index: usize, count: usize },

    #[error("Dimension {dim} out of range for {dimensions} declared dimensions")]
    DimensionOutOfRange { dim: usize, dimensions: usize },

    #[error("Nuclei mismatch: expected {expected:?}, found {found:?}")]
    NucleiMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },

    #[error("Input length {found} does not match signal count {expected}")]
    LengthMismatch { expected: usize, found: usize },

    #[error("Assignment covers {slots} signals but the registry holds {signals}")]
    StaleAssignment { signals: usize, slots: usize },
}

/// Phase sign of a signal, as reported by edited experiments (e.g. DEPT, HSQC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Positive,
    Negative,
}

impl Phase {
    /// Map a numeric sign to a phase; zero carries no phase information
    #[must_use]
    pub fn from_sign(sign: i32) -> Option<Self> {
        match sign.signum() {
            1 => Some(Self::Positive),
            -1 => Some(Self::Negative),
            _ => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Positive => write!(f, "+"),
            Self::Negative => write!(f, "-"),
        }
    }
}

/// Strip the mass number from a nucleus label: `13C` -> `C`, `29Si` -> `Si`
#[must_use]
pub fn atom_type_from_nucleus(nucleus: &str) -> &str {
    nucleus.trim_start_matches(|c: char| c.is_ascii_digit())
}

/// Isotope label conventionally observed for an element: `C` -> `13C`.
///
/// Unknown elements are returned unchanged.
#[must_use]
pub fn isotope_identifier(element: &str) -> String {
    let isotope = match element {
        "C" => "13C",
        "H" => "1H",
        "N" => "15N",
        "P" => "31P",
        "F" => "19F",
        "O" => "17O",
        "S" => "33S",
        "Si" => "29Si",
        "B" => "11B",
        "Pt" => "195Pt",
        other => other,
    };
    isotope.to_string()
}

/// Carbon multiplicity from the number of attached protons.
///
/// Only defined for carbons with up to three protons; anything else yields `None`.
#[must_use]
pub fn multiplicity_from_protons_count(protons: u32) -> Option<&'static str> {
    match protons {
        0 => Some("s"),
        1 => Some("d"),
        2 => Some("t"),
        3 => Some("q"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atom_type_from_nucleus() {
        assert_eq!(atom_type_from_nucleus("13C"), "C");
        assert_eq!(atom_type_from_nucleus("1H"), "H");
        assert_eq!(atom_type_from_nucleus("29Si"), "Si");
        assert_eq!(atom_type_from_nucleus("195Pt"), "Pt");
        assert_eq!(atom_type_from_nucleus("C"), "C");
    }

    #[test]
    fn test_isotope_identifier() {
        assert_eq!(isotope_identifier("C"), "13C");
        assert_eq!(isotope_identifier("N"), "15N");
        assert_eq!(isotope_identifier("Si"), "29Si");
        assert_eq!(isotope_identifier("Xe"), "Xe");
    }

    #[test]
    fn test_nucleus_round_trip_for_known_elements() {
        for element in ["C", "H", "N", "P", "F", "O", "S", "Si", "B", "Pt"] {
            assert_eq!(atom_type_from_nucleus(&isotope_identifier(element)), element);
        }
    }

    #[test]
    fn test_multiplicity_from_protons_count() {
        assert_eq!(multiplicity_from_protons_count(0), Some("s"));
        assert_eq!(multiplicity_from_protons_count(1), Some("d"));
        assert_eq!(multiplicity_from_protons_count(2), Some("t"));
        assert_eq!(multiplicity_from_protons_count(3), Some("q"));
        assert_eq!(multiplicity_from_protons_count(4), None);
    }

    #[test]
    fn test_phase_from_sign() {
        assert_eq!(Phase::from_sign(1), Some(Phase::Positive));
        assert_eq!(Phase::from_sign(-3), Some(Phase::Negative));
        assert_eq!(Phase::from_sign(0), None);
    }
}
