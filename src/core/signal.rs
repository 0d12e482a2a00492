use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::core::types::{Phase, RegistryError};

fn default_equivalence_count() -> NonZeroU32 {
    NonZeroU32::MIN
}

fn is_single(count: &NonZeroU32) -> bool {
    count.get() == 1
}

/// A single resonance entry of a spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    /// Nucleus observed in each dimension (e.g. `["13C"]`, `["1H", "13C"]`)
    nuclei: Vec<String>,

    /// Chemical shift per dimension, parallel to `nuclei`
    shifts: Vec<Option<f64>>,

    /// Splitting pattern label (e.g. "s", "d", "t", "q")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    multiplicity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    intensity: Option<f64>,

    /// Number of magnetically equivalent nuclei collapsed into this signal
    #[serde(
        default = "default_equivalence_count",
        skip_serializing_if = "is_single"
    )]
    equivalence_count: NonZeroU32,

    /// Opaque identifier carried through from the source record
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    phase: Option<Phase>,
}

impl Signal {
    /// Create a signal for the given nuclei with no shifts set yet
    pub fn new<I, S>(nuclei: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nuclei: Vec<String> = nuclei.into_iter().map(Into::into).collect();
        let shifts = vec![None; nuclei.len()];
        Self {
            nuclei,
            shifts,
            multiplicity: None,
            intensity: None,
            equivalence_count: default_equivalence_count(),
            id: None,
            phase: None,
        }
    }

    /// Create a one-dimensional signal with its shift
    pub fn one_dimensional(nucleus: impl Into<String>, shift: f64) -> Self {
        let mut signal = Self::new([nucleus]);
        signal.shifts[0] = Some(shift);
        signal
    }

    /// Create a signal with one shift per nucleus
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LengthMismatch` if the number of shifts differs
    /// from the number of nuclei.
    pub fn from_shifts<S: Into<String>>(
        nuclei: Vec<S>,
        shifts: &[f64],
    ) -> Result<Self, RegistryError> {
        let mut signal = Self::new(nuclei);
        if shifts.len() != signal.nuclei.len() {
            return Err(RegistryError::LengthMismatch {
                expected: signal.nuclei.len(),
                found: shifts.len(),
            });
        }
        signal.shifts = shifts.iter().copied().map(Some).collect();
        Ok(signal)
    }

    #[must_use]
    pub fn with_multiplicity(mut self, multiplicity: impl Into<String>) -> Self {
        self.multiplicity = Some(multiplicity.into());
        self
    }

    #[must_use]
    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = Some(intensity);
        self
    }

    #[must_use]
    pub fn with_equivalence_count(mut self, count: NonZeroU32) -> Self {
        self.equivalence_count = count;
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_phase(mut self, phase: Phase) -> Self {
        self.phase = Some(phase);
        self
    }

    pub fn nuclei(&self) -> &[String] {
        &self.nuclei
    }

    pub fn dimension_count(&self) -> usize {
        self.nuclei.len()
    }

    /// Shift in the given dimension; `None` if unset or the dimension does not exist
    pub fn shift(&self, dim: usize) -> Option<f64> {
        self.shifts.get(dim).copied().flatten()
    }

    pub fn shifts(&self) -> &[Option<f64>] {
        &self.shifts
    }

    /// Set or clear the shift in one dimension
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared
    /// by this signal.
    pub fn set_shift(&mut self, dim: usize, shift: Option<f64>) -> Result<(), RegistryError> {
        let dimensions = self.shifts.len();
        let slot = self
            .shifts
            .get_mut(dim)
            .ok_or(RegistryError::DimensionOutOfRange { dim, dimensions })?;
        *slot = shift;
        Ok(())
    }

    pub fn multiplicity(&self) -> Option<&str> {
        self.multiplicity.as_deref()
    }

    pub fn set_multiplicity(&mut self, multiplicity: Option<String>) {
        self.multiplicity = multiplicity;
    }

    pub fn intensity(&self) -> Option<f64> {
        self.intensity
    }

    pub fn set_intensity(&mut self, intensity: Option<f64>) {
        self.intensity = intensity;
    }

    pub fn equivalence_count(&self) -> NonZeroU32 {
        self.equivalence_count
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn phase(&self) -> Option<Phase> {
        self.phase
    }

    /// Check that this signal observes exactly the given nuclei, in order
    pub fn has_nuclei(&self, nuclei: &[String]) -> bool {
        self.nuclei == nuclei
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_signal_has_no_shifts() {
        let signal = Signal::new(["1H", "13C"]);
        assert_eq!(signal.dimension_count(), 2);
        assert_eq!(signal.shift(0), None);
        assert_eq!(signal.shift(1), None);
        assert_eq!(signal.equivalence_count().get(), 1);
        assert!(signal.multiplicity().is_none());
    }

    #[test]
    fn test_one_dimensional() {
        let signal = Signal::one_dimensional("13C", 77.0)
            .with_multiplicity("d")
            .with_intensity(12.5);
        assert_eq!(signal.nuclei(), ["13C".to_string()]);
        assert_eq!(signal.shift(0), Some(77.0));
        assert_eq!(signal.multiplicity(), Some("d"));
        assert_eq!(signal.intensity(), Some(12.5));
    }

    #[test]
    fn test_from_shifts_length_mismatch() {
        let err = Signal::from_shifts(vec!["1H", "13C"], &[1.2]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::LengthMismatch {
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_set_shift_out_of_range() {
        let mut signal = Signal::one_dimensional("13C", 10.0);
        assert!(signal.set_shift(1, Some(5.0)).is_err());
        assert_eq!(signal.shift(0), Some(10.0));

        signal.set_shift(0, None).unwrap();
        assert_eq!(signal.shift(0), None);
    }

    #[test]
    fn test_has_nuclei_is_order_sensitive() {
        let signal = Signal::new(["1H", "13C"]);
        assert!(signal.has_nuclei(&["1H".to_string(), "13C".to_string()]));
        assert!(!signal.has_nuclei(&["13C".to_string(), "1H".to_string()]));
        assert!(!signal.has_nuclei(&["1H".to_string()]));
    }

    #[test]
    fn test_serde_skips_defaults() {
        let signal = Signal::one_dimensional("13C", 30.0);
        let json = serde_json::to_string(&signal).unwrap();
        assert!(!json.contains("equivalence_count"));
        assert!(!json.contains("multiplicity"));

        let counted = signal.with_equivalence_count(NonZeroU32::new(3).unwrap());
        let json = serde_json::to_string(&counted).unwrap();
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.equivalence_count().get(), 3);
    }

    #[test]
    fn test_id_and_phase_survive_serde() {
        let signal = Signal::one_dimensional("13C", 77.0)
            .with_id("C7")
            .with_phase(Phase::Negative);
        assert_eq!(signal.id(), Some("C7"));
        assert_eq!(signal.phase(), Some(Phase::Negative));

        let json = serde_json::to_string(&signal).unwrap();
        assert!(json.contains(r#""phase":"negative""#));
        let back: Signal = serde_json::from_str(&json).unwrap();
        assert_eq!(back, signal);
        assert_eq!(back.id(), Some("C7"));
        assert_eq!(back.phase(), Some(Phase::Negative));

        let unphased: Signal = serde_json::from_str(
            r#"{"nuclei":["13C"],"shifts":[77.0]}"#,
        )
        .unwrap();
        assert_eq!(unphased.id(), None);
        assert_eq!(unphased.phase(), None);
        assert_eq!(unphased.equivalence_count().get(), 1);
    }
}
