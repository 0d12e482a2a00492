use serde::Serialize;
use tracing::debug;

use crate::core::signal::Signal;
use crate::core::types::RegistryError;
use crate::matching::equivalence::EquivalenceClasses;
use crate::matching::matcher::ShiftMatcher;

/// Ordered collection of signals recorded in one experiment.
///
/// Signals are addressed by position. Next to the signal list the registry keeps
/// an equivalence table with one optional link per signal, pointing at another
/// signal of the same registry. The partition into equivalence classes derived
/// from that table is rebuilt eagerly after every mutation, so reads always see
/// the current state.
#[derive(Debug, Clone, Serialize)]
pub struct SignalRegistry {
    /// Nucleus per dimension; fixed for the lifetime of the registry
    nuclei: Vec<String>,

    /// Free-text description of the spectrum
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,

    /// Experiment type (e.g. "13C", "DEPT", "HSQC")
    #[serde(skip_serializing_if = "Option::is_none")]
    experiment_type: Option<String>,

    /// Proton frequency of the spectrometer in MHz
    #[serde(skip_serializing_if = "Option::is_none")]
    spectrometer_frequency: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    solvent: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    standard: Option<String>,

    pub(crate) signals: Vec<Signal>,

    /// One entry per signal; `None` means "no relation"
    pub(crate) equivalences: Vec<Option<usize>>,

    #[serde(skip)]
    pub(crate) classes: EquivalenceClasses,
}

impl SignalRegistry {
    /// Create an empty registry observing the given nuclei
    pub fn new<I, S>(nuclei: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            nuclei: nuclei.into_iter().map(Into::into).collect(),
            description: None,
            experiment_type: None,
            spectrometer_frequency: None,
            solvent: None,
            standard: None,
            signals: Vec::new(),
            equivalences: Vec::new(),
            classes: EquivalenceClasses::default(),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_experiment_type(mut self, experiment_type: impl Into<String>) -> Self {
        self.experiment_type = Some(experiment_type.into());
        self
    }

    #[must_use]
    pub fn with_spectrometer_frequency(mut self, frequency: f64) -> Self {
        self.spectrometer_frequency = Some(frequency);
        self
    }

    #[must_use]
    pub fn with_solvent(mut self, solvent: impl Into<String>) -> Self {
        self.solvent = Some(solvent.into());
        self
    }

    #[must_use]
    pub fn with_standard(mut self, standard: impl Into<String>) -> Self {
        self.standard = Some(standard.into());
        self
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn experiment_type(&self) -> Option<&str> {
        self.experiment_type.as_deref()
    }

    pub fn spectrometer_frequency(&self) -> Option<f64> {
        self.spectrometer_frequency
    }

    pub fn solvent(&self) -> Option<&str> {
        self.solvent.as_deref()
    }

    pub fn standard(&self) -> Option<&str> {
        self.standard.as_deref()
    }

    pub fn nuclei(&self) -> &[String] {
        &self.nuclei
    }

    pub fn dimension_count(&self) -> usize {
        self.nuclei.len()
    }

    /// Check whether `dim` is one of the declared dimensions
    pub fn contains_dim(&self, dim: usize) -> bool {
        dim < self.nuclei.len()
    }

    pub fn signal_count(&self) -> usize {
        self.signals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty()
    }

    /// Number of nuclei represented, counting each signal by its equivalence count
    pub fn signal_count_with_equivalences(&self) -> u64 {
        self.signals
            .iter()
            .map(|s| u64::from(s.equivalence_count().get()))
            .sum()
    }

    /// Query helper bound to this registry
    pub fn matcher(&self) -> ShiftMatcher<'_> {
        ShiftMatcher::new(self)
    }

    pub(crate) fn check_signal_index(&self, index: usize) -> Result<(), RegistryError> {
        if index < self.signals.len() {
            Ok(())
        } else {
            Err(RegistryError::SignalIndexOutOfRange {
                index,
                count: self.signals.len(),
            })
        }
    }

    fn check_dim(&self, dim: usize) -> Result<(), RegistryError> {
        if self.contains_dim(dim) {
            Ok(())
        } else {
            Err(RegistryError::DimensionOutOfRange {
                dim,
                dimensions: self.nuclei.len(),
            })
        }
    }

    fn check_input_length(&self, found: usize) -> Result<(), RegistryError> {
        if found == self.signals.len() {
            Ok(())
        } else {
            Err(RegistryError::LengthMismatch {
                expected: self.signals.len(),
                found,
            })
        }
    }

    fn check_nuclei(&self, signal: &Signal) -> Result<(), RegistryError> {
        if signal.has_nuclei(&self.nuclei) {
            Ok(())
        } else {
            Err(RegistryError::NucleiMismatch {
                expected: self.nuclei.clone(),
                found: signal.nuclei().to_vec(),
            })
        }
    }

    /// Append a signal with no equivalence link and return its index
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NucleiMismatch` if the signal does not observe
    /// exactly the registry's nuclei. The registry is left unchanged.
    pub fn add_signal(&mut self, signal: Signal) -> Result<usize, RegistryError> {
        self.push_signal(signal, None)
    }

    /// Append a signal that is known to be equivalent to an existing one
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NucleiMismatch` on a nuclei mismatch, or
    /// `RegistryError::SignalIndexOutOfRange` if `equivalent_index` does not
    /// refer to a signal already in the registry. The registry is left unchanged.
    pub fn add_signal_with_equivalence(
        &mut self,
        signal: Signal,
        equivalent_index: usize,
    ) -> Result<usize, RegistryError> {
        self.check_signal_index(equivalent_index)?;
        self.push_signal(signal, Some(equivalent_index))
    }

    /// Append several signals at once
    ///
    /// All signals are validated before the first one is added, so either all
    /// of them end up in the registry or none does.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NucleiMismatch` for the first offending signal.
    pub fn add_signals(
        &mut self,
        signals: Vec<Signal>,
    ) -> Result<std::ops::Range<usize>, RegistryError> {
        for signal in &signals {
            self.check_nuclei(signal)?;
        }
        let start = self.signals.len();
        let added = signals.len();
        self.equivalences.extend(std::iter::repeat(None).take(added));
        self.signals.extend(signals);
        self.rebuild_equivalence_classes();
        debug!("Added {added} signals at index {start}");

        Ok(start..start + added)
    }

    fn push_signal(
        &mut self,
        signal: Signal,
        link: Option<usize>,
    ) -> Result<usize, RegistryError> {
        self.check_nuclei(&signal)?;
        let index = self.signals.len();
        self.signals.push(signal);
        self.equivalences.push(link);
        self.rebuild_equivalence_classes();
        debug!(index, ?link, "Added signal");

        Ok(index)
    }

    /// Remove the signal at `index` and return it
    ///
    /// The equivalence table shrinks together with the signal list: links that
    /// pointed at the removed signal become "no relation", and links pointing
    /// past it are shifted down by one so they keep addressing the same signal.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn remove_signal(&mut self, index: usize) -> Result<Signal, RegistryError> {
        self.check_signal_index(index)?;
        let removed = self.signals.remove(index);
        self.equivalences.remove(index);
        for link in &mut self.equivalences {
            *link = match *link {
                Some(target) if target == index => None,
                Some(target) if target > index => Some(target - 1),
                other => other,
            };
        }
        self.rebuild_equivalence_classes();
        debug!(index, "Removed signal");

        Ok(removed)
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn signal(&self, index: usize) -> Result<&Signal, RegistryError> {
        self.check_signal_index(index)?;
        Ok(&self.signals[index])
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Shift of one signal in one dimension; `Ok(None)` if the shift is unset
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` or
    /// `RegistryError::SignalIndexOutOfRange`.
    pub fn shift(&self, index: usize, dim: usize) -> Result<Option<f64>, RegistryError> {
        self.check_dim(dim)?;
        Ok(self.signal(index)?.shift(dim))
    }

    /// All shifts of one dimension in signal order
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared.
    pub fn shifts(&self, dim: usize) -> Result<Vec<Option<f64>>, RegistryError> {
        self.check_dim(dim)?;
        Ok(self.signals.iter().map(|s| s.shift(dim)).collect())
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn multiplicity(&self, index: usize) -> Result<Option<&str>, RegistryError> {
        Ok(self.signal(index)?.multiplicity())
    }

    pub fn multiplicities(&self) -> Vec<Option<&str>> {
        self.signals.iter().map(Signal::multiplicity).collect()
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn intensity(&self, index: usize) -> Result<Option<f64>, RegistryError> {
        Ok(self.signal(index)?.intensity())
    }

    pub fn intensities(&self) -> Vec<Option<f64>> {
        self.signals.iter().map(Signal::intensity).collect()
    }

    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` or
    /// `RegistryError::SignalIndexOutOfRange`.
    pub fn set_shift(
        &mut self,
        index: usize,
        dim: usize,
        shift: Option<f64>,
    ) -> Result<(), RegistryError> {
        self.check_dim(dim)?;
        self.check_signal_index(index)?;
        self.signals[index].set_shift(dim, shift)
    }

    /// Replace the shifts of one dimension for every signal
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared, or
    /// `RegistryError::LengthMismatch` unless exactly one shift per signal is
    /// given. Nothing is written on failure.
    pub fn set_shifts(&mut self, shifts: &[f64], dim: usize) -> Result<(), RegistryError> {
        self.check_dim(dim)?;
        self.check_input_length(shifts.len())?;
        for (signal, &shift) in self.signals.iter_mut().zip(shifts) {
            signal.set_shift(dim, Some(shift))?;
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn set_intensity(&mut self, index: usize, intensity: f64) -> Result<(), RegistryError> {
        self.check_signal_index(index)?;
        self.signals[index].set_intensity(Some(intensity));
        Ok(())
    }

    /// Replace the intensities of every signal
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LengthMismatch` unless exactly one intensity per
    /// signal is given. Nothing is written on failure.
    pub fn set_intensities(&mut self, intensities: &[f64]) -> Result<(), RegistryError> {
        self.check_input_length(intensities.len())?;
        for (signal, &intensity) in self.signals.iter_mut().zip(intensities) {
            signal.set_intensity(Some(intensity));
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn set_multiplicity(
        &mut self,
        index: usize,
        multiplicity: Option<&str>,
    ) -> Result<(), RegistryError> {
        self.check_signal_index(index)?;
        self.signals[index].set_multiplicity(multiplicity.map(str::to_string));
        Ok(())
    }

    /// Replace the multiplicities of every signal
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::LengthMismatch` unless exactly one entry per
    /// signal is given. Nothing is written on failure.
    pub fn set_multiplicities<S: AsRef<str>>(
        &mut self,
        multiplicities: &[Option<S>],
    ) -> Result<(), RegistryError> {
        self.check_input_length(multiplicities.len())?;
        for (signal, multiplicity) in self.signals.iter_mut().zip(multiplicities) {
            signal.set_multiplicity(multiplicity.as_ref().map(|m| m.as_ref().to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carbon_registry(shifts: &[f64]) -> SignalRegistry {
        let mut registry = SignalRegistry::new(["13C"]);
        for &shift in shifts {
            registry
                .add_signal(Signal::one_dimensional("13C", shift).with_multiplicity("s"))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_add_signal_returns_index() {
        let mut registry = SignalRegistry::new(["13C"]);
        assert_eq!(
            registry
                .add_signal(Signal::one_dimensional("13C", 10.0))
                .unwrap(),
            0
        );
        assert_eq!(
            registry
                .add_signal(Signal::one_dimensional("13C", 20.0))
                .unwrap(),
            1
        );
        assert_eq!(registry.signal_count(), 2);
        assert_eq!(registry.equivalences().len(), 2);
    }

    #[test]
    fn test_add_signal_nuclei_mismatch() {
        let mut registry = carbon_registry(&[10.0]);

        let err = registry
            .add_signal(Signal::one_dimensional("1H", 1.2))
            .unwrap_err();
        assert!(matches!(err, RegistryError::NucleiMismatch { .. }));

        let err = registry
            .add_signal(Signal::from_shifts(vec!["13C", "1H"], &[10.0, 1.0]).unwrap())
            .unwrap_err();
        assert!(matches!(err, RegistryError::NucleiMismatch { .. }));

        assert_eq!(registry.signal_count(), 1);
        assert_eq!(registry.equivalences().len(), 1);
    }

    #[test]
    fn test_add_signal_with_equivalence() {
        let mut registry = carbon_registry(&[10.0]);
        let index = registry
            .add_signal_with_equivalence(Signal::one_dimensional("13C", 10.0), 0)
            .unwrap();
        assert_eq!(index, 1);
        assert_eq!(registry.equivalences(), &[None, Some(0)]);
    }

    #[test]
    fn test_add_signal_with_invalid_equivalence() {
        let mut registry = carbon_registry(&[10.0]);
        let err = registry
            .add_signal_with_equivalence(Signal::one_dimensional("13C", 10.0), 5)
            .unwrap_err();
        assert_eq!(
            err,
            RegistryError::SignalIndexOutOfRange { index: 5, count: 1 }
        );
        assert_eq!(registry.signal_count(), 1);
    }

    #[test]
    fn test_add_signals_is_all_or_nothing() {
        let mut registry = carbon_registry(&[10.0]);
        let batch = vec![
            Signal::one_dimensional("13C", 20.0),
            Signal::one_dimensional("15N", 120.0),
        ];
        assert!(registry.add_signals(batch).is_err());
        assert_eq!(registry.signal_count(), 1);

        let batch = vec![
            Signal::one_dimensional("13C", 20.0),
            Signal::one_dimensional("13C", 30.0),
        ];
        assert_eq!(registry.add_signals(batch).unwrap(), 1..3);
        assert_eq!(registry.signal_count(), 3);
        assert_eq!(registry.equivalences().len(), 3);
    }

    #[test]
    fn test_remove_signal_out_of_range() {
        let mut registry = carbon_registry(&[10.0, 20.0]);
        assert!(registry.remove_signal(2).is_err());
        assert_eq!(registry.signal_count(), 2);
    }

    #[test]
    fn test_remove_signal_renumbers_links() {
        let mut registry = carbon_registry(&[10.0, 10.0, 10.0]);
        registry.set_equivalence(1, 0).unwrap();
        registry.set_equivalence(2, 1).unwrap();
        assert_eq!(registry.equivalences(), &[None, Some(0), Some(1)]);

        let removed = registry.remove_signal(1).unwrap();
        assert_eq!(removed.shift(0), Some(10.0));
        assert_eq!(registry.signal_count(), 2);
        assert_eq!(registry.equivalences(), &[None, None]);
    }

    #[test]
    fn test_remove_signal_shifts_links_above() {
        let mut registry = carbon_registry(&[10.0, 20.0, 30.0, 30.0]);
        registry.set_equivalence(3, 2).unwrap();
        registry.remove_signal(0).unwrap();
        assert_eq!(registry.equivalences(), &[None, None, Some(1)]);
        assert_eq!(
            registry.equivalent_signal_classes(),
            vec![vec![0], vec![1, 2]]
        );
    }

    #[test]
    fn test_accessors_bounds_checked() {
        let registry = carbon_registry(&[10.0]);
        assert_eq!(registry.shift(0, 0).unwrap(), Some(10.0));
        assert!(matches!(
            registry.shift(0, 1),
            Err(RegistryError::DimensionOutOfRange { dim: 1, .. })
        ));
        assert!(matches!(
            registry.shift(1, 0),
            Err(RegistryError::SignalIndexOutOfRange { index: 1, .. })
        ));
        assert_eq!(registry.multiplicity(0).unwrap(), Some("s"));
        assert!(registry.multiplicity(3).is_err());
        assert_eq!(registry.intensity(0).unwrap(), None);
        assert!(registry.intensity(3).is_err());
        assert!(registry.signal(1).is_err());
    }

    #[test]
    fn test_set_shifts_all_or_nothing() {
        let mut registry = carbon_registry(&[10.0, 20.0]);

        assert!(registry.set_shifts(&[1.0], 0).is_err());
        assert!(registry.set_shifts(&[1.0, 2.0, 3.0], 0).is_err());
        assert!(registry.set_shifts(&[1.0, 2.0], 1).is_err());
        assert_eq!(registry.shifts(0).unwrap(), vec![Some(10.0), Some(20.0)]);

        registry.set_shifts(&[11.0, 21.0], 0).unwrap();
        assert_eq!(registry.shifts(0).unwrap(), vec![Some(11.0), Some(21.0)]);
    }

    #[test]
    fn test_set_intensities_all_or_nothing() {
        let mut registry = carbon_registry(&[10.0, 20.0]);
        assert!(registry.set_intensities(&[1.0]).is_err());
        assert_eq!(registry.intensities(), vec![None, None]);

        registry.set_intensities(&[1.0, 2.0]).unwrap();
        assert_eq!(registry.intensities(), vec![Some(1.0), Some(2.0)]);

        registry.set_intensity(1, 5.0).unwrap();
        assert_eq!(registry.intensity(1).unwrap(), Some(5.0));
        assert!(registry.set_intensity(2, 5.0).is_err());
    }

    #[test]
    fn test_set_multiplicities_all_or_nothing() {
        let mut registry = carbon_registry(&[10.0, 20.0]);
        assert!(registry.set_multiplicities(&[Some("d")]).is_err());
        assert_eq!(registry.multiplicities(), vec![Some("s"), Some("s")]);

        registry.set_multiplicities(&[Some("d"), None]).unwrap();
        assert_eq!(registry.multiplicities(), vec![Some("d"), None]);

        registry.set_multiplicity(1, Some("t")).unwrap();
        assert_eq!(registry.multiplicity(1).unwrap(), Some("t"));
    }

    #[test]
    fn test_signal_count_with_equivalences() {
        let mut registry = SignalRegistry::new(["13C"]);
        registry
            .add_signal(
                Signal::one_dimensional("13C", 20.0)
                    .with_equivalence_count(std::num::NonZeroU32::new(3).unwrap()),
            )
            .unwrap();
        registry
            .add_signal(Signal::one_dimensional("13C", 40.0))
            .unwrap();
        assert_eq!(registry.signal_count_with_equivalences(), 4);
    }

    #[test]
    fn test_metadata() {
        let registry = SignalRegistry::new(["13C"])
            .with_description("menthol")
            .with_experiment_type("13C")
            .with_spectrometer_frequency(400.0)
            .with_solvent("CDCl3")
            .with_standard("TMS");
        assert_eq!(registry.description(), Some("menthol"));
        assert_eq!(registry.experiment_type(), Some("13C"));
        assert_eq!(registry.spectrometer_frequency(), Some(400.0));
        assert_eq!(registry.solvent(), Some("CDCl3"));
        assert_eq!(registry.standard(), Some("TMS"));
        assert!(registry.contains_dim(0));
        assert!(!registry.contains_dim(1));
    }
}
