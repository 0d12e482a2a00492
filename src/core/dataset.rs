use serde::Serialize;
use tracing::{debug, warn};

use crate::core::assignment::Assignment;
use crate::core::registry::SignalRegistry;
use crate::core::signal::Signal;
use crate::core::types::RegistryError;

/// A registry together with the assignment built for it.
///
/// Adding or removing signals through the data set keeps both halves the same
/// shape, so an assignment slot is dropped together with its signal.
#[derive(Debug, Clone, Serialize)]
pub struct DataSet {
    registry: SignalRegistry,
    assignment: Assignment,
}

impl DataSet {
    /// Wrap a registry with an empty assignment of matching shape
    pub fn new(registry: SignalRegistry) -> Self {
        let assignment = Assignment::for_registry(&registry);
        Self {
            registry,
            assignment,
        }
    }

    /// Pair a registry with an existing assignment
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NucleiMismatch` if the nuclei differ, or
    /// `RegistryError::LengthMismatch` if the signal counts differ.
    pub fn with_assignment(
        registry: SignalRegistry,
        assignment: Assignment,
    ) -> Result<Self, RegistryError> {
        if assignment.nuclei() != registry.nuclei() {
            return Err(RegistryError::NucleiMismatch {
                expected: registry.nuclei().to_vec(),
                found: assignment.nuclei().to_vec(),
            });
        }
        if assignment.signal_count() != registry.signal_count() {
            return Err(RegistryError::LengthMismatch {
                expected: registry.signal_count(),
                found: assignment.signal_count(),
            });
        }
        Ok(Self {
            registry,
            assignment,
        })
    }

    pub fn registry(&self) -> &SignalRegistry {
        &self.registry
    }

    /// Mutable access to the registry.
    ///
    /// Adding or removing signals here bypasses the assignment and leaves the
    /// pair stale; use [`DataSet::add_signal`], [`DataSet::add_signal_with_equivalence`]
    /// and [`DataSet::remove_signal`] for that, or [`DataSet::reset_assignment`]
    /// to start over.
    pub fn registry_mut(&mut self) -> &mut SignalRegistry {
        &mut self.registry
    }

    pub fn assignment(&self) -> &Assignment {
        &self.assignment
    }

    pub fn assignment_mut(&mut self) -> &mut Assignment {
        &mut self.assignment
    }

    pub fn is_consistent(&self) -> bool {
        self.assignment.is_consistent_with(&self.registry)
    }

    /// Add a signal to the registry and an empty slot to the assignment
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NucleiMismatch` if the signal does not fit the registry.
    pub fn add_signal(&mut self, signal: Signal) -> Result<usize, RegistryError> {
        let index = self.registry.add_signal(signal)?;
        self.assignment.push_signal();
        Ok(index)
    }

    /// Add a signal already known to be equivalent to an existing one
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::NucleiMismatch` or
    /// `RegistryError::SignalIndexOutOfRange`, leaving both halves unchanged.
    pub fn add_signal_with_equivalence(
        &mut self,
        signal: Signal,
        equivalent_index: usize,
    ) -> Result<usize, RegistryError> {
        let index = self
            .registry
            .add_signal_with_equivalence(signal, equivalent_index)?;
        self.assignment.push_signal();
        Ok(index)
    }

    /// Remove a signal and its assignment entries
    ///
    /// The assignment must still match the registry's shape; a stale pair is
    /// refused rather than guessed at, since its slots can no longer be
    /// matched to signals.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid, or
    /// `RegistryError::StaleAssignment` if the registry was resized behind the
    /// data set's back. Nothing is removed on error.
    pub fn remove_signal(&mut self, index: usize) -> Result<Signal, RegistryError> {
        self.registry.check_signal_index(index)?;
        if !self.is_consistent() {
            warn!(
                index,
                signals = self.registry.signal_count(),
                slots = self.assignment.signal_count(),
                "Assignment out of shape, refusing to remove signal"
            );
            return Err(RegistryError::StaleAssignment {
                signals: self.registry.signal_count(),
                slots: self.assignment.signal_count(),
            });
        }

        let removed = self.registry.remove_signal(index)?;
        self.assignment.remove_signal(index)?;
        debug!(index, "Removed signal and its assignment slot");
        Ok(removed)
    }

    /// Re-shape a stale assignment to the registry, dropping every atom entry
    pub fn reset_assignment(&mut self) {
        self.assignment = Assignment::for_registry(&self.registry);
    }

    pub fn into_parts(self) -> (SignalRegistry, Assignment) {
        (self.registry, self.assignment)
    }
}
