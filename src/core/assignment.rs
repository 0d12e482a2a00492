use serde::{Deserialize, Serialize};

use crate::core::registry::SignalRegistry;
use crate::core::types::RegistryError;

/// Mapping from signal indices to atom indices of an external structure.
///
/// Each dimension keeps one atom list per signal. Several atoms may share a
/// signal (magnetic equivalence), and an atom may legitimately show up in more
/// than one signal's list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    nuclei: Vec<String>,

    /// `[dim][signal]` -> atom indices
    assignments: Vec<Vec<Vec<usize>>>,
}

impl Assignment {
    /// Create an assignment for the given nuclei covering no signals yet
    pub fn new<I, S>(nuclei: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let nuclei: Vec<String> = nuclei.into_iter().map(Into::into).collect();
        let assignments = vec![Vec::new(); nuclei.len()];
        Self {
            nuclei,
            assignments,
        }
    }

    /// Create an empty assignment shaped after a registry
    pub fn for_registry(registry: &SignalRegistry) -> Self {
        let mut assignment = Self::new(registry.nuclei().iter().cloned());
        assignment.init_assignments(registry.signal_count());
        assignment
    }

    /// Reset every dimension to `signal_count` empty atom lists
    pub fn init_assignments(&mut self, signal_count: usize) {
        for per_signal in &mut self.assignments {
            *per_signal = vec![Vec::new(); signal_count];
        }
    }

    pub fn nuclei(&self) -> &[String] {
        &self.nuclei
    }

    pub fn contains_dim(&self, dim: usize) -> bool {
        dim < self.nuclei.len()
    }

    /// Number of signal slots per dimension
    pub fn signal_count(&self) -> usize {
        self.assignments.first().map_or(0, Vec::len)
    }

    /// Whether this assignment still matches the shape of `registry`
    pub fn is_consistent_with(&self, registry: &SignalRegistry) -> bool {
        self.nuclei == registry.nuclei() && self.signal_count() == registry.signal_count()
    }

    fn dimension(&self, dim: usize) -> Result<&Vec<Vec<usize>>, RegistryError> {
        self.assignments
            .get(dim)
            .ok_or(RegistryError::DimensionOutOfRange {
                dim,
                dimensions: self.nuclei.len(),
            })
    }

    fn slot_mut(&mut self, dim: usize, signal_index: usize) -> Result<&mut Vec<usize>, RegistryError> {
        let dimensions = self.nuclei.len();
        let per_signal = self
            .assignments
            .get_mut(dim)
            .ok_or(RegistryError::DimensionOutOfRange { dim, dimensions })?;
        let count = per_signal.len();
        per_signal
            .get_mut(signal_index)
            .ok_or(RegistryError::SignalIndexOutOfRange {
                index: signal_index,
                count,
            })
    }

    /// Append an atom to a signal's list
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` or
    /// `RegistryError::SignalIndexOutOfRange`.
    pub fn add_assignment_equivalence(
        &mut self,
        dim: usize,
        signal_index: usize,
        atom_index: usize,
    ) -> Result<(), RegistryError> {
        self.slot_mut(dim, signal_index)?.push(atom_index);
        Ok(())
    }

    /// Replace a signal's atom list
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` or
    /// `RegistryError::SignalIndexOutOfRange`.
    pub fn set_assignment(
        &mut self,
        dim: usize,
        signal_index: usize,
        atom_indices: Vec<usize>,
    ) -> Result<(), RegistryError> {
        *self.slot_mut(dim, signal_index)? = atom_indices;
        Ok(())
    }

    /// Atoms assigned to one signal
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` or
    /// `RegistryError::SignalIndexOutOfRange`.
    pub fn assignment(&self, dim: usize, signal_index: usize) -> Result<&[usize], RegistryError> {
        let per_signal = self.dimension(dim)?;
        per_signal
            .get(signal_index)
            .map(Vec::as_slice)
            .ok_or(RegistryError::SignalIndexOutOfRange {
                index: signal_index,
                count: per_signal.len(),
            })
    }

    /// Reverse lookup: every signal whose atom list contains `atom_index`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared.
    pub fn indices(&self, dim: usize, atom_index: usize) -> Result<Vec<usize>, RegistryError> {
        Ok(self
            .dimension(dim)?
            .iter()
            .enumerate()
            .filter(|(_, atoms)| atoms.contains(&atom_index))
            .map(|(signal_index, _)| signal_index)
            .collect())
    }

    /// Distinct atoms assigned in one dimension, ascending
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared.
    pub fn assigned_atoms(&self, dim: usize) -> Result<Vec<usize>, RegistryError> {
        let mut atoms: Vec<usize> = self.dimension(dim)?.iter().flatten().copied().collect();
        atoms.sort_unstable();
        atoms.dedup();
        Ok(atoms)
    }

    /// # Errors
    ///
    /// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared.
    pub fn assigned_atom_count(&self, dim: usize) -> Result<usize, RegistryError> {
        Ok(self.assigned_atoms(dim)?.len())
    }

    /// Append one empty slot per dimension for a newly added signal
    pub fn push_signal(&mut self) {
        for per_signal in &mut self.assignments {
            per_signal.push(Vec::new());
        }
    }

    /// Drop a signal's slot in every dimension; later signals move down by one
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `signal_index` is invalid.
    pub fn remove_signal(&mut self, signal_index: usize) -> Result<(), RegistryError> {
        let count = self.signal_count();
        if signal_index >= count {
            return Err(RegistryError::SignalIndexOutOfRange {
                index: signal_index,
                count,
            });
        }
        for per_signal in &mut self.assignments {
            per_signal.remove(signal_index);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::signal::Signal;

    #[test]
    fn test_init_assignments() {
        let mut assignment = Assignment::new(["13C"]);
        assert_eq!(assignment.signal_count(), 0);

        assignment.init_assignments(3);
        assert_eq!(assignment.signal_count(), 3);
        assert!(assignment.assignment(0, 2).unwrap().is_empty());

        assignment.add_assignment_equivalence(0, 1, 4).unwrap();
        assignment.init_assignments(2);
        assert!(assignment.assignment(0, 1).unwrap().is_empty());
    }

    #[test]
    fn test_add_assignment_equivalence() {
        let mut assignment = Assignment::new(["13C"]);
        assignment.init_assignments(2);

        assignment.add_assignment_equivalence(0, 0, 5).unwrap();
        assignment.add_assignment_equivalence(0, 0, 6).unwrap();
        assert_eq!(assignment.assignment(0, 0).unwrap(), &[5, 6]);

        assert!(matches!(
            assignment.add_assignment_equivalence(0, 2, 1),
            Err(RegistryError::SignalIndexOutOfRange { index: 2, count: 2 })
        ));
        assert!(matches!(
            assignment.add_assignment_equivalence(1, 0, 1),
            Err(RegistryError::DimensionOutOfRange { dim: 1, .. })
        ));
    }

    #[test]
    fn test_indices_reverse_lookup() {
        let mut assignment = Assignment::new(["13C"]);
        assignment.init_assignments(3);
        assignment.add_assignment_equivalence(0, 0, 1).unwrap();
        assignment.add_assignment_equivalence(0, 2, 1).unwrap();
        assignment.add_assignment_equivalence(0, 1, 7).unwrap();

        assert_eq!(assignment.indices(0, 1).unwrap(), vec![0, 2]);
        assert_eq!(assignment.indices(0, 7).unwrap(), vec![1]);
        assert!(assignment.indices(0, 9).unwrap().is_empty());
        assert!(assignment.indices(1, 1).is_err());
    }

    #[test]
    fn test_assigned_atoms() {
        let mut assignment = Assignment::new(["13C"]);
        assignment.init_assignments(2);
        assignment.set_assignment(0, 0, vec![3, 1]).unwrap();
        assignment.set_assignment(0, 1, vec![1, 8]).unwrap();
        assert_eq!(assignment.assigned_atoms(0).unwrap(), vec![1, 3, 8]);
        assert_eq!(assignment.assigned_atom_count(0).unwrap(), 3);
    }

    #[test]
    fn test_remove_signal() {
        let mut assignment = Assignment::new(["1H", "13C"]);
        assignment.init_assignments(3);
        assignment.set_assignment(1, 2, vec![9]).unwrap();

        assignment.remove_signal(0).unwrap();
        assert_eq!(assignment.signal_count(), 2);
        assert_eq!(assignment.assignment(1, 1).unwrap(), &[9]);
        assert!(assignment.remove_signal(2).is_err());
    }

    #[test]
    fn test_consistency_with_registry() {
        let mut registry = SignalRegistry::new(["13C"]);
        registry
            .add_signal(Signal::one_dimensional("13C", 20.0))
            .unwrap();
        let assignment = Assignment::for_registry(&registry);
        assert!(assignment.is_consistent_with(&registry));

        registry
            .add_signal(Signal::one_dimensional("13C", 40.0))
            .unwrap();
        assert!(!assignment.is_consistent_with(&registry));

        let other = Assignment::new(["1H"]);
        assert!(!other.is_consistent_with(&SignalRegistry::new(["13C"])));
    }
}
