//! Seam to an external molecular structure.
//!
//! Perception of aromaticity, atom typing and the like stays with whatever
//! chemistry toolkit owns the structure. This crate only needs a few read-only
//! facts about atoms, expressed by the [`Structure`] trait.

use crate::core::assignment::Assignment;
use crate::core::registry::SignalRegistry;
use crate::core::types::{atom_type_from_nucleus, multiplicity_from_protons_count, RegistryError};

/// Read-only view of a molecular structure
pub trait Structure {
    fn atom_count(&self) -> usize;

    /// Element symbol of an atom, `None` if the index is out of range
    fn atom_symbol(&self, atom_index: usize) -> Option<&str>;

    /// Implicit hydrogens attached to an atom, `None` if unknown or out of range
    fn implicit_hydrogen_count(&self, atom_index: usize) -> Option<u32>;
}

/// Indices of all atoms with the given element symbol
pub fn atom_indices_by_element<S: Structure + ?Sized>(structure: &S, element: &str) -> Vec<usize> {
    (0..structure.atom_count())
        .filter(|&i| structure.atom_symbol(i) == Some(element))
        .collect()
}

/// Atoms of the element observed in `dim` minus the nuclei the registry accounts for.
///
/// A positive value means the structure has atoms no signal covers; a negative
/// value means the spectrum claims more nuclei than the structure holds.
///
/// # Errors
///
/// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared.
pub fn element_count_difference<S: Structure + ?Sized>(
    registry: &SignalRegistry,
    structure: &S,
    dim: usize,
) -> Result<i64, RegistryError> {
    let nucleus = registry
        .nuclei()
        .get(dim)
        .ok_or(RegistryError::DimensionOutOfRange {
            dim,
            dimensions: registry.dimension_count(),
        })?;
    let atoms = atom_indices_by_element(structure, atom_type_from_nucleus(nucleus)).len();

    let atoms = i64::try_from(atoms).unwrap_or(i64::MAX);
    let nuclei = i64::try_from(registry.signal_count_with_equivalences()).unwrap_or(i64::MAX);
    Ok(atoms - nuclei)
}

/// Expected multiplicity of a carbon from its implicit hydrogens
pub fn predicted_multiplicity<S: Structure + ?Sized>(
    structure: &S,
    atom_index: usize,
) -> Option<&'static str> {
    if structure.atom_symbol(atom_index)? != "C" {
        return None;
    }
    multiplicity_from_protons_count(structure.implicit_hydrogen_count(atom_index)?)
}

/// Atoms in an assignment that the structure cannot back up.
///
/// An atom is reported when its index is out of range for the structure or its
/// element differs from the element observed in `dim`. The result is ascending
/// and free of duplicates.
///
/// # Errors
///
/// Returns `RegistryError::DimensionOutOfRange` if `dim` is not declared.
pub fn mismatched_atoms<S: Structure + ?Sized>(
    assignment: &Assignment,
    structure: &S,
    dim: usize,
) -> Result<Vec<usize>, RegistryError> {
    let nucleus = assignment
        .nuclei()
        .get(dim)
        .ok_or(RegistryError::DimensionOutOfRange {
            dim,
            dimensions: assignment.nuclei().len(),
        })?;
    let element = atom_type_from_nucleus(nucleus);

    Ok(assignment
        .assigned_atoms(dim)?
        .into_iter()
        .filter(|&atom| structure.atom_symbol(atom) != Some(element))
        .collect())
}
