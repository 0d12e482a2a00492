use std::collections::HashMap;

use tracing::debug;

use crate::core::registry::SignalRegistry;
use crate::core::types::RegistryError;
use crate::matching::matcher::ShiftMatcher;

/// Tolerance used when equivalences are detected without an explicit window
pub const DEFAULT_EQUIVALENCE_TOLERANCE: f64 = 0.0;

/// Partition of signal indices derived from an equivalence table.
///
/// Links are followed in both directions: if B links to A, A's class contains B
/// whatever A itself links to. Classes are numbered by their smallest member and
/// list their members in ascending order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquivalenceClasses {
    classes: Vec<Vec<usize>>,
    class_of: Vec<usize>,
}

impl EquivalenceClasses {
    /// Close the points-to relation of `links` into disjoint classes.
    ///
    /// Links pointing outside the table are ignored.
    pub fn from_links(links: &[Option<usize>]) -> Self {
        let mut parent: Vec<usize> = (0..links.len()).collect();
        for (index, link) in links.iter().enumerate() {
            if let Some(target) = *link {
                if target < links.len() {
                    union(&mut parent, index, target);
                }
            }
        }

        let mut class_of_root: HashMap<usize, usize> = HashMap::new();
        let mut classes: Vec<Vec<usize>> = Vec::new();
        let mut class_of = Vec::with_capacity(links.len());
        for index in 0..links.len() {
            let root = find(&mut parent, index);
            let class_id = *class_of_root.entry(root).or_insert_with(|| {
                classes.push(Vec::new());
                classes.len() - 1
            });
            classes[class_id].push(index);
            class_of.push(class_id);
        }

        Self { classes, class_of }
    }

    pub fn classes(&self) -> &[Vec<usize>] {
        &self.classes
    }

    /// Class id of a signal index
    pub fn class_of(&self, index: usize) -> Option<usize> {
        self.class_of.get(index).copied()
    }

    /// Members of the class containing `index`, `index` included
    pub fn members(&self, index: usize) -> Option<&[usize]> {
        self.class_of(index)
            .map(|class_id| self.classes[class_id].as_slice())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

fn find(parent: &mut [usize], mut index: usize) -> usize {
    while parent[index] != index {
        parent[index] = parent[parent[index]];
        index = parent[index];
    }
    index
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        // Keep the smaller index as root so class numbering stays stable
        let (low, high) = if root_a < root_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };
        parent[high] = low;
    }
}

impl SignalRegistry {
    pub(crate) fn rebuild_equivalence_classes(&mut self) {
        self.classes = EquivalenceClasses::from_links(&self.equivalences);
    }

    /// The equivalence table, one entry per signal
    pub fn equivalences(&self) -> &[Option<usize>] {
        &self.equivalences
    }

    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn equivalence(&self, index: usize) -> Result<Option<usize>, RegistryError> {
        self.check_signal_index(index)?;
        Ok(self.equivalences[index])
    }

    /// Link `index` to `equivalent_index` and rebuild the partition
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if either index is invalid.
    pub fn set_equivalence(
        &mut self,
        index: usize,
        equivalent_index: usize,
    ) -> Result<(), RegistryError> {
        self.check_signal_index(index)?;
        self.check_signal_index(equivalent_index)?;
        self.equivalences[index] = Some(equivalent_index);
        self.rebuild_equivalence_classes();
        debug!(index, equivalent_index, "Set equivalence");
        Ok(())
    }

    /// Drop the link stored for `index`
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn clear_equivalence(&mut self, index: usize) -> Result<(), RegistryError> {
        self.check_signal_index(index)?;
        self.equivalences[index] = None;
        self.rebuild_equivalence_classes();
        Ok(())
    }

    /// Detect equivalent signals by exact shift and multiplicity match
    pub fn detect_exact_equivalences(&mut self) -> usize {
        self.detect_equivalences(DEFAULT_EQUIVALENCE_TOLERANCE)
    }

    /// Re-derive the whole equivalence table from shifts in dimension 0.
    ///
    /// Signals are visited in registry order. Each one is linked to the nearest
    /// earlier signal within `tolerance` whose multiplicity is identical (two
    /// missing multiplicities count as identical); signals without such a
    /// candidate get no link. The search only looks backwards and takes the
    /// first hit, so with a nonzero tolerance the result depends on signal
    /// order and need not be transitive.
    ///
    /// Returns the number of signals that received a link.
    pub fn detect_equivalences(&mut self, tolerance: f64) -> usize {
        let links: Vec<Option<usize>> = {
            let matcher = ShiftMatcher::new(self);
            self.signals
                .iter()
                .enumerate()
                .map(|(index, signal)| {
                    let shift = signal.shift(0)?;
                    matcher
                        .pick_within_tolerance(shift, 0, tolerance)
                        .into_iter()
                        .filter(|&candidate| candidate < index)
                        .find(|&candidate| {
                            self.signals[candidate].multiplicity() == signal.multiplicity()
                        })
                })
                .collect()
        };

        let linked = links.iter().filter(|link| link.is_some()).count();
        self.equivalences = links;
        self.rebuild_equivalence_classes();
        debug!(tolerance, linked, "Detected equivalences");

        linked
    }

    /// Current partition of all signal indices into equivalence classes.
    ///
    /// The position of a class in the returned list is its class id; ids carry
    /// no relation to signal indices.
    pub fn equivalent_signal_classes(&self) -> Vec<Vec<usize>> {
        self.classes.classes().to_vec()
    }

    /// Signals in the same class as `index`, excluding `index` itself
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn equivalent_signals(&self, index: usize) -> Result<Vec<usize>, RegistryError> {
        self.check_signal_index(index)?;
        Ok(self
            .classes
            .members(index)
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|&member| member != index)
            .collect())
    }

    /// Whether `index` shares its class with at least one other signal
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::SignalIndexOutOfRange` if `index` is invalid.
    pub fn has_equivalences(&self, index: usize) -> Result<bool, RegistryError> {
        Ok(!self.equivalent_signals(index)?.is_empty())
    }
}
