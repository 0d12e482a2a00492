use crate::core::registry::SignalRegistry;

/// Read-only shift and multiplicity queries over a registry.
///
/// All queries return signal indices. A dimension the registry does not declare
/// yields an empty result, as do signals whose shift in that dimension is unset.
#[derive(Debug, Clone, Copy)]
pub struct ShiftMatcher<'a> {
    registry: &'a SignalRegistry,
}

impl<'a> ShiftMatcher<'a> {
    pub fn new(registry: &'a SignalRegistry) -> Self {
        Self { registry }
    }

    /// Absolute distance of every signal to `shift` in `dim`, in signal order
    fn distances(&self, shift: f64, dim: usize) -> impl Iterator<Item = (usize, f64)> + 'a {
        self.registry
            .signals()
            .iter()
            .enumerate()
            .filter_map(move |(index, signal)| {
                signal.shift(dim).map(|s| (index, (s - shift).abs()))
            })
    }

    /// All signals within `tolerance` of `shift`, nearest first.
    ///
    /// Signals at equal distance keep their registry order.
    pub fn pick_within_tolerance(&self, shift: f64, dim: usize, tolerance: f64) -> Vec<usize> {
        if !self.registry.contains_dim(dim) {
            return Vec::new();
        }
        let mut picked: Vec<(usize, f64)> = self
            .distances(shift, dim)
            .filter(|&(_, distance)| distance <= tolerance)
            .collect();
        // sort_by is stable, which keeps ties in insertion order
        picked.sort_by(|a, b| a.1.total_cmp(&b.1));

        picked.into_iter().map(|(index, _)| index).collect()
    }

    /// Signals closest to `shift`, if any lies within `tolerance`.
    ///
    /// More than one index is returned only on an exact distance tie.
    pub fn pick_closest(&self, shift: f64, dim: usize, tolerance: f64) -> Vec<usize> {
        if !self.registry.contains_dim(dim) {
            return Vec::new();
        }
        let min_distance = self
            .distances(shift, dim)
            .map(|(_, distance)| distance)
            .fold(tolerance, |min, distance| {
                if distance < min {
                    distance
                } else {
                    min
                }
            });

        self.distances(shift, dim)
            .filter(|&(_, distance)| distance == min_distance)
            .map(|(index, _)| index)
            .collect()
    }

    /// Signals carrying exactly the given multiplicity; `None` selects signals without one
    pub fn pick_by_multiplicity(&self, multiplicity: Option<&str>) -> Vec<usize> {
        self.registry
            .signals()
            .iter()
            .enumerate()
            .filter(|(_, signal)| signal.multiplicity() == multiplicity)
            .map(|(index, _)| index)
            .collect()
    }

    /// Closest signals that also carry the given multiplicity.
    ///
    /// This is how overlapping peaks are told apart when records are mapped
    /// back onto a registry.
    pub fn pick_closest_with_multiplicity(
        &self,
        shift: f64,
        dim: usize,
        tolerance: f64,
        multiplicity: Option<&str>,
    ) -> Vec<usize> {
        let allowed = self.pick_by_multiplicity(multiplicity);
        self.pick_closest(shift, dim, tolerance)
            .into_iter()
            .filter(|index| allowed.contains(index))
            .collect()
    }
}
