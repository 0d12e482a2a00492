//! Shift matching and equivalence detection.
//!
//! This module provides the query side of a registry:
//!
//! - [`ShiftMatcher`]: Tolerance-window, closest-shift and multiplicity queries
//! - [`EquivalenceClasses`]: Partition of signals derived from the equivalence table
//!
//! It also extends [`SignalRegistry`] with the operations that maintain the
//! equivalence table (`set_equivalence`, `detect_equivalences`,
//! `equivalent_signal_classes`, ...).
//!
//! ## Equivalence Detection
//!
//! Detection walks the signals in registry order and links each one to the
//! nearest *earlier* signal within the tolerance window that has the same
//! multiplicity. The resulting table is closed into classes in both directions.
//!
//! ## Example
//!
//! ```rust
//! use signal_registry::{Signal, SignalRegistry};
//!
//! let mut registry = SignalRegistry::new(["13C"]);
//! for shift in [30.0, 30.0, 75.0] {
//!     registry
//!         .add_signal(Signal::one_dimensional("13C", shift).with_multiplicity("s"))
//!         .unwrap();
//! }
//!
//! registry.detect_equivalences(0.0);
//! assert_eq!(registry.equivalent_signal_classes(), vec![vec![0, 1], vec![2]]);
//!
//! let picked = registry.matcher().pick_within_tolerance(30.05, 0, 0.1);
//! assert_eq!(picked, vec![0, 1]);
//! ```
//!
//! [`SignalRegistry`]: crate::core::registry::SignalRegistry

pub mod equivalence;
pub mod matcher;

pub use equivalence::EquivalenceClasses;
pub use matcher::ShiftMatcher;
