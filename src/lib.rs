//! # signal-registry
//!
//! A library for keeping the signals of one NMR spectrum and reasoning about
//! which of them are equivalent.
//!
//! A spectrum lists one signal per resonance, but chemically equivalent nuclei
//! (the three protons of a methyl, the two ortho carbons of a phenyl ring)
//! collapse onto the same shift and multiplicity. Before signals can be matched
//! against predictions or assigned to atoms, those duplicates have to be
//! recognised and grouped.
//!
//! `signal-registry` stores signals in insertion order next to a table of
//! equivalence links and keeps the derived equivalence classes current after
//! every change.
//!
//! ## Features
//!
//! - **Equivalence detection**: Links each signal to the first earlier signal
//!   within a shift tolerance that has the same multiplicity
//! - **Equivalence classes**: Groups linked signals, recomputed on every mutation
//! - **Shift picking**: Finds signals within a tolerance window, nearest first
//! - **Assignments**: Maps signals to atom indices of an external structure
//! - **Parsers**: NMRShiftDB spectrum strings and TSV/CSV signal tables
//!
//! ## Example
//!
//! ```rust
//! use signal_registry::{Signal, SignalRegistry};
//!
//! let mut registry = SignalRegistry::new(["13C"]);
//! registry.add_signal(Signal::one_dimensional("13C", 30.0).with_multiplicity("s")).unwrap();
//! registry.add_signal(Signal::one_dimensional("13C", 30.0).with_multiplicity("s")).unwrap();
//! registry.add_signal(Signal::one_dimensional("13C", 75.0).with_multiplicity("d")).unwrap();
//!
//! registry.detect_exact_equivalences();
//! assert_eq!(registry.equivalences(), &[None, Some(0), None]);
//! assert_eq!(registry.equivalent_signal_classes(), vec![vec![0, 1], vec![2]]);
//!
//! assert_eq!(registry.matcher().pick_within_tolerance(75.1, 0, 0.5), vec![2]);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Signals, the registry, assignments and the structure seam
//! - [`matching`]: Equivalence classes and shift queries
//! - [`parsing`]: Parsers for NMRShiftDB spectrum strings and TSV/CSV tables
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use core::assignment::Assignment;
pub use core::dataset::DataSet;
pub use core::registry::SignalRegistry;
pub use core::signal::Signal;
pub use core::structure::Structure;
pub use core::types::*;
pub use matching::equivalence::EquivalenceClasses;
pub use matching::matcher::ShiftMatcher;
