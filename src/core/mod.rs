//! Core data types for spectral signals and their assignment.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`Signal`]: A single resonance with per-dimension shifts, multiplicity and intensity
//! - [`SignalRegistry`]: The ordered signals of one experiment plus their equivalence table
//! - [`Assignment`]: Signal-to-atom mapping for an external structure
//! - [`DataSet`]: A registry and its assignment kept in the same shape
//! - [`Structure`]: Read-only seam to an external molecular structure
//!
//! ## Nuclei
//!
//! Dimensions are declared by nucleus label when a registry is created and never
//! change afterwards:
//!
//! | Experiment | Nuclei           |
//! |------------|------------------|
//! | 13C        | `["13C"]`        |
//! | 1H         | `["1H"]`         |
//! | HSQC       | `["1H", "13C"]`  |
//!
//! A signal is only accepted by a registry whose nuclei match its own exactly,
//! in count and in order.
//!
//! [`Signal`]: signal::Signal
//! [`SignalRegistry`]: registry::SignalRegistry
//! [`Assignment`]: assignment::Assignment
//! [`DataSet`]: dataset::DataSet
//! [`Structure`]: structure::Structure

pub mod assignment;
pub mod dataset;
pub mod registry;
pub mod signal;
pub mod structure;
pub mod types;
