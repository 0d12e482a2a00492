//! Command-line interface for signal-registry.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **cluster**: Detect equivalent signals and print the equivalence classes
//! - **pick**: Find signals matching a query shift
//! - **assign**: Build a signal-to-atom assignment from an NMRShiftDB spectrum
//!
//! ## Usage
//!
//! ```text
//! # Cluster a signal table with a 0.1 ppm window
//! signal-registry cluster signals.tsv --nucleus 13C --tolerance 0.1
//!
//! # Closest doublet to 128.4 ppm
//! signal-registry pick signals.tsv --shift 128.4 --tolerance 0.5 --closest --multiplicity d
//!
//! # JSON output for scripting
//! signal-registry assign spectrum.txt --format json
//! ```

use std::path::Path;

use clap::{Parser, Subcommand};

use crate::core::dataset::DataSet;
use crate::parsing;
use crate::utils::validation::validate_nucleus;

pub mod assign;
pub mod cluster;
pub mod pick;

#[derive(Parser)]
#[command(name = "signal-registry")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Cluster equivalent NMR signals and match shifts within tolerance windows")]
#[command(
    long_about = "signal-registry loads the signals of one spectrum and answers the questions needed to align it with predictions or a structure:\n- Which signals are equivalent (same shift and multiplicity)\n- Which signals lie within a tolerance window of a query shift\n- Which atoms each signal is assigned to"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Detect equivalent signals and print the equivalence classes
    Cluster(cluster::ClusterArgs),

    /// Find signals matching a query shift
    Pick(pick::PickArgs),

    /// Assign signals to atoms from an NMRShiftDB spectrum string
    Assign(assign::AssignArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load signals from a file, choosing the parser by extension.
///
/// `.tsv` and `.csv` (optionally gzipped) are read as signal tables; anything
/// else is read as an NMRShiftDB spectrum string.
pub(crate) fn load_input(path: &Path, nucleus: &str) -> anyhow::Result<DataSet> {
    let nucleus = validate_nucleus(nucleus)?;

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let name = name.strip_suffix(".gz").unwrap_or(&name);

    let data_set = if name.ends_with(".tsv") {
        DataSet::new(parsing::tsv::parse_tsv_file(path, '\t', &nucleus)?)
    } else if name.ends_with(".csv") {
        DataSet::new(parsing::tsv::parse_tsv_file(path, ',', &nucleus)?)
    } else {
        parsing::nmrshiftdb::parse_spectrum_file(path, &nucleus)?
    };

    Ok(data_set)
}

/// Render an optional value for text/TSV output
pub(crate) fn display_or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}
