use std::path::PathBuf;

use clap::Args;

use crate::cli::{display_or_dash, load_input, OutputFormat};
use crate::core::dataset::DataSet;

#[derive(Args)]
pub struct AssignArgs {
    /// NMRShiftDB spectrum string file (`shift;intensity[multiplicity];atomIndex|...`)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Nucleus observed in the spectrum
    #[arg(short, long, default_value = "13C")]
    pub nucleus: String,
}

/// Execute assign subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: AssignArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let data_set = load_input(&args.input, &args.nucleus)?;

    if verbose {
        eprintln!(
            "Parsed {} signals, {} atoms assigned",
            data_set.registry().signal_count(),
            data_set.assignment().assigned_atom_count(0)?
        );
    }

    match format {
        OutputFormat::Text => print_text(&args, &data_set)?,
        OutputFormat::Json => print_json(&args, &data_set)?,
        OutputFormat::Tsv => print_tsv(&data_set)?,
    }

    Ok(())
}

fn format_atoms(atoms: &[usize]) -> String {
    if atoms.is_empty() {
        return "-".to_string();
    }
    atoms
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

fn print_text(args: &AssignArgs, data_set: &DataSet) -> anyhow::Result<()> {
    let registry = data_set.registry();
    let assignment = data_set.assignment();

    println!("Signal Assignment");
    println!("{}", "=".repeat(60));

    println!("\nInput: {}", args.input.display());
    println!("  Nucleus: {}", args.nucleus);
    println!("  Signals: {}", registry.signal_count());
    println!("  Assigned atoms: {}", assignment.assigned_atom_count(0)?);

    println!("\nSignals:");
    for (index, signal) in registry.signals().iter().enumerate() {
        let equivalent = registry.equivalent_signals(index)?;
        let note = if !equivalent.is_empty() {
            format!("  (equivalent to {equivalent:?})")
        } else {
            String::new()
        };
        println!(
            "  #{index:<4} {:>10} ppm  {:<4} atoms: {}{note}",
            display_or_dash(signal.shift(0)),
            display_or_dash(signal.multiplicity()),
            format_atoms(assignment.assignment(0, index)?),
        );
    }

    Ok(())
}

fn print_json(args: &AssignArgs, data_set: &DataSet) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "input": args.input.display().to_string(),
        "nucleus": args.nucleus,
        "consistent": data_set.is_consistent(),
        "data_set": data_set,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(data_set: &DataSet) -> anyhow::Result<()> {
    let registry = data_set.registry();
    println!("signal\tshift\tmultiplicity\tintensity\tequivalence\tatoms");
    for (index, signal) in registry.signals().iter().enumerate() {
        println!(
            "{index}\t{}\t{}\t{}\t{}\t{}",
            display_or_dash(signal.shift(0)),
            display_or_dash(signal.multiplicity()),
            display_or_dash(signal.intensity()),
            display_or_dash(registry.equivalences()[index]),
            format_atoms(data_set.assignment().assignment(0, index)?),
        );
    }
    Ok(())
}
