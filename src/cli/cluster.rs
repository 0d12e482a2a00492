use std::path::PathBuf;

use clap::Args;

use crate::cli::{display_or_dash, load_input, OutputFormat};
use crate::core::registry::SignalRegistry;

#[derive(Args)]
pub struct ClusterArgs {
    /// Input file (NMRShiftDB spectrum string, TSV, or CSV; optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Nucleus observed in the input
    #[arg(short, long, default_value = "13C")]
    pub nucleus: String,

    /// Maximum shift deviation (ppm) for two signals to be considered equivalent
    #[arg(short, long, default_value = "0.0")]
    pub tolerance: f64,
}

/// Execute cluster subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: ClusterArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let mut data_set = load_input(&args.input, &args.nucleus)?;
    let registry = data_set.registry_mut();
    let linked = registry.detect_equivalences(args.tolerance);

    if verbose {
        eprintln!(
            "Parsed {} signals; {linked} linked to an earlier signal",
            registry.signal_count()
        );
    }

    let registry = data_set.registry();
    match format {
        OutputFormat::Text => print_text(&args, registry),
        OutputFormat::Json => print_json(&args, registry)?,
        OutputFormat::Tsv => print_tsv(registry),
    }

    Ok(())
}

fn class_label(registry: &SignalRegistry, members: &[usize]) -> String {
    let first = members[0];
    format!(
        "{} ppm, {}",
        display_or_dash(registry.signals()[first].shift(0)),
        display_or_dash(registry.signals()[first].multiplicity())
    )
}

fn print_text(args: &ClusterArgs, registry: &SignalRegistry) {
    let classes = registry.equivalent_signal_classes();

    println!("Equivalence Classes");
    println!("{}", "=".repeat(60));

    println!("\nInput: {}", args.input.display());
    println!("  Nucleus: {}", args.nucleus);
    println!("  Signals: {}", registry.signal_count());
    println!(
        "  Nuclei (with equivalences): {}",
        registry.signal_count_with_equivalences()
    );
    println!("  Tolerance: {} ppm", args.tolerance);
    println!("  Classes: {}", classes.len());

    println!("\nSignals:");
    for (index, signal) in registry.signals().iter().enumerate() {
        println!(
            "  #{index:<4} {:>10}  {:<4} -> {}",
            display_or_dash(signal.shift(0)),
            display_or_dash(signal.multiplicity()),
            display_or_dash(registry.equivalences()[index]),
        );
    }

    println!("\nClasses:");
    for (class_id, members) in classes.iter().enumerate() {
        let members_text: Vec<String> = members.iter().map(ToString::to_string).collect();
        println!(
            "  {class_id}: [{}] ({})",
            members_text.join(", "),
            class_label(registry, members)
        );
    }
}

fn print_json(args: &ClusterArgs, registry: &SignalRegistry) -> anyhow::Result<()> {
    let signals: Vec<serde_json::Value> = registry
        .signals()
        .iter()
        .enumerate()
        .map(|(index, signal)| {
            serde_json::json!({
                "index": index,
                "shift": signal.shift(0),
                "multiplicity": signal.multiplicity(),
                "intensity": signal.intensity(),
                "equivalence": registry.equivalences()[index],
            })
        })
        .collect();

    let output = serde_json::json!({
        "input": args.input.display().to_string(),
        "nucleus": args.nucleus,
        "tolerance": args.tolerance,
        "signal_count": registry.signal_count(),
        "signal_count_with_equivalences": registry.signal_count_with_equivalences(),
        "signals": signals,
        "classes": registry.equivalent_signal_classes(),
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(registry: &SignalRegistry) {
    println!("class\tsignal\tshift\tmultiplicity\tequivalence");
    for (class_id, members) in registry.equivalent_signal_classes().iter().enumerate() {
        for &index in members {
            let signal = &registry.signals()[index];
            println!(
                "{class_id}\t{index}\t{}\t{}\t{}",
                display_or_dash(signal.shift(0)),
                display_or_dash(signal.multiplicity()),
                display_or_dash(registry.equivalences()[index]),
            );
        }
    }
}
