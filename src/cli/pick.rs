use std::path::PathBuf;

use clap::Args;

use crate::cli::{display_or_dash, load_input, OutputFormat};
use crate::core::registry::SignalRegistry;
use crate::utils::validation::normalize_multiplicity;

#[derive(Args)]
pub struct PickArgs {
    /// Input file (NMRShiftDB spectrum string, TSV, or CSV; optionally gzipped)
    #[arg(required = true)]
    pub input: PathBuf,

    /// Nucleus observed in the input
    #[arg(short, long, default_value = "13C")]
    pub nucleus: String,

    /// Query shift in ppm
    #[arg(short, long, allow_hyphen_values = true)]
    pub shift: f64,

    /// Maximum distance (ppm) between the query and a picked signal
    #[arg(short, long, default_value = "0.0")]
    pub tolerance: f64,

    /// Dimension to search
    #[arg(short, long, default_value = "0")]
    pub dim: usize,

    /// Only report the closest signal(s)
    #[arg(short, long)]
    pub closest: bool,

    /// Only report signals with this multiplicity ('-' selects signals without one)
    #[arg(short, long)]
    pub multiplicity: Option<String>,
}

/// Execute pick subcommand
///
/// # Errors
///
/// Returns an error if the input cannot be parsed.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: PickArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let data_set = load_input(&args.input, &args.nucleus)?;
    let registry = data_set.registry();

    if verbose {
        eprintln!(
            "Parsed {} signals in {} dimension(s)",
            registry.signal_count(),
            registry.dimension_count()
        );
        if !registry.contains_dim(args.dim) {
            eprintln!("Dimension {} is not declared; nothing to pick", args.dim);
        }
    }

    let picked = pick(&args, registry);

    match format {
        OutputFormat::Text => print_text(&args, registry, &picked),
        OutputFormat::Json => print_json(&args, registry, &picked)?,
        OutputFormat::Tsv => print_tsv(&args, registry, &picked),
    }

    Ok(())
}

/// Run the shift query, then narrow by multiplicity if one was requested
fn pick(args: &PickArgs, registry: &SignalRegistry) -> Vec<usize> {
    let matcher = registry.matcher();
    let multiplicity = args.multiplicity.as_deref().map(normalize_multiplicity);

    match (args.closest, multiplicity) {
        (true, Some(multiplicity)) => matcher.pick_closest_with_multiplicity(
            args.shift,
            args.dim,
            args.tolerance,
            multiplicity.as_deref(),
        ),
        (true, None) => matcher.pick_closest(args.shift, args.dim, args.tolerance),
        (false, Some(multiplicity)) => {
            let allowed = matcher.pick_by_multiplicity(multiplicity.as_deref());
            matcher
                .pick_within_tolerance(args.shift, args.dim, args.tolerance)
                .into_iter()
                .filter(|index| allowed.contains(index))
                .collect()
        }
        (false, None) => matcher.pick_within_tolerance(args.shift, args.dim, args.tolerance),
    }
}

fn distance(args: &PickArgs, registry: &SignalRegistry, index: usize) -> Option<f64> {
    registry.signals()[index]
        .shift(args.dim)
        .map(|shift| (shift - args.shift).abs())
}

fn print_text(args: &PickArgs, registry: &SignalRegistry, picked: &[usize]) {
    println!("Shift Query");
    println!("{}", "=".repeat(60));

    println!("\nInput: {}", args.input.display());
    println!("  Signals: {}", registry.signal_count());
    println!(
        "  Query: {} ppm +/- {} (dim {})",
        args.shift, args.tolerance, args.dim
    );
    if let Some(multiplicity) = &args.multiplicity {
        println!("  Multiplicity: {multiplicity}");
    }

    if picked.is_empty() {
        println!("\nNo signals found within tolerance.");
        return;
    }

    println!("\nMatches ({}):", picked.len());
    for (rank, &index) in picked.iter().enumerate() {
        let signal = &registry.signals()[index];
        println!(
            "  {}. #{index:<4} {:>10} ppm  {:<4} (distance {:.4})",
            rank + 1,
            display_or_dash(signal.shift(args.dim)),
            display_or_dash(signal.multiplicity()),
            distance(args, registry, index).unwrap_or(f64::NAN),
        );
    }
}

fn print_json(args: &PickArgs, registry: &SignalRegistry, picked: &[usize]) -> anyhow::Result<()> {
    let matches: Vec<serde_json::Value> = picked
        .iter()
        .map(|&index| {
            let signal = &registry.signals()[index];
            serde_json::json!({
                "index": index,
                "shift": signal.shift(args.dim),
                "multiplicity": signal.multiplicity(),
                "distance": distance(args, registry, index),
            })
        })
        .collect();

    let output = serde_json::json!({
        "input": args.input.display().to_string(),
        "shift": args.shift,
        "tolerance": args.tolerance,
        "dim": args.dim,
        "closest": args.closest,
        "multiplicity": args.multiplicity,
        "matches": matches,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn print_tsv(args: &PickArgs, registry: &SignalRegistry, picked: &[usize]) {
    println!("rank\tsignal\tshift\tmultiplicity\tdistance");
    for (rank, &index) in picked.iter().enumerate() {
        let signal = &registry.signals()[index];
        println!(
            "{}\t{index}\t{}\t{}\t{}",
            rank + 1,
            display_or_dash(signal.shift(args.dim)),
            display_or_dash(signal.multiplicity()),
            display_or_dash(distance(args, registry, index)),
        );
    }
}
