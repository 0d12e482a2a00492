use clap::Parser;
use tracing_subscriber::EnvFilter;

use signal_registry::cli;

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity flag
    let filter = if cli.verbose {
        EnvFilter::new("signal_registry=debug,info")
    } else {
        EnvFilter::new("signal_registry=warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    match cli.command {
        cli::Commands::Cluster(args) => {
            cli::cluster::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Pick(args) => {
            cli::pick::run(args, cli.format, cli.verbose)?;
        }
        cli::Commands::Assign(args) => {
            cli::assign::run(args, cli.format, cli.verbose)?;
        }
    }

    Ok(())
}
