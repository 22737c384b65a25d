//! purrsync CLI
//!
//! Splits a list of files into main, per-package and orphan partitions and
//! syncs each one with rsync.

mod cli;
mod error;
mod sync;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use cli::Cli;
use error::{CliError, Result};
use purrsync_exec::StdinProducer;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = sync::load_config(&cli)?;
    let report = sync::run_sync(&config, &StdinProducer::stdin())?;
    sync::print_report(&report, config.dry_run);
    Ok(())
}

/// Log to stderr: everything at DEBUG with `--verbose`, else as `RUST_LOG`
/// says, defaulting to warnings.
fn init_tracing(verbose: bool) -> Result<()> {
    let result = if verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    } else {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
    };
    result.map_err(|e| CliError::user(format!("Failed to set tracing subscriber: {}", e)))?;
    tracing::debug!("Verbose mode enabled");
    Ok(())
}
