//! Command-line interface for merge-sources
//!
//! Running without a subcommand behaves like `merge`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod check;
mod completions;
mod merge;

/// Concatenate an ordered list of source files into a single annotated bundle
#[derive(Parser)]
#[command(name = "merge-sources")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    merge: merge::MergeArgs,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge the configured files into the output file (default)
    Merge(merge::MergeArgs),

    /// Show which configured files are present without writing anything
    Check(check::CheckArgs),

    /// Print a shell completion script
    Completions(completions::CompletionsArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only the merge diagnostics.
    let filter = if cli.verbose {
        EnvFilter::from_default_env().add_directive(Level::DEBUG.into())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();

    match cli.command {
        Some(Commands::Merge(args)) => merge::run(args),
        Some(Commands::Check(args)) => check::run(args),
        Some(Commands::Completions(args)) => completions::run(args),
        None => merge::run(cli.merge),
    }
}
