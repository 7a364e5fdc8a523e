//! review-lens CLI
//!
//! # Commands
//!
//! - `analyze`: audit, tune and score a review corpus; JSON output
//! - `audit`: culprit tables for the pristine lexicon only
//! - `normalize`: token stream of one text
//! - `score`: compound and category of one text
//!
//! Exit code 1 on any error.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

mod commands;

use commands::{AnalyzeArgs, AuditArgs, NormalizeArgs, ScoreArgs};

/// Lexicon-tuned sentiment and aspect scoring for game reviews
#[derive(Parser)]
#[command(name = "review-lens")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full analysis over a corpus
    ///
    /// Audits the pristine lexicon, applies the correction set, then scores
    /// every review and its aspects with the tuned lexicon.
    Analyze(AnalyzeArgs),
    /// Print the culprit tables for the pristine lexicon
    Audit(AuditArgs),
    /// Print the normalized token stream of a text
    Normalize(NormalizeArgs),
    /// Score a text
    Score(ScoreArgs),
}

fn main() {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Analyze(args) => commands::analyze(args),
        Commands::Audit(args) => commands::audit(args),
        Commands::Normalize(args) => commands::normalize(args),
        Commands::Score(args) => commands::score(args),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "command failed");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
