//! CLI frontend for the Spellduel duel engine and tournament manager.

mod commands;
mod loader;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::DuelOptions;

#[derive(Parser)]
#[command(
    name = "spellduel",
    about = "Spellduel: turn-based wizard duels and champion-defends tournaments",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full tournament over every competitor in the data file
    Run {
        /// TOML file with competitors, moves, and optional duel settings
        file: PathBuf,

        #[command(flatten)]
        duel: DuelOptions,

        /// Never repeat a pairing; end the tournament instead
        #[arg(long)]
        strict: bool,

        /// Ask before starting each duel after the first
        #[arg(long)]
        step: bool,

        /// Print a JSON summary instead of the live duel log
        #[arg(long)]
        json: bool,
    },

    /// Run a single duel between two named competitors
    Duel {
        /// TOML file with competitors, moves, and optional duel settings
        file: PathBuf,

        /// Competitor who takes the opening turn (case-insensitive)
        first: String,

        /// Their opponent (case-insensitive)
        second: String,

        #[command(flatten)]
        duel: DuelOptions,

        /// Print the result as JSON instead of the live duel log
        #[arg(long)]
        json: bool,
    },

    /// Validate a data file without running anything
    Check {
        /// TOML file with competitors, moves, and optional duel settings
        file: PathBuf,
    },
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            file,
            duel,
            strict,
            step,
            json,
        } => commands::run::run(&file, &duel, strict, step, json),
        Commands::Duel {
            file,
            first,
            second,
            duel,
            json,
        } => commands::duel::run(&file, &first, &second, &duel, json),
        Commands::Check { file } => commands::check::run(&file),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// Log to stderr so stdout carries only the duel output. `RUST_LOG`
/// overrides the default `warn` filter.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
