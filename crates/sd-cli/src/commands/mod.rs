pub mod check;
pub mod duel;
pub mod run;

use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use sd_arena::{ArenaError, ChannelSink, DuelConfig, DuelEvent, EventSink, PacingWindow};
use sd_core::DuelResult;

use crate::loader::DuelSection;

/// Duel settings shared by `run` and `duel`. Flags override the data file.
#[derive(Debug, Clone, Default, Args)]
pub struct DuelOptions {
    /// RNG seed for reproducible duels
    #[arg(short, long, default_value = "42")]
    pub seed: u64,

    /// Score that ends a duel (default: 250)
    #[arg(short, long)]
    pub threshold: Option<u32>,

    /// Chance (0.0-1.0) that a scoring turn stuns the opponent (default: 0.1)
    #[arg(long)]
    pub stun_chance: Option<f64>,

    /// Shortest pause between turns in milliseconds (default: 250)
    #[arg(long)]
    pub pace_min_ms: Option<u64>,

    /// Longest pause between turns in milliseconds (default: 500)
    #[arg(long)]
    pub pace_max_ms: Option<u64>,

    /// Abort a duel that runs longer than this many seconds
    #[arg(long)]
    pub time_limit_secs: Option<u64>,

    /// Skip the pauses between turns
    #[arg(long)]
    pub instant: bool,
}

/// Merge flags, the data file's `[duel]` table, and defaults.
fn duel_config(file: &DuelSection, options: &DuelOptions) -> Result<DuelConfig, String> {
    let defaults = DuelConfig::default();
    let pacing = if options.instant {
        PacingWindow::instant()
    } else {
        PacingWindow::new(
            options
                .pace_min_ms
                .or(file.pace_min_ms)
                .unwrap_or(defaults.pacing.min_ms),
            options
                .pace_max_ms
                .or(file.pace_max_ms)
                .unwrap_or(defaults.pacing.max_ms),
        )
    };

    let mut config = DuelConfig::default()
        .with_threshold(
            options
                .threshold
                .or(file.threshold)
                .unwrap_or(defaults.score_threshold),
        )
        .with_stun_chance(
            options
                .stun_chance
                .or(file.stun_chance)
                .unwrap_or(defaults.stun_chance),
        )
        .with_pacing(pacing);
    if let Some(secs) = options.time_limit_secs.or(file.time_limit_secs) {
        config = config.with_time_limit(Duration::from_secs(secs));
    }

    config.validate().map_err(describe)?;
    Ok(config)
}

/// Word an engine error for the operator. Validation errors point at the
/// inputs; state and abort errors are reported as they are.
fn describe(err: ArenaError) -> String {
    if err.is_validation() {
        format!("{err} (check the data file and flags)")
    } else {
        err.to_string()
    }
}

/// Run `f` with a sink that hands events to a rendering thread, so slow
/// terminal output never holds up the duel. Returns once every event has
/// been printed.
fn with_renderer<T>(f: impl FnOnce(&dyn EventSink) -> T) -> Result<T, String> {
    let (tx, rx) = mpsc::channel::<DuelEvent>();
    let renderer = thread::spawn(move || {
        for event in rx {
            println!("{}", render_event(&event));
        }
    });
    let outcome = f(&ChannelSink::new(tx));
    renderer
        .join()
        .map_err(|_| "event renderer panicked".to_string())?;
    Ok(outcome)
}

fn render_event(event: &DuelEvent) -> String {
    match event {
        DuelEvent::DuelStarted { first, second } => format!(
            "  {} {} vs {}",
            "DUEL".bold(),
            first.name.cyan().bold(),
            second.name.magenta().bold()
        ),
        DuelEvent::MoveResolved {
            competitor,
            mv,
            score,
        } => format!(
            "    {} casts {} {} {}",
            competitor.name.bold(),
            mv.name().yellow(),
            format!("(+{})", mv.points()).dimmed(),
            format!("total {score}").dimmed()
        ),
        DuelEvent::Stunned { competitor } => {
            format!("    {} {}", competitor.name.bold(), "is stunned".red())
        }
        DuelEvent::Recovered { competitor } => format!(
            "    {} {}",
            competitor.name.bold(),
            "recovers and loses the turn".blue()
        ),
        DuelEvent::DuelFinished { result } => {
            format!("  {} {}", "WINNER".green().bold(), result)
        }
    }
}

/// Table of finished duels, numbered from 1.
fn results_table(results: &[DuelResult]) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Duel", "Winner", "Loser", "Score", "Moves"]);
    for (i, result) in results.iter().enumerate() {
        table.add_row(vec![
            (i + 1).to_string(),
            result.winner().name.clone(),
            result.loser().name.clone(),
            format!("{}-{}", result.winner_score(), result.loser_score()),
            result.winner_moves().to_string(),
        ]);
    }
    table
}

/// Ask a yes/no question on stdin. End of input counts as "no".
fn confirm(question: &str) -> Result<bool, String> {
    print!("  {question} [Y/n] ");
    io::stdout().flush().map_err(|e| e.to_string())?;

    let mut answer = String::new();
    let read = io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| format!("cannot read answer: {e}"))?;
    if read == 0 {
        println!();
        return Ok(false);
    }
    Ok(!matches!(
        answer.trim().to_ascii_lowercase().as_str(),
        "n" | "no" | "q" | "quit"
    ))
}
