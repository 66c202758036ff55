use std::path::Path;

use colored::Colorize;
use serde::Serialize;

use sd_arena::{NullSink, RematchPolicy, Tournament, TournamentConfig};
use sd_core::{CompetitorTag, DuelResult};

use super::DuelOptions;
use crate::loader;

#[derive(Serialize)]
struct Summary<'a> {
    seed: u64,
    round: u32,
    duels_completed: usize,
    remaining: usize,
    champion: Option<CompetitorTag>,
    history: &'a [DuelResult],
}

pub fn run(
    file: &Path,
    options: &DuelOptions,
    strict: bool,
    step: bool,
    json: bool,
) -> Result<(), String> {
    let data = loader::load(file)?;
    let duel = super::duel_config(&data.duel, options)?;
    let policy = if strict {
        RematchPolicy::Strict
    } else {
        RematchPolicy::AllowFallback
    };
    let config = TournamentConfig::default()
        .with_seed(options.seed)
        .with_duel(duel)
        .with_rematch_policy(policy);
    let mut tournament =
        Tournament::new(data.roster, data.catalog, config).map_err(super::describe)?;

    if !json {
        println!(
            "  {} {}",
            "Tournament".bold(),
            format!(
                "({} competitors, {} moves, threshold {}, seed {})",
                tournament.competitors().len(),
                tournament.catalog().len(),
                tournament.config().duel.score_threshold,
                options.seed
            )
            .dimmed()
        );
        println!();
    }

    if !json && !tournament.has_next_duel() {
        println!("  Not enough competitors for a duel.");
        return Ok(());
    }

    while tournament.has_next_duel() {
        if step
            && tournament.duels_completed() > 0
            && !super::confirm("Continue to the next duel?")?
        {
            break;
        }

        if json {
            tournament
                .run_next_duel(&NullSink)
                .map_err(super::describe)?;
        } else {
            let heading = format!("Round {}", tournament.round() + 1);
            println!("  {}", heading.bold().underline());
            super::with_renderer(|sink| tournament.run_next_duel(sink))?
                .map_err(super::describe)?;
            println!();
        }
    }

    let stats = tournament.stats();
    if json {
        let summary = Summary {
            seed: options.seed,
            round: stats.round,
            duels_completed: stats.duels_completed,
            remaining: stats.remaining,
            champion: stats.champion,
            history: tournament.history(),
        };
        let out = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    if !tournament.history().is_empty() {
        println!("  {}", "Results".bold().underline());
        println!();
        println!("{}", super::results_table(tournament.history()));
        println!();
    }
    if let Some(champion) = tournament.champion() {
        println!("  {} {}", "Champion:".green().bold(), champion);
    }
    println!(
        "  {} duels over {} rounds, {} still queued",
        stats.duels_completed, stats.round, stats.remaining
    );

    Ok(())
}
