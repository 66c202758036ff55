use std::path::Path;

use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;

use sd_arena::{DuelEngine, NullSink};
use sd_core::{Competitor, Roster};

use super::DuelOptions;
use crate::loader;

pub fn run(
    file: &Path,
    first: &str,
    second: &str,
    options: &DuelOptions,
    json: bool,
) -> Result<(), String> {
    let data = loader::load(file)?;
    let config = super::duel_config(&data.duel, options)?;
    let mut a = find(&data.roster, first)?;
    let mut b = find(&data.roster, second)?;

    let engine = DuelEngine::new(config).map_err(super::describe)?;
    let mut rng = StdRng::seed_from_u64(options.seed);

    if json {
        let result = engine
            .run_duel(&mut a, &mut b, &data.catalog, &mut rng, &NullSink)
            .map_err(super::describe)?;
        let out = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("JSON serialization failed: {e}"))?;
        println!("{out}");
        return Ok(());
    }

    let result = super::with_renderer(|sink| {
        engine.run_duel(&mut a, &mut b, &data.catalog, &mut rng, sink)
    })?
    .map_err(super::describe)?;

    println!();
    println!("{}", super::results_table(std::slice::from_ref(&result)));
    println!(
        "  {} {}",
        "Winner:".green().bold(),
        if result.winner().id == a.id { &a } else { &b }
    );
    Ok(())
}

fn find(roster: &Roster, name: &str) -> Result<Competitor, String> {
    roster
        .find_by_name(name)
        .cloned()
        .ok_or_else(|| format!("no competitor named '{name}'"))
}
