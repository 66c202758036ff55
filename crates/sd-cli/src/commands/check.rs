use std::path::Path;

use super::DuelOptions;
use crate::loader;

pub fn run(file: &Path) -> Result<(), String> {
    let data = loader::load(file)?;
    let config = super::duel_config(&data.duel, &DuelOptions::default())?;

    println!("  All checks passed for '{}'.", file.display());
    println!(
        "  {} competitors, {} moves (strongest {} pts), threshold {}",
        data.roster.len(),
        data.catalog.len(),
        data.catalog.max_points(),
        config.score_threshold
    );
    for mv in data.catalog.moves() {
        println!("    - {mv}");
    }
    if data.roster.len() < 2 {
        println!("  Warning: a tournament needs at least two competitors.");
    }

    Ok(())
}
