//! Data file loading: competitors, moves, and optional duel settings.

use std::path::Path;

use serde::Deserialize;

use sd_core::{Move, MoveCatalog, Roster};

/// Everything a data file provides, already validated.
#[derive(Debug)]
pub struct GameData {
    pub roster: Roster,
    pub catalog: MoveCatalog,
    pub duel: DuelSection,
}

/// Optional `[duel]` table. Command-line flags take precedence.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DuelSection {
    pub threshold: Option<u32>,
    pub stun_chance: Option<f64>,
    pub pace_min_ms: Option<u64>,
    pub pace_max_ms: Option<u64>,
    pub time_limit_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DataFile {
    #[serde(default)]
    competitors: Vec<CompetitorEntry>,
    #[serde(default)]
    moves: Vec<MoveEntry>,
    #[serde(default)]
    duel: DuelSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CompetitorEntry {
    name: String,
    house: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct MoveEntry {
    name: String,
    points: u32,
}

/// Read and validate a data file.
pub fn load(path: &Path) -> Result<GameData, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    parse(&text).map_err(|e| format!("{}: {e}", path.display()))
}

/// Parse and validate data file contents.
pub fn parse(text: &str) -> Result<GameData, String> {
    let file: DataFile = toml::from_str(text).map_err(|e| format!("invalid data file: {e}"))?;

    let roster = Roster::from_entries(file.competitors.into_iter().map(|c| (c.name, c.house)))
        .map_err(|e| format!("competitors: {e}"))?;

    let moves = file
        .moves
        .into_iter()
        .map(|m| Move::new(m.name, m.points))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("moves: {e}"))?;
    let catalog = MoveCatalog::new(moves).map_err(|e| format!("moves: {e}"))?;

    tracing::debug!(
        competitors = roster.len(),
        moves = catalog.len(),
        "data file loaded"
    );
    Ok(GameData {
        roster,
        catalog,
        duel: file.duel,
    })
}
