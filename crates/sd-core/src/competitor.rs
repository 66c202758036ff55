use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::moves::Move;

/// Unique identifier for every competitor in a roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompetitorId(pub Uuid);

impl CompetitorId {
    /// Generate a new random competitor ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Order two IDs so the smaller comes first. Used as the key for an
    /// unordered pair of competitors.
    pub fn ordered_pair(a: Self, b: Self) -> (Self, Self) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl Default for CompetitorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CompetitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

/// Lightweight identity snapshot of a competitor, carried by events and results.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CompetitorTag {
    /// The competitor's identifier.
    pub id: CompetitorId,
    /// The competitor's display name.
    pub name: String,
}

impl fmt::Display for CompetitorTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A duel participant.
///
/// Identity (`id`, `name`, `house`) is fixed at roster load. The score, move
/// counter and stun flag are per-duel state: the duel engine resets them when
/// a duel starts and is the only writer while the duel runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competitor {
    /// Unique identifier.
    pub id: CompetitorId,
    /// Display name, unique within a roster.
    pub name: String,
    /// Group or affiliation tag.
    pub house: String,
    score: u32,
    moves_used: u32,
    stunned: bool,
}

impl Competitor {
    /// Create a competitor with a fresh ID. Name and house are trimmed and
    /// must not be blank.
    pub fn new(name: impl Into<String>, house: impl Into<String>) -> CoreResult<Self> {
        let name = name.into().trim().to_string();
        let house = house.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidName(name));
        }
        if house.is_empty() {
            return Err(CoreError::InvalidName(format!("{name} (blank house)")));
        }
        Ok(Self {
            id: CompetitorId::new(),
            name,
            house,
            score: 0,
            moves_used: 0,
            stunned: false,
        })
    }

    /// Points accumulated in the current (or last) duel.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of moves landed in the current (or last) duel.
    pub fn moves_used(&self) -> u32 {
        self.moves_used
    }

    /// Whether the competitor will lose their next turn.
    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    /// Clear all per-duel state.
    pub fn reset_duel_state(&mut self) {
        self.score = 0;
        self.moves_used = 0;
        self.stunned = false;
    }

    /// Land a move: add its points and count it. Returns the new score.
    pub fn apply_move(&mut self, mv: &Move) -> u32 {
        self.score = self.score.saturating_add(mv.points());
        self.moves_used += 1;
        self.score
    }

    /// Mark the competitor as stunned.
    pub fn stun(&mut self) {
        self.stunned = true;
    }

    /// Clear the stun flag.
    pub fn recover(&mut self) {
        self.stunned = false;
    }

    /// Identity snapshot for events and results.
    pub fn tag(&self) -> CompetitorTag {
        CompetitorTag {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

impl fmt::Display for Competitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.house)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_competitor_starts_clean() {
        let c = Competitor::new("  Merlin ", "Avalon").unwrap();
        assert_eq!(c.name, "Merlin");
        assert_eq!(c.house, "Avalon");
        assert_eq!(c.score(), 0);
        assert_eq!(c.moves_used(), 0);
        assert!(!c.is_stunned());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(matches!(
            Competitor::new("   ", "Avalon"),
            Err(CoreError::InvalidName(_))
        ));
        assert!(Competitor::new("Merlin", "").is_err());
    }

    #[test]
    fn apply_move_accumulates() {
        let mut c = Competitor::new("Merlin", "Avalon").unwrap();
        let mv = Move::new("Spark", 5).unwrap();
        assert_eq!(c.apply_move(&mv), 5);
        assert_eq!(c.apply_move(&mv), 10);
        assert_eq!(c.moves_used(), 2);
    }

    #[test]
    fn reset_clears_duel_state() {
        let mut c = Competitor::new("Merlin", "Avalon").unwrap();
        c.apply_move(&Move::new("Spark", 5).unwrap());
        c.stun();
        c.reset_duel_state();
        assert_eq!(c.score(), 0);
        assert_eq!(c.moves_used(), 0);
        assert!(!c.is_stunned());
    }

    #[test]
    fn stun_and_recover() {
        let mut c = Competitor::new("Merlin", "Avalon").unwrap();
        c.stun();
        assert!(c.is_stunned());
        c.recover();
        assert!(!c.is_stunned());
    }

    #[test]
    fn ids_are_unique() {
        let a = Competitor::new("A", "X").unwrap();
        let b = Competitor::new("A", "X").unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.id.to_string().len(), 8);
    }

    #[test]
    fn tag_and_display() {
        let c = Competitor::new("Merlin", "Avalon").unwrap();
        assert_eq!(c.to_string(), "Merlin (Avalon)");
        let tag = c.tag();
        assert_eq!(tag.id, c.id);
        assert_eq!(tag.to_string(), "Merlin");
    }

    #[test]
    fn ordered_pair_ignores_argument_order() {
        let a = CompetitorId::new();
        let b = CompetitorId::new();
        assert_eq!(CompetitorId::ordered_pair(a, b), CompetitorId::ordered_pair(b, a));
        let (low, high) = CompetitorId::ordered_pair(a, b);
        assert!(low <= high);
    }
}
