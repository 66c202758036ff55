use std::fmt;

use serde::Serialize;

use crate::competitor::{Competitor, CompetitorId, CompetitorTag};
use crate::error::{CoreError, CoreResult};

/// Immutable record of a finished duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuelResult {
    winner: CompetitorTag,
    loser: CompetitorTag,
    winner_score: u32,
    loser_score: u32,
    winner_moves: u32,
}

impl DuelResult {
    /// Capture the final state of a duel that `winner` ended by reaching
    /// `threshold`.
    ///
    /// Rejects a winner that is also the loser, and a winner whose score is
    /// below the threshold.
    pub fn new(winner: &Competitor, loser: &Competitor, threshold: u32) -> CoreResult<Self> {
        if winner.id == loser.id {
            return Err(CoreError::InvalidResult(format!(
                "{} cannot both win and lose",
                winner.name
            )));
        }
        if winner.score() < threshold {
            return Err(CoreError::InvalidResult(format!(
                "winner {} scored {} which is below the threshold of {threshold}",
                winner.name,
                winner.score()
            )));
        }
        Ok(Self {
            winner: winner.tag(),
            loser: loser.tag(),
            winner_score: winner.score(),
            loser_score: loser.score(),
            winner_moves: winner.moves_used(),
        })
    }

    /// The competitor who reached the threshold.
    pub fn winner(&self) -> &CompetitorTag {
        &self.winner
    }

    /// The other competitor.
    pub fn loser(&self) -> &CompetitorTag {
        &self.loser
    }

    /// The winner's final score.
    pub fn winner_score(&self) -> u32 {
        self.winner_score
    }

    /// The loser's final score.
    pub fn loser_score(&self) -> u32 {
        self.loser_score
    }

    /// Moves the winner landed during the duel.
    pub fn winner_moves(&self) -> u32 {
        self.winner_moves
    }

    /// Returns true if the given competitor took part in this duel.
    pub fn involves(&self, id: CompetitorId) -> bool {
        self.winner.id == id || self.loser.id == id
    }

    /// The unordered pair of participants, smaller ID first.
    pub fn pair(&self) -> (CompetitorId, CompetitorId) {
        CompetitorId::ordered_pair(self.winner.id, self.loser.id)
    }
}

impl fmt::Display for DuelResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} defeats {} {}-{} ({} moves)",
            self.winner.name,
            self.loser.name,
            self.winner_score,
            self.loser_score,
            self.winner_moves
        )
    }
}
