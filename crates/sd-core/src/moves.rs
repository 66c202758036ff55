use std::fmt;

use serde::Serialize;

use crate::error::{CoreError, CoreResult};

/// A named action worth a fixed number of points.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Move {
    name: String,
    points: u32,
}

impl Move {
    /// Create a move. The name must not be blank and `points` must be positive.
    pub fn new(name: impl Into<String>, points: u32) -> CoreResult<Self> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidMove {
                name,
                reason: "blank name".to_string(),
            });
        }
        if points == 0 {
            return Err(CoreError::InvalidMove {
                name,
                reason: "point value must be at least 1".to_string(),
            });
        }
        Ok(Self { name, points })
    }

    /// The move's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Points added to the caster's score.
    pub fn points(&self) -> u32 {
        self.points
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} pts)", self.name, self.points)
    }
}

/// Ordered, non-empty, immutable collection of moves shared by every duel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoveCatalog {
    moves: Vec<Move>,
}

impl MoveCatalog {
    /// Build a catalog. Fails if `moves` is empty.
    pub fn new(moves: Vec<Move>) -> CoreResult<Self> {
        if moves.is_empty() {
            return Err(CoreError::EmptyCatalog);
        }
        Ok(Self { moves })
    }

    /// Build a catalog from `(name, points)` pairs, validating each move.
    pub fn from_pairs<I, S>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        let moves = pairs
            .into_iter()
            .map(|(name, points)| Move::new(name, points))
            .collect::<CoreResult<Vec<_>>>()?;
        Self::new(moves)
    }

    /// All moves, in declaration order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// The move at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&Move> {
        self.moves.get(index)
    }

    /// Number of moves in the catalog (never zero).
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The highest point value in the catalog.
    pub fn max_points(&self) -> u32 {
        self.moves.iter().map(Move::points).max().unwrap_or(0)
    }
}

impl fmt::Display for MoveCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Move catalog:")?;
        for mv in &self.moves {
            writeln!(f, "- {mv}")?;
        }
        Ok(())
    }
}
