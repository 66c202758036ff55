//! Error types for the arena crate.

use std::fmt;

use sd_core::CoreError;

/// Result type for arena operations.
pub type ArenaResult<T> = Result<T, ArenaError>;

/// Why a duel ended without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The stop signal was raised.
    Cancelled,
    /// The configured duel time limit elapsed.
    TimedOut,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "cancelled"),
            Self::TimedOut => write!(f, "time limit reached"),
        }
    }
}

/// Errors that can occur while running duels and tournaments.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Both sides of a duel are the same competitor.
    #[error("{0} cannot duel themselves")]
    SameCompetitor(String),

    /// A competitor ID is not part of the tournament.
    #[error("unknown competitor: {0}")]
    UnknownCompetitor(String),

    /// No pairing is available; check `has_next_duel` first.
    #[error("no duel available: {0}")]
    NoDuelAvailable(String),

    /// The duel did not complete.
    #[error("duel did not complete: {0}")]
    Aborted(AbortReason),

    /// A turn-taking thread panicked.
    #[error("duel task panicked")]
    TaskPanicked,

    /// Core data model error.
    #[error("{0}")]
    Core(#[from] CoreError),
}

impl ArenaError {
    /// Returns true for validation errors raised before any duel work starts.
    pub fn is_validation(&self) -> bool {
        match self {
            Self::InvalidConfig(_) | Self::SameCompetitor(_) | Self::UnknownCompetitor(_) => true,
            Self::Core(err) => !matches!(err, CoreError::InvalidResult(_)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn abort_messages() {
        assert_eq!(
            ArenaError::Aborted(AbortReason::Cancelled).to_string(),
            "duel did not complete: cancelled"
        );
        assert_eq!(
            ArenaError::Aborted(AbortReason::TimedOut).to_string(),
            "duel did not complete: time limit reached"
        );
    }

    #[test]
    fn validation_classification() {
        assert!(ArenaError::InvalidConfig("x".into()).is_validation());
        assert!(ArenaError::from(CoreError::EmptyRoster).is_validation());
        assert!(!ArenaError::from(CoreError::InvalidResult("x".into())).is_validation());
        assert!(!ArenaError::NoDuelAvailable("x".into()).is_validation());
        assert!(!ArenaError::Aborted(AbortReason::Cancelled).is_validation());
    }
}
