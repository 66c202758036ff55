/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Validation errors raised while building the core data model.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CoreError {
    /// A move was declared with a blank name or a zero point value.
    #[error("invalid move \"{name}\": {reason}")]
    InvalidMove {
        /// The offending move name.
        name: String,
        /// Why the move was rejected.
        reason: String,
    },

    /// A move catalog must contain at least one move.
    #[error("move catalog is empty")]
    EmptyCatalog,

    /// A roster must contain at least one competitor.
    #[error("roster is empty")]
    EmptyRoster,

    /// The same competitor appears twice in a roster.
    #[error("competitor already in roster: \"{0}\"")]
    DuplicateCompetitor(String),

    /// A competitor name or house was blank.
    #[error("invalid competitor name: \"{0}\"")]
    InvalidName(String),

    /// A duel result failed validation.
    #[error("invalid duel result: {0}")]
    InvalidResult(String),
}
