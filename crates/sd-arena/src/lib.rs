//! Concurrent duel engine and tournament manager for Spellduel.
//!
//! A duel runs two turn-taking threads that share a single monitor and
//! alternate strictly until one competitor reaches the score threshold. The
//! [`Tournament`] sequences duels with a defending champion, avoids
//! rematches where it can, and keeps the history of results.

/// Duel and tournament configuration.
pub mod config;
/// The two-thread duel engine.
pub mod engine;
/// Error types for the arena crate.
pub mod error;
/// Duel events and the sinks that receive them.
pub mod event;
/// Cooperative cancellation shared with running duels.
pub mod stop;
/// Champion-defends tournament manager.
pub mod tournament;

/// Re-exports of configuration types.
pub use config::{DuelConfig, PacingWindow, RematchPolicy, TournamentConfig};
/// Re-export of [`engine::DuelEngine`].
pub use engine::DuelEngine;
/// Re-exports of [`error::ArenaError`], [`error::ArenaResult`], and [`error::AbortReason`].
pub use error::{AbortReason, ArenaError, ArenaResult};
/// Re-exports of event types and sinks.
pub use event::{ChannelSink, DuelEvent, EventLog, EventSink, NullSink};
/// Re-export of [`stop::StopSignal`].
pub use stop::StopSignal;
/// Re-exports of tournament types.
pub use tournament::{Tournament, TournamentPhase, TournamentStats};
