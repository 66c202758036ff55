//! Core types for Spellduel: competitors, moves, rosters, and duel results.
//!
//! This crate holds the data model shared by the duel engine and the
//! tournament manager. It performs no I/O; rosters and move catalogs arrive
//! already loaded and are validated here on construction.

/// Competitors, their identifiers, and per-duel state.
pub mod competitor;
/// Error types used throughout the crate.
pub mod error;
/// Moves and the immutable move catalog.
pub mod moves;
/// The finalized outcome of a single duel.
pub mod result;
/// Validated, ordered list of competitors.
pub mod roster;

/// Re-export competitor types.
pub use competitor::{Competitor, CompetitorId, CompetitorTag};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export move types.
pub use moves::{Move, MoveCatalog};
/// Re-export the duel result record.
pub use result::DuelResult;
/// Re-export the roster.
pub use roster::Roster;
