use std::fmt;
use std::sync::mpsc::Sender;
use std::sync::{Mutex, PoisonError};

use sd_core::{CompetitorId, CompetitorTag, DuelResult, Move};

/// Something that happened during a duel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DuelEvent {
    /// Both competitors were reset and the duel began. `first` acts first.
    DuelStarted {
        /// The competitor who takes the opening turn.
        first: CompetitorTag,
        /// The other competitor.
        second: CompetitorTag,
    },
    /// A competitor landed a move.
    MoveResolved {
        /// The acting competitor.
        competitor: CompetitorTag,
        /// The move that was drawn from the catalog.
        mv: Move,
        /// The competitor's score after the move.
        score: u32,
    },
    /// A competitor was stunned and will lose their next turn.
    Stunned {
        /// The stunned competitor.
        competitor: CompetitorTag,
    },
    /// A stunned competitor spent their turn recovering.
    Recovered {
        /// The recovering competitor.
        competitor: CompetitorTag,
    },
    /// The duel ended with a winner.
    DuelFinished {
        /// The finalized result.
        result: DuelResult,
    },
}

impl DuelEvent {
    /// Check whether a given competitor is involved in this event.
    pub fn involves(&self, id: CompetitorId) -> bool {
        match self {
            Self::DuelStarted { first, second } => first.id == id || second.id == id,
            Self::MoveResolved { competitor, .. }
            | Self::Stunned { competitor }
            | Self::Recovered { competitor } => competitor.id == id,
            Self::DuelFinished { result } => result.involves(id),
        }
    }

    /// The competitor whose turn produced this event, if it is a turn event.
    pub fn actor(&self) -> Option<&CompetitorTag> {
        match self {
            Self::MoveResolved { competitor, .. } | Self::Recovered { competitor } => {
                Some(competitor)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DuelEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuelStarted { first, second } => write!(f, "{first} faces {second}"),
            Self::MoveResolved {
                competitor,
                mv,
                score,
            } => write!(f, "{competitor} casts {mv} and now has {score} points"),
            Self::Stunned { competitor } => write!(f, "{competitor} is stunned"),
            Self::Recovered { competitor } => write!(f, "{competitor} recovers from the stun"),
            Self::DuelFinished { result } => write!(f, "{result}"),
        }
    }
}

/// Receives duel events as the engine produces them.
///
/// Events are emitted while the duel monitor is held, so implementations must
/// return promptly. Slow consumers should hand events off, as [`ChannelSink`]
/// does.
pub trait EventSink: Send + Sync {
    /// Handle one event.
    fn emit(&self, event: DuelEvent);
}

impl<F> EventSink for F
where
    F: Fn(DuelEvent) + Send + Sync,
{
    fn emit(&self, event: DuelEvent) {
        self(event);
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: DuelEvent) {}
}

/// Forwards events over an unbounded channel to a consumer thread.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<DuelEvent>,
}

impl ChannelSink {
    /// Wrap the sending half of a channel.
    pub fn new(tx: Sender<DuelEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: DuelEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("event receiver dropped; discarding event");
        }
    }
}

/// Records events in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<DuelEvent>>,
    max_events: usize,
}

impl EventLog {
    /// Create a new event log with the given maximum capacity (0 = unlimited).
    pub fn new(max_events: usize) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            max_events,
        }
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<DuelEvent> {
        self.lock().clone()
    }

    /// All recorded events involving the given competitor.
    pub fn events_for(&self, id: CompetitorId) -> Vec<DuelEvent> {
        self.lock()
            .iter()
            .filter(|e| e.involves(id))
            .cloned()
            .collect()
    }

    /// Return the number of recorded events.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove all recorded events.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<DuelEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: DuelEvent) {
        let mut events = self.lock();
        events.push(event);
        if self.max_events > 0 && events.len() > self.max_events {
            let drain_count = events.len() - self.max_events;
            events.drain(..drain_count);
        }
    }
}
