//! Match journal: the text log and the event ring.
//!
//! Everything that happens in a match is written here. Log lines carry an
//! audience; events carry a payload for animation. Both are append-only.

pub mod event;
pub mod log;

use serde::{Deserialize, Serialize};

pub use event::{Event, EventKind, EventRing};
pub use log::{Log, LogEntry, Visibility};

use crate::core::PlayerId;

/// Log plus event ring.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Journal {
    pub log: Log,
    pub events: EventRing,
}

impl Journal {
    /// Create an empty journal with the given event capacity.
    pub fn new(event_capacity: usize) -> Self {
        Self {
            log: Log::new(),
            events: EventRing::new(event_capacity),
        }
    }

    /// Append a public line.
    pub fn record(&mut self, text: impl Into<String>) {
        self.log.push(text.into(), Visibility::Public);
    }

    /// Append a line only `player` can read.
    pub fn record_private(&mut self, player: PlayerId, text: impl Into<String>) {
        self.log.push(text.into(), Visibility::only(player));
    }

    /// Push a structured event.
    pub fn emit(&mut self, kind: EventKind) -> u64 {
        self.events.push(kind)
    }
}
