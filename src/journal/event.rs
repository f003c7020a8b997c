//! Structured events for client-side animation replay.
//!
//! Events are not used by the rules. Clients poll the ring, replay any
//! id they have not seen, and ignore the rest. The ring keeps only the
//! newest entries; ids keep increasing across rounds so a client never
//! mistakes a new event for one it already played.

use std::collections::VecDeque;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::core::DrawMode;
use crate::items::Item;
use crate::rules::Modifier;

/// What happened, with the payload a client needs to animate it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum EventKind {
    Reload {
        live: usize,
        blank: usize,
    },
    SuddenDeathLoaded,
    ShotFired {
        player: String,
        target: String,
        is_live: bool,
        is_magic: bool,
        mode: DrawMode,
    },
    Click {
        target: String,
    },
    Damage {
        target: String,
        amount: i32,
        source: Option<String>,
        is_kill: bool,
    },
    Heal {
        target: String,
        amount: i32,
        is_vampire: bool,
    },
    Death {
        player: String,
    },
    Crit {
        player: String,
    },
    Blackout {
        active_player: String,
    },
    Skip {
        player: String,
    },
    Handcuffed {
        player: String,
    },
    Inverse {
        player: String,
    },
    UseItem {
        player: String,
        item: Item,
        target: Option<String>,
    },
    ItemRain {
        player: String,
        item: Item,
    },
    BountyComplete {
        assassin: String,
    },
    ModifierActive {
        modifier: Modifier,
    },
    RoundOver {
        winner: String,
        is_grand: bool,
    },
}

/// One entry in the ring.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Strictly increasing for the life of the match.
    pub id: u64,
    pub kind: EventKind,
    /// Wall clock, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// Bounded ring of the newest events.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EventRing {
    events: VecDeque<Event>,
    capacity: usize,
    last_id: u64,
}

impl EventRing {
    /// Create an empty ring.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Event ring needs room for at least 1 event");
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            last_id: 0,
        }
    }

    /// Append an event, dropping the oldest when full. Returns its id.
    pub fn push(&mut self, kind: EventKind) -> u64 {
        self.last_id += 1;
        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();

        if self.events.len() == self.capacity {
            self.events.pop_front();
        }
        self.events.push_back(Event {
            id: self.last_id,
            kind,
            timestamp_ms,
        });
        self.last_id
    }

    /// Events oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    /// Number of events held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Check if no events are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Id of the newest event ever pushed (0 if none).
    #[must_use]
    pub fn last_id(&self) -> u64 {
        self.last_id
    }

    /// Most recent event, if any.
    #[must_use]
    pub fn latest(&self) -> Option<&Event> {
        self.events.back()
    }
}
