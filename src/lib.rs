//! # last-chamber
//!
//! Server-authoritative engine for a turn-based elimination game: 2-8
//! players pass a loaded gun around, firing shells from a shared deck at
//! each other (or themselves) and spending items to bend the odds.
//!
//! ## Design Principles
//!
//! 1. **One aggregate per match**: `Match` owns every piece of state. There
//!    is no global state; the hub keys independent matches by `MatchId`.
//!
//! 2. **Closed vocabularies**: items, shells, modifiers and event kinds are
//!    enums resolved by exhaustive `match`.
//!
//! 3. **Failures are log lines**: a bad action never errors out. The actor
//!    gets a private log line and any spent item is refunded.
//!
//! 4. **Deterministic when seeded**: all randomness flows through one
//!    ChaCha8 stream per match.
//!
//! ## Modules
//!
//! - `core`: players, match state, actions, RNG, configuration, errors
//! - `deck`: shells and deck composition
//! - `items`: item catalog, drops and effect resolution
//! - `rules`: lifecycle, turns, damage, modifiers, bounties
//! - `journal`: visibility-scoped log and event ring
//! - `snapshot`: per-viewer projection
//! - `service`: `MatchHub`, the multi-match coordinator

pub mod core;
pub mod deck;
pub mod items;
pub mod journal;
pub mod rules;
pub mod service;
pub mod snapshot;

// Re-export commonly used types
pub use crate::core::{
    Action, DrawMode, GameRng, GameRngState, ItemFailure, Match, MatchConfig, MatchError,
    Participant, PlayerClass, PlayerId, PlayerMap, Stats, MAX_PLAYERS, MIN_PLAYERS,
};

pub use crate::deck::{Composition, Deck, Shell};

pub use crate::items::{Item, UnknownItem, COMMON_POOL, RARE_POOL};

pub use crate::rules::{Bounty, Modifier, LETHAL_DAMAGE};

pub use crate::journal::{Event, EventKind, EventRing, Journal, Log, LogEntry, Visibility};

pub use crate::snapshot::{BountyView, Snapshot};

pub use crate::service::{MatchHub, MatchId};
