//! Error types.
//!
//! `MatchError` is returned to callers (bad roster or config, unknown
//! match).
//! `ItemFailure` never leaves the engine: it becomes a private log line
//! for the actor and the item is refunded.

use thiserror::Error;

use super::config::{MAX_PLAYERS, MIN_PLAYERS};

/// Errors surfaced to the caller of the match API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error("roster must have {MIN_PLAYERS}-{MAX_PLAYERS} players, got {0}")]
    RosterSize(usize),
    #[error("duplicate player name: {0}")]
    DuplicateName(String),
    #[error("player names must not be empty")]
    EmptyName,
    #[error("unknown match: {0}")]
    UnknownMatch(u64),
    #[error("invalid config: {0}")]
    InvalidConfig(&'static str),
}

/// Validation failure while resolving an item.
///
/// The `Display` text is what the actor sees in their private log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemFailure {
    #[error("{item} failed: Invalid target")]
    InvalidTarget { item: &'static str },
    #[error("{target} has no items to steal")]
    NothingToSteal { target: String },
    #[error("{target} does not have {item}")]
    NotHeldByTarget { target: String, item: String },
    #[error("{player} is already at full health")]
    FullHealth { player: String },
    #[error("Diamond failed: No item specified")]
    NoWish,
    #[error("Diamond failed: Invalid item {0}")]
    InvalidWish(String),
    #[error("Inverter failed: Gun is empty")]
    EmptyChamber,
}
