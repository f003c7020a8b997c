//! Core match types: players, state, actions, RNG, configuration, errors.

pub mod action;
pub mod config;
pub mod error;
pub mod player;
pub mod rng;
pub mod state;

pub use action::{Action, DrawMode};
pub use config::{MatchConfig, MAX_PLAYERS, MIN_PLAYERS};
pub use error::{ItemFailure, MatchError};
pub use player::{Participant, PlayerClass, PlayerId, PlayerMap, Stats};
pub use rng::{GameRng, GameRngState};
pub use state::Match;
