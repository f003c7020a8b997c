//! Match configuration.
//!
//! All tunable numbers of a match live here: round count, health ranges,
//! prize pool, and every probability the rules roll against. The defaults
//! reproduce the standard table rules; tests typically zero out the
//! probabilities to make a scenario deterministic.

use serde::{Deserialize, Serialize};

use super::error::MatchError;
use crate::rules::Modifier;

/// Smallest roster a match accepts.
pub const MIN_PLAYERS: usize = 2;

/// Largest roster a match accepts.
pub const MAX_PLAYERS: usize = 8;

/// Complete match configuration.
///
/// Build with `MatchConfig::default()` and the `with_*` methods.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,

    /// Number of rounds in a match.
    pub max_rounds: u32,

    /// Base max health in round 1.
    pub opening_health: i32,

    /// Inclusive base max health range for later rounds.
    pub health_range: (i32, i32),

    /// Extra max health granted to Tanks.
    pub tank_bonus: i32,

    /// Prize pool at match start.
    pub prize_pool_base: u64,

    /// Added to the prize pool when a new round starts.
    pub prize_pool_increment: u64,

    /// Chance a bounty is issued at the start of rounds >= 2.
    pub bounty_chance: f64,

    /// Chance a live safe hit or any risk shot arms a blackout on the next
    /// actor.
    pub blackout_chance: f64,

    /// Chance a non-forced risk shot turns on the shooter.
    pub backfire_chance: f64,

    /// Chance a Sniper adds one damage to a hit.
    pub sniper_crit_chance: f64,

    /// Per-pick chance a non-Gambler receives a Diamond.
    pub diamond_chance: f64,

    /// Chance a Gambler receives a bonus Diamond on reload.
    pub gambler_diamond_chance: f64,

    /// Events kept in the ring.
    pub event_capacity: usize,

    /// Log lines included in a snapshot.
    pub log_window: usize,

    /// Maximum nesting of auto-used stolen items.
    pub steal_depth_limit: usize,

    /// Modifiers eligible for rounds >= 2.
    pub modifier_pool: Vec<Modifier>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_rounds: 3,
            opening_health: 4,
            health_range: (4, 8),
            tank_bonus: 2,
            prize_pool_base: 100_000,
            prize_pool_increment: 50_000,
            bounty_chance: 0.30,
            blackout_chance: 0.25,
            backfire_chance: 0.60,
            sniper_crit_chance: 0.10,
            diamond_chance: 0.05,
            gambler_diamond_chance: 0.25,
            event_capacity: 30,
            log_window: 20,
            steal_depth_limit: 4,
            modifier_pool: vec![Modifier::DoubleDamage, Modifier::LifeSteal],
        }
    }
}

impl MatchConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fix the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of rounds.
    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        assert!(rounds > 0, "Must have at least 1 round");
        self.max_rounds = rounds;
        self
    }

    /// Set the bounty chance.
    #[must_use]
    pub fn with_bounty_chance(mut self, chance: f64) -> Self {
        self.bounty_chance = chance;
        self
    }

    /// Set the blackout chance.
    #[must_use]
    pub fn with_blackout_chance(mut self, chance: f64) -> Self {
        self.blackout_chance = chance;
        self
    }

    /// Set the risk-shot backfire chance.
    #[must_use]
    pub fn with_backfire_chance(mut self, chance: f64) -> Self {
        self.backfire_chance = chance;
        self
    }

    /// Set the Sniper crit chance.
    #[must_use]
    pub fn with_sniper_crit_chance(mut self, chance: f64) -> Self {
        self.sniper_crit_chance = chance;
        self
    }

    /// Replace the modifier pool. An empty pool disables modifiers.
    #[must_use]
    pub fn with_modifier_pool(mut self, pool: Vec<Modifier>) -> Self {
        self.modifier_pool = pool;
        self
    }

    /// Disable every random side rule (crits, blackouts, backfires,
    /// bounties). Deck composition and item drops stay random.
    #[must_use]
    pub fn without_side_rolls(self) -> Self {
        self.with_bounty_chance(0.0)
            .with_blackout_chance(0.0)
            .with_backfire_chance(0.0)
            .with_sniper_crit_chance(0.0)
    }

    /// Reject values the rules cannot run with. `Match::new` calls this,
    /// since a deserialized config bypasses the builder checks.
    pub fn validate(&self) -> Result<(), MatchError> {
        let (lo, hi) = self.health_range;
        let chances = [
            self.bounty_chance,
            self.blackout_chance,
            self.backfire_chance,
            self.sniper_crit_chance,
            self.diamond_chance,
            self.gambler_diamond_chance,
        ];
        let checks = [
            (self.max_rounds > 0, "max_rounds must be at least 1"),
            (self.opening_health > 0, "opening_health must be positive"),
            (lo > 0 && lo <= hi, "health_range must be a positive, non-empty range"),
            (self.tank_bonus >= 0, "tank_bonus must not be negative"),
            (self.event_capacity > 0, "event_capacity must be at least 1"),
            (chances.iter().all(|c| c.is_finite()), "chances must be finite"),
        ];

        match checks.iter().find(|(ok, _)| !ok) {
            Some(&(_, reason)) => Err(MatchError::InvalidConfig(reason)),
            None => Ok(()),
        }
    }

    /// True if `round` is the last round of the match.
    #[must_use]
    pub fn is_final_round(&self, round: u32) -> bool {
        round >= self.max_rounds
    }
}
