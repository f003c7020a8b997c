//! Match rules: lifecycle, turns, damage.
//!
//! Each submodule adds an `impl Match` block:
//! - `lifecycle`: match creation, round transitions, reloads, round-over
//! - `turn`: current actor, draw resolution, turn rotation
//! - `damage`: damage adjudication, kills, bounties
//!
//! Item resolution lives in `crate::items`.

mod damage;
mod lifecycle;
mod turn;

pub use damage::LETHAL_DAMAGE;

use serde::{Deserialize, Serialize};

use crate::core::PlayerId;

/// Round-wide rule, rolled for every round after the first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// All shot damage is doubled.
    #[serde(rename = "DOUBLE TROUBLE")]
    DoubleDamage,
    /// Hitting someone else restores 1 health.
    #[serde(rename = "VAMPIRISM")]
    LifeSteal,
    /// Every turn hand-off gifts the new actor a random item.
    #[serde(rename = "ITEM RAIN")]
    ItemRain,
}

impl Modifier {
    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Modifier::DoubleDamage => "DOUBLE TROUBLE",
            Modifier::LifeSteal => "VAMPIRISM",
            Modifier::ItemRain => "ITEM RAIN",
        }
    }

    /// Does this modifier hand out an item on every turn change?
    #[must_use]
    pub const fn gifts_items(self) -> bool {
        matches!(self, Modifier::ItemRain)
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Secret contract: if `assassin` kills `target`, the round ends in the
/// assassin's favor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub assassin: PlayerId,
    pub target: PlayerId,
}

impl Bounty {
    /// Does a kill by `killer` on `victim` complete this contract?
    #[must_use]
    pub fn is_fulfilled_by(&self, killer: PlayerId, victim: PlayerId) -> bool {
        self.assassin == killer && self.target == victim
    }
}
