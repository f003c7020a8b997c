//! Items: the closed set of consumables and how they are handed out.
//!
//! Every reload tops up each living participant's inventory. Gamblers
//! draw from a pool weighted toward the rare items; everyone else draws
//! uniformly from the ordinary pool. Diamonds never appear in either pool
//! and only drop through their own small chance.
//!
//! Effect resolution lives in `effects`.

mod effects;

use serde::{Deserialize, Serialize};

use crate::core::{GameRng, MatchConfig, PlayerClass};

/// A consumable item. Serialized by its display label.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    /// Take an item from an opponent and use it immediately.
    #[serde(rename = "Injection")]
    Steal,
    /// Target loses their next turn.
    #[serde(rename = "Handcuffs")]
    Skip,
    /// Privately reveal one random shell.
    #[serde(rename = "Phone")]
    PeekRandom,
    /// +1 health, capped.
    #[serde(rename = "Cigarette")]
    Heal,
    /// Next live hit deals +1.
    #[serde(rename = "Knife")]
    Double,
    /// Eject the front shell unresolved.
    #[serde(rename = "Soda")]
    Discard,
    /// Privately reveal the front shell.
    Lens,
    /// Wish for any ordinary item and wipe it from everyone else.
    Diamond,
    /// Flip the front shell's polarity.
    Inverter,
    /// One of four random outcomes.
    #[serde(rename = "Mystery Box")]
    MysteryBox,
}

/// Ordinary drop pool. Diamond is deliberately absent.
pub const COMMON_POOL: [Item; 9] = [
    Item::Steal,
    Item::Skip,
    Item::PeekRandom,
    Item::Heal,
    Item::Double,
    Item::Discard,
    Item::Lens,
    Item::Inverter,
    Item::MysteryBox,
];

/// Items a Gambler sees twice as often.
pub const RARE_POOL: [Item; 5] = [
    Item::Lens,
    Item::Steal,
    Item::Double,
    Item::Inverter,
    Item::MysteryBox,
];

impl Item {
    /// Display label used in logs, snapshots and transport input.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Item::Steal => "Injection",
            Item::Skip => "Handcuffs",
            Item::PeekRandom => "Phone",
            Item::Heal => "Cigarette",
            Item::Double => "Knife",
            Item::Discard => "Soda",
            Item::Lens => "Lens",
            Item::Diamond => "Diamond",
            Item::Inverter => "Inverter",
            Item::MysteryBox => "Mystery Box",
        }
    }

    /// Short mechanical key, also accepted by `FromStr`.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Item::Steal => "steal",
            Item::Skip => "skip",
            Item::PeekRandom => "peek",
            Item::Heal => "heal",
            Item::Double => "double",
            Item::Discard => "discard",
            Item::Lens => "lens",
            Item::Diamond => "diamond",
            Item::Inverter => "inverter",
            Item::MysteryBox => "mystery_box",
        }
    }

    /// Every item, Diamond included.
    pub fn all() -> impl Iterator<Item = Item> {
        COMMON_POOL.into_iter().chain(std::iter::once(Item::Diamond))
    }

    /// Can this item be wished for with a Diamond?
    #[must_use]
    pub fn is_wishable(self) -> bool {
        COMMON_POOL.contains(&self) || RARE_POOL.contains(&self)
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown item: {0}")]
pub struct UnknownItem(pub String);

impl std::str::FromStr for Item {
    type Err = UnknownItem;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Item::all()
            .find(|item| s.eq_ignore_ascii_case(item.label()) || s.eq_ignore_ascii_case(item.key()))
            .ok_or_else(|| UnknownItem(s.to_string()))
    }
}

/// Roll the items a participant receives on reload.
pub fn roll_drop(rng: &mut GameRng, class: PlayerClass, config: &MatchConfig) -> Vec<Item> {
    let mut drop = Vec::with_capacity(4);

    if class == PlayerClass::Gambler {
        if rng.chance(config.gambler_diamond_chance) {
            drop.push(Item::Diamond);
        }
        let weighted: Vec<Item> = RARE_POOL.iter().chain(COMMON_POOL.iter()).copied().collect();
        for _ in 0..3 {
            if let Some(&item) = rng.choose(&weighted) {
                drop.push(item);
            }
        }
    } else {
        for _ in 0..4 {
            if rng.chance(config.diamond_chance) {
                drop.push(Item::Diamond);
            } else if let Some(&item) = rng.choose(&COMMON_POOL) {
                drop.push(item);
            }
        }
    }

    drop
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labels_and_keys() {
        assert_eq!("Cigarette".parse::<Item>(), Ok(Item::Heal));
        assert_eq!("heal".parse::<Item>(), Ok(Item::Heal));
        assert_eq!("mystery box".parse::<Item>(), Ok(Item::MysteryBox));
        assert_eq!("Mystery_Box".parse::<Item>(), Ok(Item::MysteryBox));
        assert_eq!(" Diamond ".parse::<Item>(), Ok(Item::Diamond));
        assert!("Shotgun".parse::<Item>().is_err());
    }

    #[test]
    fn test_diamond_not_wishable() {
        assert!(!Item::Diamond.is_wishable());
        assert!(COMMON_POOL.iter().all(|i| i.is_wishable()));
    }

    #[test]
    fn test_item_serde_uses_label() {
        let json = serde_json::to_string(&Item::MysteryBox).unwrap();
        assert_eq!(json, "\"Mystery Box\"");
        let back: Item = serde_json::from_str("\"Knife\"").unwrap();
        assert_eq!(back, Item::Double);
    }

    #[test]
    fn test_drop_sizes() {
        let config = MatchConfig::default();
        let mut rng = GameRng::new(11);

        for _ in 0..200 {
            let sniper = roll_drop(&mut rng, PlayerClass::Sniper, &config);
            assert_eq!(sniper.len(), 4);

            let gambler = roll_drop(&mut rng, PlayerClass::Gambler, &config);
            assert!(gambler.len() == 3 || gambler.len() == 4);
            // Only the bonus slot can be a Diamond
            assert!(gambler.iter().filter(|&&i| i == Item::Diamond).count() <= 1);
        }
    }

    #[test]
    fn test_diamond_chance_zero() {
        let mut config = MatchConfig::default();
        config.diamond_chance = 0.0;
        config.gambler_diamond_chance = 0.0;
        let mut rng = GameRng::new(3);

        for class in PlayerClass::ALL {
            for _ in 0..100 {
                assert!(!roll_drop(&mut rng, class, &config).contains(&Item::Diamond));
            }
        }
    }
}
