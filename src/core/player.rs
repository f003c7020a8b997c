//! Participant identification and the per-player ledger.
//!
//! ## PlayerId
//!
//! Seat index into the match roster. Display names are the join key
//! at the boundary; inside the engine seats are addressed by `PlayerId`.
//!
//! ## PlayerMap
//!
//! Per-seat storage backed by `Vec` for O(1) access.
//!
//! ## Participant
//!
//! Health, class, inventory and per-round flags for one seat. Stats live
//! alongside but are never reset between rounds.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

use crate::items::Item;

/// Seat identifier. Seat order is roster order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Seat {}", self.0)
    }
}

/// Per-seat data storage with O(1) access.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: Vec<T>,
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(player_count: usize, factory: impl FnMut(PlayerId) -> T) -> Self {
        assert!(player_count > 0, "Must have at least 1 player");
        assert!(player_count <= 255, "At most 255 players supported");

        let data = (0..player_count as u8).map(PlayerId).map(factory).collect();

        Self { data }
    }

    /// Get the number of seats.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.data.len()
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (PlayerId(i as u8), v))
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        &self.data[player.index()]
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        &mut self.data[player.index()]
    }
}

/// Character class, assigned once per match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerClass {
    /// +2 max health every round.
    Tank,
    /// Occasional +1 damage on hits.
    Sniper,
    /// Rarer items on reload.
    Gambler,
}

impl PlayerClass {
    /// All classes, in assignment order.
    pub const ALL: [PlayerClass; 3] = [PlayerClass::Tank, PlayerClass::Sniper, PlayerClass::Gambler];

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            PlayerClass::Tank => "Tank",
            PlayerClass::Sniper => "Sniper",
            PlayerClass::Gambler => "Gambler",
        }
    }
}

impl std::fmt::Display for PlayerClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Match-long counters. Never reset between rounds.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub dmg_dealt: u32,
    pub dmg_taken: u32,
    pub kills: u32,
    pub deaths: u32,
    pub self_harm: u32,
    /// Blanks survived while aiming at yourself.
    pub lucky_saves: u32,
    pub items_used: u32,
}

/// One seat's mutable ledger entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub class: PlayerClass,
    /// May dip to zero or below until the elimination is processed.
    pub health: i32,
    pub max_health: i32,
    /// Duplicates allowed; order is stable for random picks.
    pub items: Vec<Item>,
    /// Loses the next turn that rotates onto this seat.
    pub skip_next_turn: bool,
    /// Next item use fails and clears this flag.
    pub action_blocked: bool,
    /// Next live hit deals +1.
    pub double_armed: bool,
    pub stats: Stats,
}

impl Participant {
    /// Create a participant with full health `max_health`.
    pub fn new(name: impl Into<String>, class: PlayerClass, max_health: i32) -> Self {
        Self {
            name: name.into(),
            class,
            health: max_health,
            max_health,
            items: Vec::new(),
            skip_next_turn: false,
            action_blocked: false,
            double_armed: false,
            stats: Stats::default(),
        }
    }

    /// Start a new round at full `max_health` with an empty inventory.
    pub fn reset_for_round(&mut self, max_health: i32) {
        self.max_health = max_health;
        self.health = max_health;
        self.items.clear();
        self.skip_next_turn = false;
        self.action_blocked = false;
        self.double_armed = false;
    }

    /// Check for a living seat.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Check for an owned item.
    #[must_use]
    pub fn holds(&self, item: Item) -> bool {
        self.items.contains(&item)
    }

    /// Remove one copy of `item`. Returns true if one was removed.
    pub fn take_item(&mut self, item: Item) -> bool {
        if let Some(pos) = self.items.iter().position(|&i| i == item) {
            self.items.remove(pos);
            true
        } else {
            false
        }
    }

    /// Remove every copy of `item`, returning how many were removed.
    pub fn purge_item(&mut self, item: Item) -> usize {
        let before = self.items.len();
        self.items.retain(|&i| i != item);
        before - self.items.len()
    }

    /// Heal up to max health. Returns the amount actually restored.
    pub fn heal_capped(&mut self, amount: i32) -> i32 {
        let restored = amount.min(self.max_health - self.health).max(0);
        self.health += restored;
        restored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Seat 0");
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(4, |p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::new(0)], 0);
        assert_eq!(map[PlayerId::new(3)], 30);
        assert_eq!(map.player_count(), 4);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 player")]
    fn test_player_map_zero_players() {
        let _: PlayerMap<i32> = PlayerMap::new(0, |_| 0);
    }

    #[test]
    fn test_participant_items() {
        let mut p = Participant::new("ana", PlayerClass::Sniper, 4);
        p.items = vec![Item::Heal, Item::Skip, Item::Heal];

        assert!(p.holds(Item::Skip));
        assert!(p.take_item(Item::Skip));
        assert!(!p.take_item(Item::Skip));
        assert_eq!(p.purge_item(Item::Heal), 2);
        assert!(p.items.is_empty());
    }

    #[test]
    fn test_heal_capped() {
        let mut p = Participant::new("ana", PlayerClass::Tank, 6);
        p.health = 5;

        assert_eq!(p.heal_capped(3), 1);
        assert_eq!(p.health, 6);
        assert_eq!(p.heal_capped(1), 0);
    }

    #[test]
    fn test_reset_keeps_stats() {
        let mut p = Participant::new("ana", PlayerClass::Gambler, 4);
        p.stats.kills = 2;
        p.skip_next_turn = true;
        p.double_armed = true;
        p.items.push(Item::Lens);
        p.health = -3;

        p.reset_for_round(7);

        assert_eq!(p.health, 7);
        assert_eq!(p.max_health, 7);
        assert!(p.items.is_empty());
        assert!(!p.skip_next_turn);
        assert!(!p.double_armed);
        assert_eq!(p.stats.kills, 2);
    }
}
