//! Per-viewer projection of a match.
//!
//! A snapshot is what one client is allowed to see: public log lines plus
//! the viewer's own private ones, the contract only if the viewer holds
//! it, and the stats table only once the match is over. Everything is
//! keyed by display name so the transport can serialize it directly.

use rustc_hash::FxHashMap;
use serde::Serialize;

use crate::core::{Match, Participant, PlayerClass, Stats};
use crate::items::Item;
use crate::journal::Event;
use crate::rules::Modifier;

/// Contract details, shown only to the assassin.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BountyView {
    pub assassin: String,
    pub target: String,
}

/// Read-only view of a match for one viewer (or an anonymous spectator).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    /// Living participants in turn order.
    pub players: Vec<String>,
    pub current_player: Option<String>,
    pub is_my_turn: bool,
    pub health: FxHashMap<String, i32>,
    pub max_health: FxHashMap<String, i32>,
    pub items: FxHashMap<String, Vec<Item>>,
    pub classes: FxHashMap<String, PlayerClass>,
    /// Most recent visible log lines, oldest first.
    pub logs: Vec<String>,
    pub game_over: bool,
    pub round_winner: Option<String>,
    /// Sole survivor of the round, if any.
    pub winner: Option<String>,
    pub deck_count: usize,
    pub live_count: usize,
    pub blank_count: usize,
    pub round: u32,
    pub max_rounds: u32,
    pub blackout_next: Option<String>,
    pub modifier: Option<Modifier>,
    pub events: Vec<Event>,
    pub stats: Option<FxHashMap<String, Stats>>,
    pub prize_pool: u64,
    pub bounty: Option<BountyView>,
}

impl Match {
    /// Build the projection for `viewer`. Unknown or absent viewers see
    /// public information only.
    #[must_use]
    pub fn snapshot(&self, viewer: Option<&str>) -> Snapshot {
        let seat = viewer.and_then(|v| self.seat(v));
        let current = self.current_actor();
        let game_over = self.is_over();

        let name_of = |p| self.name(p).to_string();

        Snapshot {
            players: self.alive().iter().map(|&p| name_of(p)).collect(),
            current_player: current.map(name_of),
            is_my_turn: seat.is_some() && seat == current,
            health: self.by_name(|p| p.health),
            max_health: self.by_name(|p| p.max_health),
            items: self.by_name(|p| p.items.clone()),
            classes: self.by_name(|p| p.class),
            logs: self
                .journal()
                .log
                .visible_tail(seat, self.config().log_window),
            game_over,
            round_winner: self.round_winner().map(name_of),
            winner: match self.alive() {
                [only] => Some(name_of(*only)),
                _ => None,
            },
            deck_count: self.deck().len(),
            live_count: self.deck().live_count(),
            blank_count: self.deck().blank_count(),
            round: self.round(),
            max_rounds: self.max_rounds(),
            blackout_next: self.blackout_for().map(name_of),
            modifier: self.modifier(),
            events: self.journal().events.iter().cloned().collect(),
            stats: game_over.then(|| self.by_name(|p| p.stats.clone())),
            prize_pool: self.prize_pool(),
            bounty: self
                .bounty()
                .filter(|b| seat == Some(b.assassin))
                .map(|b| BountyView {
                    assassin: name_of(b.assassin),
                    target: name_of(b.target),
                }),
        }
    }

    fn by_name<T>(&self, f: impl Fn(&Participant) -> T) -> FxHashMap<String, T> {
        self.participants()
            .map(|(_, p)| (p.name.clone(), f(p)))
            .collect()
    }
}
