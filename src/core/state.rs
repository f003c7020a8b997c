//! The match aggregate.
//!
//! `Match` exclusively owns every piece of match state: the ledger, the
//! alive list, the deck, the journal and the RNG. Nothing is global; the
//! service layer keeps one `Match` per lock.
//!
//! Rules are implemented as `impl Match` blocks in `rules` and `items`.
//! This module holds the data, read accessors, and the setup hooks the
//! transport and tests use to arrange a table.
//!
//! ## Turn order
//!
//! `alive` holds seats in roster order. The current actor is
//! `alive[turn % alive.len()]`, which stays valid when a seat is removed.

use rustc_hash::FxHashMap;

use super::config::MatchConfig;
use super::player::{Participant, PlayerId, PlayerMap};
use super::rng::{GameRng, GameRngState};
use crate::deck::Deck;
use crate::items::Item;
use crate::journal::Journal;
use crate::rules::{Bounty, Modifier};

/// Full match state.
#[derive(Clone, Debug)]
pub struct Match {
    pub(crate) config: MatchConfig,

    /// Ledger for every seated participant.
    pub(crate) players: PlayerMap<Participant>,

    /// Living seats in turn order.
    pub(crate) alive: Vec<PlayerId>,

    /// Raw turn counter; reduce modulo `alive.len()`.
    pub(crate) turn: usize,

    /// Current round (starts at 1).
    pub(crate) round: u32,

    pub(crate) modifier: Option<Modifier>,
    pub(crate) bounty: Option<Bounty>,
    pub(crate) prize_pool: u64,

    /// Set when one seat is left or a bounty lands. Freezes actions.
    pub(crate) round_winner: Option<PlayerId>,

    /// Set when the final round is decided.
    pub(crate) champion: Option<PlayerId>,

    /// Seat whose next draw target is randomized.
    pub(crate) blackout_for: Option<PlayerId>,

    pub(crate) deck: Deck,
    pub(crate) journal: Journal,
    pub(crate) rng: GameRng,

    name_index: FxHashMap<String, PlayerId>,
}

impl Match {
    /// Assemble a match around an already built ledger. The caller is
    /// responsible for the round-start setup.
    pub(crate) fn assemble(config: MatchConfig, players: PlayerMap<Participant>, rng: GameRng) -> Self {
        let name_index = players
            .iter()
            .map(|(id, p)| (p.name.clone(), id))
            .collect();
        let alive = players.iter().map(|(id, _)| id).collect();
        let journal = Journal::new(config.event_capacity);
        let prize_pool = config.prize_pool_base;

        Self {
            config,
            players,
            alive,
            turn: 0,
            round: 1,
            modifier: None,
            bounty: None,
            prize_pool,
            round_winner: None,
            champion: None,
            blackout_for: None,
            deck: Deck::default(),
            journal,
            rng,
            name_index,
        }
    }

    // === Lookup ===

    /// Configuration this match was created with.
    #[must_use]
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Number of seated participants.
    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    /// Seat for a display name.
    #[must_use]
    pub fn seat(&self, name: &str) -> Option<PlayerId> {
        self.name_index.get(name).copied()
    }

    /// Display name of a seat.
    #[must_use]
    pub fn name(&self, player: PlayerId) -> &str {
        &self.players[player].name
    }

    /// Ledger entry for a seat.
    #[must_use]
    pub fn participant(&self, player: PlayerId) -> &Participant {
        &self.players[player]
    }

    /// All ledger entries in roster order.
    pub fn participants(&self) -> impl Iterator<Item = (PlayerId, &Participant)> {
        self.players.iter()
    }

    /// Living seats in turn order.
    #[must_use]
    pub fn alive(&self) -> &[PlayerId] {
        &self.alive
    }

    /// Check if a seat is still in the round.
    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.alive.contains(&player)
    }

    /// Living seats other than `player`.
    #[must_use]
    pub fn opponents(&self, player: PlayerId) -> Vec<PlayerId> {
        self.alive.iter().copied().filter(|&p| p != player).collect()
    }

    // === Progress ===

    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    #[must_use]
    pub fn max_rounds(&self) -> u32 {
        self.config.max_rounds
    }

    #[must_use]
    pub fn is_final_round(&self) -> bool {
        self.config.is_final_round(self.round)
    }

    #[must_use]
    pub fn modifier(&self) -> Option<Modifier> {
        self.modifier
    }

    #[must_use]
    pub fn bounty(&self) -> Option<Bounty> {
        self.bounty
    }

    #[must_use]
    pub fn prize_pool(&self) -> u64 {
        self.prize_pool
    }

    /// Winner of the current round, once decided.
    #[must_use]
    pub fn round_winner(&self) -> Option<PlayerId> {
        self.round_winner
    }

    /// Winner of the whole match, once the final round is decided.
    #[must_use]
    pub fn champion(&self) -> Option<PlayerId> {
        self.champion
    }

    /// True once the final round has a winner.
    #[must_use]
    pub fn is_over(&self) -> bool {
        self.champion.is_some()
    }

    #[must_use]
    pub fn blackout_for(&self) -> Option<PlayerId> {
        self.blackout_for
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// RNG position, for reproducing a match from a checkpoint.
    #[must_use]
    pub fn rng_state(&self) -> GameRngState {
        self.rng.state()
    }

    /// Rewind or fast-forward the RNG to a captured position. Every roll
    /// after this replays what followed the capture.
    pub fn restore_rng(&mut self, state: &GameRngState) {
        self.rng = GameRng::from_state(state);
    }

    // === Table setup ===

    /// Replace the chamber contents.
    pub fn set_deck(&mut self, deck: Deck) {
        self.deck = deck;
    }

    /// Add an item to a seat's inventory.
    pub fn give_item(&mut self, player: PlayerId, item: Item) {
        self.players[player].items.push(item);
    }

    /// Replace a seat's inventory.
    pub fn set_items(&mut self, player: PlayerId, items: Vec<Item>) {
        self.players[player].items = items;
    }

    /// Set a seat's current health (not clamped).
    pub fn set_health(&mut self, player: PlayerId, health: i32) {
        self.players[player].health = health;
    }

    /// Change a seat's class. Max health is left as is.
    pub fn set_class(&mut self, player: PlayerId, class: super::PlayerClass) {
        self.players[player].class = class;
    }

    /// Force the round modifier.
    pub fn set_modifier(&mut self, modifier: Option<Modifier>) {
        self.modifier = modifier;
    }

    /// Force the active contract.
    pub fn set_bounty(&mut self, bounty: Option<Bounty>) {
        self.bounty = bounty;
    }

    /// Jam a seat: its next item use fails.
    pub fn block_actions(&mut self, player: PlayerId) {
        self.players[player].action_blocked = true;
    }

    /// Hand the turn to a living seat. Returns false if it is not alive.
    pub fn set_turn(&mut self, player: PlayerId) -> bool {
        match self.alive.iter().position(|&p| p == player) {
            Some(idx) => {
                self.turn = idx;
                true
            }
            None => false,
        }
    }
}
