//! Match creation, round transitions, reloads and round-over detection.

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use super::{Bounty, Modifier};
use crate::core::{
    GameRng, Match, MatchConfig, MatchError, Participant, PlayerClass, PlayerId, PlayerMap,
    MAX_PLAYERS, MIN_PLAYERS,
};
use crate::deck::Deck;
use crate::items;
use crate::journal::EventKind;

impl Match {
    /// Start a match for `roster` (2-8 unique, non-empty names) under a
    /// valid `config`.
    ///
    /// Classes are assigned uniformly at random, every seat starts round 1
    /// at the opening health (+ Tank bonus), and the first deck is loaded,
    /// which also hands out the opening items.
    pub fn new<S: AsRef<str>>(roster: &[S], config: MatchConfig) -> Result<Self, MatchError> {
        config.validate()?;
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&roster.len()) {
            return Err(MatchError::RosterSize(roster.len()));
        }
        let mut seen = FxHashSet::default();
        for name in roster {
            let name = name.as_ref();
            if name.trim().is_empty() {
                return Err(MatchError::EmptyName);
            }
            if !seen.insert(name) {
                return Err(MatchError::DuplicateName(name.to_string()));
            }
        }

        let mut rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        let players = PlayerMap::new(roster.len(), |id| {
            let class = PlayerClass::ALL[rng.gen_index(PlayerClass::ALL.len())];
            let max_health = config.opening_health + class_bonus(&config, class);
            Participant::new(roster[id.index()].as_ref(), class, max_health)
        });

        let mut game = Match::assemble(config, players, rng);
        let names = game.names(game.alive.clone());
        game.journal.record(format!("--- ROUND {} START ---", game.round));
        game.journal.record(format!("Players: {}", names.join(", ")));
        game.reload();

        info!(
            players = game.player_count(),
            seed = game.rng.seed(),
            "match started"
        );
        Ok(game)
    }

    /// Start the next round. Returns false once the final round has been
    /// reached.
    pub fn advance_round(&mut self) -> bool {
        if self.round >= self.config.max_rounds {
            return false;
        }

        self.round += 1;
        self.round_winner = None;
        self.alive = self.players.iter().map(|(id, _)| id).collect();
        self.turn = 0;
        self.blackout_for = None;
        self.bounty = None;

        let seats: Vec<PlayerId> = self.alive.clone();
        for seat in seats {
            let class = self.players[seat].class;
            let max_health = self.roll_max_health(class);
            self.players[seat].reset_for_round(max_health);
        }

        self.modifier = self.roll_modifier();

        self.journal.record(format!("--- ROUND {} START ---", self.round));
        self.prize_pool += self.config.prize_pool_increment;
        if let Some(modifier) = self.modifier {
            self.journal
                .record(format!("⚠️ ROUND MODIFIER ACTIVE: {modifier} ⚠️"));
            self.journal.emit(EventKind::ModifierActive { modifier });
        }

        // Contract is issued after the opening reload so that reload cannot
        // expire it.
        self.reload();
        self.maybe_issue_bounty();

        info!(
            round = self.round,
            modifier = ?self.modifier,
            bounty = self.bounty.is_some(),
            prize_pool = self.prize_pool,
            "round started"
        );
        true
    }

    /// Compose a fresh deck, expire any contract, and redistribute items.
    ///
    /// Used at round start, when a shot finds the chamber empty, and by the
    /// Mystery Box.
    pub(crate) fn reload(&mut self) {
        let with_magic = self.is_final_round();
        let (deck, composition) = Deck::compose(&mut self.rng, with_magic);
        self.deck = deck;

        if composition.magic {
            self.journal.record("💀 A SUDDEN DEATH BULLET has been loaded...");
            self.journal.emit(EventKind::SuddenDeathLoaded);
        }
        self.journal.record(format!(
            "🔫 Reloading... {} Live / {} Blank",
            composition.live, composition.blank
        ));
        self.journal.emit(EventKind::Reload {
            live: composition.live,
            blank: composition.blank,
        });

        if let Some(bounty) = self.bounty.take() {
            self.journal
                .record_private(bounty.assassin, "❌ Contract EXPIRED due to reshuffle.");
        }

        self.give_items();
        debug!(round = self.round, shells = self.deck.len(), "deck reloaded");
    }

    /// Top up every living seat's inventory.
    fn give_items(&mut self) {
        for seat in self.alive.clone() {
            let class = self.players[seat].class;
            let drop = items::roll_drop(&mut self.rng, class, &self.config);
            self.players[seat].items.extend(drop);
        }
    }

    /// Declare a round winner if exactly one seat is left.
    pub(crate) fn check_round_over(&mut self) {
        if self.alive.len() != 1 || self.round_winner.is_some() {
            return;
        }
        let winner = self.alive[0];
        if !self.is_final_round() {
            let name = self.name(winner).to_string();
            self.journal.record(format!("🏆 {name} wins Round {}!", self.round));
            self.journal.record("Next round starting...");
        }
        self.conclude_round(winner);
    }

    /// Record `winner` for the round (and the match, in the final round).
    pub(crate) fn conclude_round(&mut self, winner: PlayerId) {
        let is_grand = self.is_final_round();
        let name = self.name(winner).to_string();

        self.round_winner = Some(winner);
        if is_grand {
            self.champion = Some(winner);
            self.journal.record(format!("👑 GRAND WINNER: {name}!"));
        }
        self.journal.emit(EventKind::RoundOver {
            winner: name.clone(),
            is_grand,
        });
        info!(round = self.round, winner = %name, is_grand, "round over");
    }

    fn roll_max_health(&mut self, class: PlayerClass) -> i32 {
        let base = if self.round == 1 {
            self.config.opening_health
        } else {
            let (lo, hi) = self.config.health_range;
            self.rng.gen_range_inclusive(lo..=hi)
        };
        base + class_bonus(&self.config, class)
    }

    fn roll_modifier(&mut self) -> Option<Modifier> {
        if self.round <= 1 {
            return None;
        }
        self.rng.choose(&self.config.modifier_pool).copied()
    }

    fn maybe_issue_bounty(&mut self) {
        if self.round < 2 || self.alive.len() < 2 || !self.rng.chance(self.config.bounty_chance) {
            return;
        }
        let idx = self.rng.gen_index(self.alive.len());
        let assassin = self.alive[idx];
        let targets = self.opponents(assassin);
        let Some(&target) = self.rng.choose(&targets) else {
            return;
        };

        self.bounty = Some(Bounty { assassin, target });
        let target_name = self.name(target).to_string();
        self.journal.record_private(
            assassin,
            format!("🎯 CONTRACT: Kill {target_name} to win the round!"),
        );
        self.journal
            .record_private(assassin, "🤫 You have received a secret contract...");
    }

    pub(crate) fn names(&self, seats: impl IntoIterator<Item = PlayerId>) -> Vec<String> {
        seats.into_iter().map(|p| self.name(p).to_string()).collect()
    }
}

fn class_bonus(config: &MatchConfig, class: PlayerClass) -> i32 {
    if class == PlayerClass::Tank {
        config.tank_bonus
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MatchConfig {
        MatchConfig::new().with_seed(42).without_side_rolls()
    }

    #[test]
    fn test_roster_validation() {
        assert_eq!(
            Match::new(&["solo"], config()).err(),
            Some(MatchError::RosterSize(1))
        );
        let nine: Vec<String> = (0..9).map(|n| format!("p{n}")).collect();
        assert_eq!(Match::new(&nine, config()).err(), Some(MatchError::RosterSize(9)));
        assert_eq!(
            Match::new(&["a", "a"], config()).err(),
            Some(MatchError::DuplicateName("a".into()))
        );
        assert_eq!(Match::new(&["a", " "], config()).err(), Some(MatchError::EmptyName));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut bad = config();
        bad.event_capacity = 0;
        assert_eq!(
            Match::new(&["a", "b"], bad).err(),
            Some(MatchError::InvalidConfig("event_capacity must be at least 1"))
        );

        let mut bad = config();
        bad.health_range = (8, 4);
        assert!(matches!(
            Match::new(&["a", "b"], bad),
            Err(MatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_opening_health() {
        let game = Match::new(&["a", "b", "c", "d", "e", "f"], config()).unwrap();

        for (_, p) in game.participants() {
            let expected = if p.class == PlayerClass::Tank { 6 } else { 4 };
            assert_eq!(p.max_health, expected);
            assert_eq!(p.health, expected);
            assert!(!p.items.is_empty());
        }
        assert_eq!(game.round(), 1);
        assert_eq!(game.modifier(), None);
        assert_eq!(game.prize_pool(), 100_000);
    }

    #[test]
    fn test_opening_log() {
        let game = Match::new(&["ana", "bo"], config()).unwrap();
        let lines = game.journal().log.visible_tail(None, 20);

        assert_eq!(lines[0], "--- ROUND 1 START ---");
        assert_eq!(lines[1], "Players: ana, bo");
        assert!(lines[2].starts_with("🔫 Reloading..."));
    }

    #[test]
    fn test_advance_round_resets() {
        let mut game = Match::new(&["ana", "bo", "cy"], config()).unwrap();
        let bo = game.seat("bo").unwrap();
        game.alive.retain(|&p| p != bo);
        game.turn = 1;
        game.players[bo].skip_next_turn = true;
        game.players[bo].stats.deaths = 1;

        assert!(game.advance_round());

        assert_eq!(game.round(), 2);
        assert_eq!(game.alive().len(), 3);
        assert_eq!(game.turn, 0);
        assert!(!game.participant(bo).skip_next_turn);
        assert_eq!(game.participant(bo).stats.deaths, 1);
        assert!(game.modifier().is_some());
        assert_eq!(game.prize_pool(), 150_000);
        for (_, p) in game.participants() {
            let base = p.max_health - class_bonus(game.config(), p.class);
            assert!((4..=8).contains(&base));
        }
    }

    #[test]
    fn test_advance_stops_at_final_round() {
        let mut game = Match::new(&["ana", "bo"], config()).unwrap();

        assert!(game.advance_round());
        assert!(game.advance_round());
        assert!(!game.advance_round());
        assert_eq!(game.round(), 3);
        assert_eq!(game.prize_pool(), 200_000);
    }

    #[test]
    fn test_final_round_loads_magic() {
        let mut game = Match::new(&["ana", "bo"], config()).unwrap();
        game.advance_round();
        game.advance_round();

        let magic = game.deck().iter().filter(|s| *s == crate::deck::Shell::Magic).count();
        assert_eq!(magic, 1);
    }

    #[test]
    fn test_guaranteed_bounty_is_private_and_survives_opening_reload() {
        let mut game = Match::new(&["ana", "bo", "cy"], config().with_bounty_chance(1.0)).unwrap();
        assert!(game.bounty().is_none());

        game.advance_round();

        let bounty = game.bounty().expect("bounty issued");
        assert_ne!(bounty.assassin, bounty.target);

        let assassin_log = game.journal().log.visible_tail(Some(bounty.assassin), 50);
        assert!(assassin_log.iter().any(|l| l.starts_with("🎯 CONTRACT")));
        let public_log = game.journal().log.visible_tail(None, 50);
        assert!(!public_log.iter().any(|l| l.contains("CONTRACT")));
    }

    #[test]
    fn test_reload_expires_bounty() {
        let mut game = Match::new(&["ana", "bo"], config()).unwrap();
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.set_bounty(Some(Bounty { assassin: ana, target: bo }));

        game.reload();

        assert!(game.bounty().is_none());
        let lines = game.journal().log.visible_tail(Some(ana), 5);
        assert!(lines.iter().any(|l| l.contains("Contract EXPIRED")));
    }

    #[test]
    fn test_empty_modifier_pool() {
        let mut game = Match::new(&["ana", "bo"], config().with_modifier_pool(vec![])).unwrap();
        game.advance_round();
        assert_eq!(game.modifier(), None);
    }
}
