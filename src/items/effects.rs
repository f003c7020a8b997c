//! Item resolution.
//!
//! `use_item` validates ownership, spends the item, then runs its effect.
//! An effect that fails validation returns an `ItemFailure`; the item is
//! handed back and the actor alone sees why. Items never move the turn.
//!
//! A stolen item is resolved again as if the thief had used it. The
//! re-entry is bounded by `MatchConfig::steal_depth_limit`; past the limit
//! the stolen item just stays in the thief's inventory.

use tracing::debug;

use super::{Item, COMMON_POOL};
use crate::core::{ItemFailure, Match, PlayerId};
use crate::deck::Shell;
use crate::journal::EventKind;

/// Label shown by a Phone when it lands on the Magic shell.
const MAGIC_PEEK_LABEL: &str = "💀 SUDDEN DEATH BULLET";

/// Sub-effects of a Mystery Box, equally likely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum BoxOutcome {
    Heal,
    Trap,
    Loot,
    Reload,
}

const BOX_OUTCOMES: [BoxOutcome; 4] = [
    BoxOutcome::Heal,
    BoxOutcome::Trap,
    BoxOutcome::Loot,
    BoxOutcome::Reload,
];

/// Which item a Steal takes from its victim.
#[derive(Clone, Debug, PartialEq, Eq)]
enum StealPick {
    Random,
    Named(Item),
    /// A name that matched no item. No victim can hold it.
    Unknown(String),
}

impl Match {
    /// Spend `item` as the current actor.
    ///
    /// For a Diamond, `target` names the wished-for item. `steal` picks the
    /// item to take when `item` is a Steal; otherwise one is chosen at
    /// random from the target's inventory.
    pub fn use_item(&mut self, item: Item, target: Option<&str>, steal: Option<Item>) {
        self.begin_use(item, target, steal.map_or(StealPick::Random, StealPick::Named));
    }

    /// Like `use_item`, with the steal choice as raw transport input.
    ///
    /// A choice that names no item is kept as given: the Steal fails with
    /// "does not have" and is refunded instead of falling back to a
    /// random pick.
    pub fn use_item_named(&mut self, item: Item, target: Option<&str>, steal_choice: Option<&str>) {
        let pick = match steal_choice {
            None => StealPick::Random,
            Some(raw) => raw
                .parse::<Item>()
                .map_or_else(|_| StealPick::Unknown(raw.to_string()), StealPick::Named),
        };
        self.begin_use(item, target, pick);
    }

    fn begin_use(&mut self, item: Item, target: Option<&str>, steal: StealPick) {
        if self.round_winner.is_some() {
            return;
        }
        let Some(actor) = self.current_actor() else {
            return;
        };

        if self.players[actor].action_blocked {
            self.players[actor].action_blocked = false;
            let name = self.name(actor).to_string();
            self.journal
                .record_private(actor, format!("{name} is jammed and can't use items!"));
            return;
        }

        self.resolve_use(actor, item, target, steal, 0);
    }

    fn resolve_use(
        &mut self,
        actor: PlayerId,
        item: Item,
        target: Option<&str>,
        steal: StealPick,
        depth: usize,
    ) {
        if !self.players[actor].take_item(item) {
            self.journal.record_private(actor, "Item not owned");
            return;
        }
        self.players[actor].stats.items_used += 1;

        let actor_name = self.name(actor).to_string();
        self.journal.emit(EventKind::UseItem {
            player: actor_name.clone(),
            item,
            target: target.map(str::to_string),
        });
        debug!(actor = %actor_name, %item, ?target, depth, "item used");

        // Steal and Skip aim at the lone opponent when nobody is named.
        let defaulted;
        let target = match target {
            None if matches!(item, Item::Steal | Item::Skip) => {
                let opponents = self.opponents(actor);
                if let [only] = opponents.as_slice() {
                    defaulted = self.name(*only).to_string();
                    Some(defaulted.as_str())
                } else {
                    None
                }
            }
            other => other,
        };

        if let Err(failure) = self.apply_effect(actor, item, target, steal, depth) {
            self.players[actor].items.push(item);
            self.journal.record_private(actor, failure.to_string());
            debug!(actor = %actor_name, %item, %failure, "item refunded");
        }
    }

    fn apply_effect(
        &mut self,
        actor: PlayerId,
        item: Item,
        target: Option<&str>,
        steal: StealPick,
        depth: usize,
    ) -> Result<(), ItemFailure> {
        let actor_name = self.name(actor).to_string();

        match item {
            Item::Steal => {
                let victim = target
                    .and_then(|t| self.seat(t))
                    .filter(|&v| v != actor && self.is_alive(v))
                    .ok_or(ItemFailure::InvalidTarget { item: "Steal" })?;
                let victim_name = self.name(victim).to_string();

                if self.players[victim].items.is_empty() {
                    return Err(ItemFailure::NothingToSteal { target: victim_name });
                }
                let taken = match steal {
                    StealPick::Named(choice) => choice,
                    StealPick::Random => {
                        let idx = self.rng.gen_index(self.players[victim].items.len());
                        self.players[victim].items[idx]
                    }
                    StealPick::Unknown(raw) => {
                        return Err(ItemFailure::NotHeldByTarget {
                            target: victim_name,
                            item: raw,
                        });
                    }
                };
                if !self.players[victim].take_item(taken) {
                    return Err(ItemFailure::NotHeldByTarget {
                        target: victim_name,
                        item: taken.to_string(),
                    });
                }

                self.players[actor].items.push(taken);
                self.journal
                    .record(format!("💉 {actor_name} stole {taken} from {victim_name}!"));

                if depth + 1 < self.config.steal_depth_limit {
                    self.resolve_use(
                        actor,
                        taken,
                        Some(victim_name.as_str()),
                        StealPick::Random,
                        depth + 1,
                    );
                } else {
                    debug!(actor = %actor_name, %taken, depth, "steal chain capped");
                }
            }

            Item::Skip => {
                let victim = target
                    .and_then(|t| self.seat(t))
                    .filter(|&v| self.is_alive(v))
                    .ok_or(ItemFailure::InvalidTarget { item: "Skip" })?;
                self.players[victim].skip_next_turn = true;
                let victim_name = self.name(victim).to_string();
                self.journal.record(format!(
                    "⛓️ {victim_name} is handcuffed! They will miss their next turn."
                ));
                self.journal.emit(EventKind::Handcuffed { player: victim_name });
            }

            Item::PeekRandom => {
                // An empty chamber spends the Phone for nothing.
                if !self.deck.is_empty() {
                    let idx = self.rng.gen_index(self.deck.len());
                    if let Some(shell) = self.deck.get(idx) {
                        let label = match shell {
                            Shell::Magic => MAGIC_PEEK_LABEL,
                            other => other.label(),
                        };
                        self.journal.record_private(
                            actor,
                            format!("🤫 Peek → shell {} is {label}", idx + 1),
                        );
                        self.journal
                            .record(format!("{actor_name} checks a random shell phone..."));
                    }
                }
            }

            Item::Heal => {
                if self.players[actor].heal_capped(1) == 0 {
                    return Err(ItemFailure::FullHealth { player: actor_name });
                }
                self.journal.record(format!("{actor_name} gains 1 Health"));
                self.journal.emit(EventKind::Heal {
                    target: actor_name,
                    amount: 1,
                    is_vampire: false,
                });
            }

            Item::Double => {
                self.players[actor].double_armed = true;
                self.journal.record(format!(
                    "{actor_name} saws off the barrel! Next hit deals DOUBLE damage."
                ));
            }

            Item::Discard => {
                if let Some(gone) = self.deck.pop_front() {
                    self.journal.record(format!("Discarded {gone}"));
                }
            }

            Item::Lens => {
                if let Some(front) = self.deck.front() {
                    // Magic reads as an ordinary live round.
                    let shown = if front == Shell::Magic { Shell::Live } else { front };
                    self.journal
                        .record_private(actor, format!("🔍 Current shell is: {shown}"));
                    self.journal
                        .record(format!("{actor_name} inspects the chamber..."));
                }
            }

            Item::Diamond => {
                let raw = target.ok_or(ItemFailure::NoWish)?;
                let wish = raw
                    .parse::<Item>()
                    .ok()
                    .filter(|w| w.is_wishable())
                    .ok_or_else(|| ItemFailure::InvalidWish(raw.to_string()))?;

                self.players[actor].items.push(wish);
                self.journal
                    .record(format!("💎 {actor_name} wishes for a {wish}!"));

                let wiped: usize = self
                    .opponents(actor)
                    .into_iter()
                    .map(|p| self.players[p].purge_item(wish))
                    .sum();
                if wiped > 0 {
                    self.journal.record(format!(
                        "✨ The wish ripples out... {wiped} {wish}(s) vanished from opponents!"
                    ));
                }
            }

            Item::Inverter => {
                let front = self.deck.front().ok_or(ItemFailure::EmptyChamber)?;
                let flipped = front.inverted();
                self.deck.replace_front(flipped);
                if front == Shell::Magic {
                    self.journal
                        .record(format!("⚡ {actor_name} neutralized the anomaly! It's now Blank!"));
                }
                self.journal.record(format!(
                    "⚡ {actor_name} inverted the polarity! The shell is now {flipped}!"
                ));
                self.journal.emit(EventKind::Inverse { player: actor_name });
            }

            Item::MysteryBox => self.open_mystery_box(actor),
        }

        Ok(())
    }

    fn open_mystery_box(&mut self, actor: PlayerId) {
        let name = self.name(actor).to_string();
        self.journal
            .record(format!("❓ {name} opens the Mystery Box..."));

        let outcome = self
            .rng
            .choose(&BOX_OUTCOMES)
            .copied()
            .unwrap_or(BoxOutcome::Loot);
        debug!(actor = %name, ?outcome, "mystery box");

        match outcome {
            BoxOutcome::Heal => {
                // Not capped: the box can push past max health.
                self.players[actor].health += 2;
                self.journal.record("💖 Miracle! +2 HP!");
                self.journal.emit(EventKind::Heal {
                    target: name,
                    amount: 2,
                    is_vampire: false,
                });
            }
            BoxOutcome::Trap => {
                let player = &mut self.players[actor];
                player.health -= 1;
                player.stats.self_harm += 1;
                player.stats.dmg_taken += 1;
                let dead = player.is_dead();
                if dead {
                    player.stats.deaths += 1;
                }
                self.journal.record("💥 Trap! -1 HP!");
                self.journal.emit(EventKind::Damage {
                    target: name.clone(),
                    amount: 1,
                    source: Some(name),
                    is_kill: dead,
                });
                if dead {
                    self.eliminate(actor);
                    // The turn already slid onto the next seat.
                    if self.round_winner.is_none() {
                        self.arrive();
                    }
                }
            }
            BoxOutcome::Loot => {
                let loot: Vec<Item> = (0..2)
                    .filter_map(|_| self.rng.choose(&COMMON_POOL).copied())
                    .collect();
                let listed: Vec<&str> = loot.iter().map(|i| i.label()).collect();
                self.players[actor].items.extend(loot.iter().copied());
                self.journal
                    .record(format!("🎁 Jackpot! Found {}!", listed.join(", ")));
            }
            BoxOutcome::Reload => {
                self.journal.record("🔄 The box contained... a new gun?");
                self.reload();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MatchConfig;
    use crate::deck::Deck;

    fn table(names: &[&str]) -> Match {
        let mut game =
            Match::new(names, MatchConfig::new().with_seed(5).without_side_rolls()).unwrap();
        for seat in game.alive().to_vec() {
            game.set_items(seat, Vec::new());
        }
        game
    }

    fn private_tail(game: &Match, seat: PlayerId) -> Vec<String> {
        game.journal().log.visible_tail(Some(seat), 5)
    }

    #[test]
    fn test_item_not_owned() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();

        game.use_item(Item::Heal, None, None);

        assert_eq!(private_tail(&game, ana).last().unwrap(), "Item not owned");
        assert_eq!(game.participant(ana).stats.items_used, 0);
    }

    #[test]
    fn test_blocked_consumes_nothing() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Double);
        game.block_actions(ana);

        game.use_item(Item::Double, None, None);

        assert!(game.participant(ana).holds(Item::Double));
        assert!(!game.participant(ana).action_blocked);
        assert!(!game.participant(ana).double_armed);

        game.use_item(Item::Double, None, None);
        assert!(game.participant(ana).double_armed);
    }

    #[test]
    fn test_heal_refunded_at_full() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Heal);

        game.use_item(Item::Heal, None, None);

        assert!(game.participant(ana).holds(Item::Heal));
        assert!(private_tail(&game, ana)
            .last()
            .unwrap()
            .ends_with("is already at full health"));
    }

    #[test]
    fn test_skip_defaults_to_lone_opponent() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.give_item(ana, Item::Skip);

        game.use_item(Item::Skip, None, None);

        assert!(game.participant(bo).skip_next_turn);
        assert_eq!(game.current_actor(), Some(ana));
    }

    #[test]
    fn test_skip_without_target_in_crowd_refunds() {
        let mut game = table(&["ana", "bo", "cy"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Skip);

        game.use_item(Item::Skip, None, None);

        assert!(game.participant(ana).holds(Item::Skip));
        assert_eq!(
            private_tail(&game, ana).last().unwrap(),
            "Skip failed: Invalid target"
        );
    }

    #[test]
    fn test_steal_nothing_to_take() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Steal);

        game.use_item(Item::Steal, Some("bo"), None);

        assert!(game.participant(ana).holds(Item::Steal));
        assert_eq!(private_tail(&game, ana).last().unwrap(), "bo has no items to steal");
    }

    #[test]
    fn test_steal_named_item_missing() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.give_item(ana, Item::Steal);
        game.give_item(bo, Item::Heal);

        game.use_item(Item::Steal, Some("bo"), Some(Item::Lens));

        assert_eq!(game.participant(ana).items, vec![Item::Steal]);
        assert_eq!(game.participant(bo).items, vec![Item::Heal]);
    }

    #[test]
    fn test_steal_unknown_choice_refunds() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.give_item(ana, Item::Steal);
        game.give_item(bo, Item::Lens);

        game.use_item_named(Item::Steal, Some("bo"), Some("Shotgun"));

        assert_eq!(game.participant(ana).items, vec![Item::Steal]);
        assert_eq!(game.participant(bo).items, vec![Item::Lens]);
        assert_eq!(private_tail(&game, ana).last().unwrap(), "bo does not have Shotgun");
    }

    #[test]
    fn test_steal_choice_by_label() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.give_item(ana, Item::Steal);
        game.set_items(bo, vec![Item::Skip, Item::Double]);

        game.use_item_named(Item::Steal, Some("bo"), Some(Item::Double.label()));

        // The stolen Knife is used on the spot
        assert!(game.participant(ana).double_armed);
        assert_eq!(game.participant(bo).items, vec![Item::Skip]);
    }

    #[test]
    fn test_steal_chain_is_capped() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.give_item(ana, Item::Steal);
        game.set_items(bo, vec![Item::Steal; 6]);

        game.use_item(Item::Steal, Some("bo"), None);

        // Depth 0..3 resolve; the fourth stolen Steal is kept unused
        assert_eq!(game.participant(ana).items, vec![Item::Steal]);
        assert_eq!(game.participant(bo).items.len(), 2);
        assert_eq!(game.participant(ana).stats.items_used, 4);
    }

    #[test]
    fn test_diamond_requires_wishable_item() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Diamond);

        game.use_item(Item::Diamond, None, None);
        game.use_item(Item::Diamond, Some("Diamond"), None);
        game.use_item(Item::Diamond, Some("Shotgun"), None);

        assert_eq!(game.participant(ana).items, vec![Item::Diamond]);
        assert_eq!(
            private_tail(&game, ana).last().unwrap(),
            "Diamond failed: Invalid item Shotgun"
        );
    }

    #[test]
    fn test_lens_disguises_magic() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        let bo = game.seat("bo").unwrap();
        game.give_item(ana, Item::Lens);
        game.set_deck(Deck::from_shells([Shell::Magic, Shell::Blank]));

        game.use_item(Item::Lens, None, None);

        assert!(private_tail(&game, ana)
            .iter()
            .any(|l| l == "🔍 Current shell is: Live round"));
        assert!(!private_tail(&game, bo).iter().any(|l| l.starts_with("🔍")));
    }

    #[test]
    fn test_inverter_neutralizes_magic() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.set_items(ana, vec![Item::Inverter, Item::Inverter]);
        game.set_deck(Deck::from_shells([Shell::Magic]));

        game.use_item(Item::Inverter, None, None);
        assert_eq!(game.deck().front(), Some(Shell::Blank));

        game.use_item(Item::Inverter, None, None);
        assert_eq!(game.deck().front(), Some(Shell::Live));
    }

    #[test]
    fn test_inverter_empty_refunds() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Inverter);
        game.set_deck(Deck::default());

        game.use_item(Item::Inverter, None, None);

        assert!(game.participant(ana).holds(Item::Inverter));
    }

    #[test]
    fn test_discard_pops_front() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Discard);
        game.set_deck(Deck::from_shells([Shell::Live, Shell::Blank]));

        game.use_item(Item::Discard, None, None);

        assert_eq!(game.deck().len(), 1);
        assert_eq!(game.deck().front(), Some(Shell::Blank));
        assert_eq!(game.current_actor(), Some(ana));
    }

    #[test]
    fn test_nothing_after_round_decided() {
        let mut game = table(&["ana", "bo"]);
        let ana = game.seat("ana").unwrap();
        game.give_item(ana, Item::Double);
        game.round_winner = Some(ana);

        game.use_item(Item::Double, None, None);

        assert!(game.participant(ana).holds(Item::Double));
    }
}
