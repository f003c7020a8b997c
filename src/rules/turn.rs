//! Turn order and shot resolution.
//!
//! Only a draw moves the turn. A safe blank on yourself keeps it; every
//! other draw hands it to the next living seat, skipping handcuffed
//! seats (each skip flag is spent exactly once, so chains terminate).

use tracing::debug;

use super::damage::LETHAL_DAMAGE;
use crate::core::{Action, DrawMode, Match, PlayerId};
use crate::deck::Shell;
use crate::items::COMMON_POOL;
use crate::journal::EventKind;

/// Base damage of a safe-mode live hit.
const SAFE_DAMAGE: i32 = 1;

/// Base damage of a risk-mode live hit.
const RISK_DAMAGE: i32 = 3;

impl Match {
    /// Whose turn it is, or `None` once nobody is alive.
    #[must_use]
    pub fn current_actor(&self) -> Option<PlayerId> {
        if self.alive.is_empty() {
            return None;
        }
        Some(self.alive[self.turn % self.alive.len()])
    }

    /// Display name of the current actor.
    #[must_use]
    pub fn current_actor_name(&self) -> Option<&str> {
        self.current_actor().map(|p| self.name(p))
    }

    /// Apply one action from the current actor.
    pub fn submit(&mut self, action: &Action) {
        match action {
            Action::Draw { target, mode } => self.draw(target, *mode),
            Action::Use {
                item,
                target,
                steal_item,
            } => self.use_item(*item, target.as_deref(), *steal_item),
        }
    }

    /// Fire the front shell at `target`.
    ///
    /// Invalid targets and decided rounds are logged no-ops. An empty
    /// chamber is reloaded first.
    pub fn draw(&mut self, target: &str, mode: DrawMode) {
        if self.round_winner.is_some() {
            return;
        }
        let Some(actor) = self.current_actor() else {
            return;
        };
        let Some(mut target) = self.seat(target).filter(|&t| self.is_alive(t)) else {
            self.journal.record_private(actor, "Invalid target");
            return;
        };

        let forced = self.blackout_for == Some(actor);
        if forced {
            self.blackout_for = None;
            let opponents = self.opponents(actor);
            let Some(&picked) = self.rng.choose(&opponents) else {
                self.journal.record("No valid opponents for Blackout.");
                return;
            };
            target = picked;
            let name = self.name(target).to_string();
            self.journal.record(format!("🌑 Blackout → target forced to {name}"));
        }

        if self.deck.is_empty() {
            self.journal.record("⏹ Empty chamber. Reloading.");
            self.reload();
        }
        let Some(shell) = self.deck.pop_front() else {
            return;
        };

        let (actor_name, target_name) = (self.name(actor).to_string(), self.name(target).to_string());
        self.journal.emit(EventKind::ShotFired {
            player: actor_name.clone(),
            target: target_name.clone(),
            is_live: shell.is_live(),
            is_magic: shell == Shell::Magic,
            mode,
        });
        debug!(actor = %actor_name, target = %target_name, ?shell, %mode, forced, "shot fired");

        match mode {
            DrawMode::Safe => self.resolve_safe(actor, target, shell),
            DrawMode::Risk => self.resolve_risk(actor, target, shell, forced),
        }
    }

    fn resolve_safe(&mut self, actor: PlayerId, target: PlayerId, shell: Shell) {
        let (actor_name, target_name) = (self.name(actor).to_string(), self.name(target).to_string());
        self.journal.record(format!("🎯 {actor_name} Safe Shot → {target_name}"));

        if shell.is_live() {
            if shell == Shell::Magic {
                self.journal
                    .record(format!("💀 SUDDEN DEATH! {target_name} was obliterated!"));
            }
            let dmg = self.shot_damage(actor, shell, SAFE_DAMAGE);
            self.apply_damage(target, dmg, Some(actor));
            self.finish_turn(actor);
            self.maybe_trigger_blackout();
            return;
        }

        self.journal.record("Click! Blank round. No damage.");
        self.journal.emit(EventKind::Click {
            target: target_name,
        });
        if target == actor {
            self.journal
                .record(format!("{actor_name} survives the blank and keeps the turn!"));
            self.players[actor].stats.lucky_saves += 1;
        } else {
            self.finish_turn(actor);
        }
    }

    fn resolve_risk(&mut self, actor: PlayerId, target: PlayerId, shell: Shell, forced: bool) {
        let actor_name = self.name(actor).to_string();

        let backfire = if forced {
            let name = self.name(target).to_string();
            self.journal
                .record(format!("🎯 {actor_name} Risk Shot (blackout) → {name}"));
            false
        } else {
            self.journal.record(format!("🎯 {actor_name} Risk Shot..."));
            self.rng.chance(self.config.backfire_chance)
        };
        let victim = if backfire { actor } else { target };
        let victim_name = self.name(victim).to_string();

        if shell.is_live() {
            if backfire {
                self.journal
                    .record(format!("🔥 BACKFIRE! The gun snaps to {actor_name}!"));
            } else if !forced {
                self.journal
                    .record(format!("🔫 The gun stays steady on {victim_name}!"));
            }
            if shell == Shell::Magic {
                self.journal.record("💀 SUDDEN DEATH! INSTANT KILL!");
            }
            let dmg = self.shot_damage(actor, shell, RISK_DAMAGE);
            self.apply_damage(victim, dmg, Some(actor));
        } else {
            self.journal
                .record(format!("Aimed at {victim_name}... Click! Blank round."));
            self.journal.emit(EventKind::Click {
                target: victim_name,
            });
        }

        self.finish_turn(actor);
        self.maybe_trigger_blackout();
    }

    /// Damage for a live shell: base, +1 for a Double charge (spent here),
    /// then the Sniper roll. Magic ignores all of it.
    fn shot_damage(&mut self, shooter: PlayerId, shell: Shell, base: i32) -> i32 {
        let armed = std::mem::take(&mut self.players[shooter].double_armed);
        if shell == Shell::Magic {
            return LETHAL_DAMAGE;
        }
        let dmg = if armed { base + 1 } else { base };
        self.sniper_bonus(shooter, dmg)
    }

    /// Hand the turn on after a draw by `actor`.
    ///
    /// If the actor died, removal already moved the turn onto the next
    /// seat, so only the arrival checks run.
    pub(crate) fn finish_turn(&mut self, actor: PlayerId) {
        if self.round_winner.is_some() {
            return;
        }
        if self.is_alive(actor) {
            self.next_turn();
        } else {
            self.arrive();
        }
    }

    /// Rotate to the next living seat.
    pub fn next_turn(&mut self) {
        if self.round_winner.is_some() {
            return;
        }
        if self.alive.len() <= 1 {
            self.check_round_over();
            return;
        }
        self.turn = (self.turn + 1) % self.alive.len();
        self.arrive();
    }

    /// Per-arrival effects for the seat the turn just landed on: the Item
    /// Rain gift, then the handcuff check, repeated down the skip chain.
    pub(crate) fn arrive(&mut self) {
        loop {
            if self.alive.len() <= 1 {
                self.check_round_over();
                return;
            }
            let Some(seat) = self.current_actor() else {
                return;
            };
            let name = self.name(seat).to_string();

            if self.modifier.is_some_and(|m| m.gifts_items()) {
                if let Some(&gift) = self.rng.choose(&COMMON_POOL) {
                    self.players[seat].items.push(gift);
                    self.journal.record(format!("☔ Item Rain! {name} got a {gift}"));
                    self.journal.emit(EventKind::ItemRain {
                        player: name.clone(),
                        item: gift,
                    });
                }
            }

            if !self.players[seat].skip_next_turn {
                return;
            }
            self.players[seat].skip_next_turn = false;
            self.journal.record(format!("{name} was locked and loses turn!"));
            self.journal.emit(EventKind::Skip { player: name });
            self.turn = (self.turn + 1) % self.alive.len();
        }
    }

    /// 25% (by default) chance to black out the seat now holding the turn.
    fn maybe_trigger_blackout(&mut self) {
        if self.alive.len() < 2 || self.round_winner.is_some() {
            return;
        }
        if !self.rng.chance(self.config.blackout_chance) {
            return;
        }
        let Some(seat) = self.current_actor() else {
            return;
        };
        self.blackout_for = Some(seat);
        let name = self.name(seat).to_string();
        self.journal.record(format!(
            "🌑 BLACKOUT triggered! {name}'s next draw will have target chosen at random."
        ));
        self.journal.emit(EventKind::Blackout { active_player: name });
    }
}
