//! Damage adjudication: modifiers, stats, kills and contracts.

use tracing::debug;

use super::Modifier;
use crate::core::{Match, PlayerClass, PlayerId};
use crate::journal::EventKind;

/// Damage dealt by a Magic shell. Always lethal.
pub const LETHAL_DAMAGE: i32 = 999;

const HIT_LINES: [&str; 4] = [
    "💥 BLAST! {} staggers back!",
    "🔥 IMPACT! {} reels from the shot!",
    "💀 STRIKE! {} takes the hit!",
    "⚡ CRACK! {} stumbles!",
];

const DEATH_LINES: [&str; 2] = ["💀 {} falls! OUT!", "☠️ {} is down! OUT!"];

impl Match {
    /// Apply shot damage from `source` to `victim`. Returns true on a kill.
    ///
    /// A kill that fulfils the active contract ends the round for the
    /// assassin no matter how many seats are left.
    pub(crate) fn apply_damage(&mut self, victim: PlayerId, mut dmg: i32, source: Option<PlayerId>) -> bool {
        if self.modifier == Some(Modifier::DoubleDamage) {
            dmg *= 2;
            self.journal.record("💀 Double Trouble! Damage x2!");
        }

        self.players[victim].health -= dmg;
        let amount = dmg.max(0) as u32;
        match source {
            Some(s) if s != victim => self.players[s].stats.dmg_dealt += amount,
            Some(s) => self.players[s].stats.self_harm += amount,
            None => {}
        }
        self.players[victim].stats.dmg_taken += amount;

        let victim_name = self.name(victim).to_string();
        let line = self.flavor(&HIT_LINES, &victim_name);
        self.journal.record(format!("{line} (-{dmg} Health)"));

        let is_kill = self.players[victim].is_dead();
        if is_kill {
            self.players[victim].stats.deaths += 1;
            if let Some(s) = source.filter(|&s| s != victim) {
                self.players[s].stats.kills += 1;
            }
        }
        let source_name = source.map(|s| self.name(s).to_string());
        self.journal.emit(EventKind::Damage {
            target: victim_name.clone(),
            amount: dmg,
            source: source_name,
            is_kill,
        });
        debug!(victim = %victim_name, dmg, is_kill, "damage applied");

        if let (true, Some(killer)) = (is_kill, source) {
            if self.bounty.is_some_and(|b| b.is_fulfilled_by(killer, victim)) {
                self.complete_bounty(killer, victim);
                return true;
            }
        }

        if let Some(s) = source {
            if self.modifier == Some(Modifier::LifeSteal)
                && s != victim
                && self.is_alive(s)
                && !self.players[s].is_dead()
                && self.players[s].heal_capped(1) > 0
            {
                let name = self.name(s).to_string();
                self.journal.record(format!("🧛 Vampirism! {name} drains life!"));
                self.journal.emit(EventKind::Heal {
                    target: name,
                    amount: 1,
                    is_vampire: true,
                });
            }
        }

        if is_kill {
            self.eliminate(victim);
            return true;
        }
        false
    }

    /// Remove a dead seat from the round and check for a round winner.
    pub(crate) fn eliminate(&mut self, victim: PlayerId) {
        let name = self.name(victim).to_string();
        let line = self.flavor(&DEATH_LINES, &name);
        self.journal.record(line);
        self.remove_from_alive(victim);
        self.journal.emit(EventKind::Death { player: name });
        self.check_round_over();
    }

    /// Drop a seat from `alive` without disturbing whose turn it is.
    ///
    /// If the removed seat is the current actor, the turn lands on the
    /// seat that followed it.
    pub(crate) fn remove_from_alive(&mut self, victim: PlayerId) {
        let Some(removed) = self.alive.iter().position(|&p| p == victim) else {
            return;
        };
        let current = self.turn % self.alive.len();
        self.alive.remove(removed);
        if self.alive.is_empty() {
            self.turn = 0;
            return;
        }
        let current = if removed < current { current - 1 } else { current };
        self.turn = current % self.alive.len();
        if self.blackout_for == Some(victim) {
            self.blackout_for = None;
        }
    }

    /// Roll the Sniper crit on top of `base`.
    pub(crate) fn sniper_bonus(&mut self, shooter: PlayerId, base: i32) -> i32 {
        if self.players[shooter].class == PlayerClass::Sniper && self.rng.chance(self.config.sniper_crit_chance) {
            let player = self.name(shooter).to_string();
            self.journal.record("🎯 Sniper Critical Hit!");
            self.journal.emit(EventKind::Crit { player });
            return base + 1;
        }
        base
    }

    fn complete_bounty(&mut self, assassin: PlayerId, victim: PlayerId) {
        let assassin_name = self.name(assassin).to_string();
        let victim_name = self.name(victim).to_string();

        self.bounty = None;
        self.journal.record(format!(
            "🎯 CONTRACT COMPLETE! {assassin_name} eliminated {victim_name}!"
        ));
        self.journal.emit(EventKind::BountyComplete {
            assassin: assassin_name.clone(),
        });
        self.remove_from_alive(victim);
        self.journal.record(format!("🏆 {assassin_name} wins by contract!"));
        self.conclude_round(assassin);
    }

    fn flavor(&mut self, lines: &[&str], name: &str) -> String {
        let template = self.rng.choose(lines).copied().unwrap_or("{}");
        template.replacen("{}", name, 1)
    }
}
