//! Match hub: many independent matches behind one handle.
//!
//! Each match sits behind its own mutex, so one action or snapshot holds
//! exactly one match. The registry lock is only held long enough to find
//! or insert a match. A poisoned lock is recovered rather than propagated;
//! every mutation of a `Match` completes before its guard drops.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::{Action, DrawMode, Match, MatchConfig, MatchError};
use crate::items::Item;
use crate::snapshot::Snapshot;

/// Handle for a match registered with a hub.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchId(pub u64);

impl fmt::Display for MatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "match-{}", self.0)
    }
}

/// Registry of running matches.
pub struct MatchHub {
    matches: RwLock<FxHashMap<MatchId, Arc<Mutex<Match>>>>,
    next_id: AtomicU64,
    config: MatchConfig,
}

impl MatchHub {
    /// Create a hub whose matches all use `config`.
    ///
    /// With a fixed seed, match `n` is seeded with `seed + n`, so a seeded
    /// hub is reproducible without every match replaying the same stream.
    pub fn new(config: MatchConfig) -> Self {
        Self {
            matches: RwLock::new(FxHashMap::default()),
            next_id: AtomicU64::new(1),
            config,
        }
    }

    /// Start a match for `roster` and register it.
    pub fn create<S: AsRef<str>>(&self, roster: &[S]) -> Result<MatchId, MatchError> {
        let id = MatchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut config = self.config.clone();
        config.seed = config.seed.map(|seed| seed.wrapping_add(id.0));
        let game = Match::new(roster, config)?;
        self.matches
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id, Arc::new(Mutex::new(game)));
        info!(%id, players = roster.len(), "match registered");
        Ok(id)
    }

    /// Draw for the current actor. `mode` is parsed leniently.
    pub fn submit_draw(&self, id: MatchId, target: &str, mode: Option<&str>) -> Result<(), MatchError> {
        let mode = DrawMode::parse_lenient(mode);
        self.with_match(id, |game| game.draw(target, mode))
    }

    /// Use an item for the current actor.
    ///
    /// Unknown item names become a private failure line for the actor, like
    /// any other invalid use. An unknown steal choice fails the Steal, which
    /// is refunded.
    pub fn submit_use(
        &self,
        id: MatchId,
        item: &str,
        target: Option<&str>,
        steal_choice: Option<&str>,
    ) -> Result<(), MatchError> {
        self.with_match(id, |game| match item.parse::<Item>() {
            Ok(item) => game.use_item_named(item, target, steal_choice),
            Err(unknown) => {
                debug!(%id, %unknown, "rejected item");
                if let Some(actor) = game.current_actor() {
                    game.journal.record_private(actor, "Item not owned");
                }
            }
        })
    }

    /// Apply an already typed action.
    pub fn submit(&self, id: MatchId, action: &Action) -> Result<(), MatchError> {
        self.with_match(id, |game| game.submit(action))
    }

    /// Start the next round. `Ok(false)` once the final round was reached.
    pub fn advance_round(&self, id: MatchId) -> Result<bool, MatchError> {
        self.with_match(id, Match::advance_round)
    }

    /// Projection for `viewer`.
    pub fn snapshot(&self, id: MatchId, viewer: Option<&str>) -> Result<Snapshot, MatchError> {
        self.with_match(id, |game| game.snapshot(viewer))
    }

    /// Name of the seat whose turn it is.
    pub fn current_actor(&self, id: MatchId) -> Result<Option<String>, MatchError> {
        self.with_match(id, |game| game.current_actor_name().map(str::to_string))
    }

    /// Drop a match. Returns false if it was not registered.
    pub fn remove(&self, id: MatchId) -> bool {
        let removed = self
            .matches
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .remove(&id)
            .is_some();
        if removed {
            info!(%id, "match removed");
        }
        removed
    }

    /// Number of registered matches.
    pub fn len(&self) -> usize {
        self.matches.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn handle(&self, id: MatchId) -> Result<Arc<Mutex<Match>>, MatchError> {
        self.matches
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&id)
            .cloned()
            .ok_or(MatchError::UnknownMatch(id.0))
    }

    fn with_match<R>(&self, id: MatchId, f: impl FnOnce(&mut Match) -> R) -> Result<R, MatchError> {
        let handle = self.handle(id)?;
        let mut guard: MutexGuard<'_, Match> = handle.lock().unwrap_or_else(|e| e.into_inner());
        Ok(f(&mut guard))
    }
}

impl Default for MatchHub {
    fn default() -> Self {
        Self::new(MatchConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hub() -> MatchHub {
        MatchHub::new(MatchConfig::new().with_seed(1).without_side_rolls())
    }

    #[test]
    fn test_create_and_remove() {
        let hub = hub();
        let a = hub.create(&["ana", "bo"]).unwrap();
        let b = hub.create(&["cy", "di"]).unwrap();

        assert_ne!(a, b);
        assert_eq!(hub.len(), 2);
        assert!(hub.remove(a));
        assert!(!hub.remove(a));
        assert_eq!(hub.len(), 1);
    }

    #[test]
    fn test_seed_derived_per_match() {
        let hub = hub();
        let a = hub.create(&["ana", "bo"]).unwrap();
        let b = hub.create(&["ana", "bo"]).unwrap();

        let seed_of = |id| hub.with_match(id, |game| game.rng_state().seed).unwrap();
        assert_eq!(seed_of(a), 2);
        assert_eq!(seed_of(b), 3);
    }

    #[test]
    fn test_unseeded_hub_stays_unseeded() {
        let hub = MatchHub::default();
        let id = hub.create(&["ana", "bo"]).unwrap();
        assert_eq!(hub.with_match(id, |game| game.config().seed).unwrap(), None);
    }

    #[test]
    fn test_unknown_match() {
        let hub = hub();
        assert_eq!(
            hub.current_actor(MatchId(99)),
            Err(MatchError::UnknownMatch(99))
        );
    }

    #[test]
    fn test_bad_roster_not_registered() {
        let hub = hub();
        assert_eq!(hub.create(&["solo"]), Err(MatchError::RosterSize(1)));
        assert!(hub.is_empty());
    }

    #[test]
    fn test_unknown_item_is_private() {
        let hub = hub();
        let id = hub.create(&["ana", "bo"]).unwrap();

        hub.submit_use(id, "Shotgun", None, None).unwrap();

        let snap = hub.snapshot(id, Some("ana")).unwrap();
        assert_eq!(snap.logs.last().map(String::as_str), Some("Item not owned"));
        let public = hub.snapshot(id, None).unwrap();
        assert_ne!(public.logs.last().map(String::as_str), Some("Item not owned"));
    }
}
