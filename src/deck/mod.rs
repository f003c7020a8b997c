//! The chamber: an ordered run of shells fired from the front.
//!
//! A fresh deck holds 4-8 shells with at least one live and one blank,
//! shuffled uniformly. In the final round one live shell is swapped for a
//! Magic shell. Reloads always compose a brand new deck; leftovers are
//! never reshuffled.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::core::GameRng;

/// Fewest shells in a fresh deck.
pub const MIN_SHELLS: i32 = 4;

/// Most shells in a fresh deck.
pub const MAX_SHELLS: i32 = 8;

/// One deck entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Shell {
    Blank,
    Live,
    /// Lethal live shell, final round only.
    Magic,
}

impl Shell {
    /// Does this shell deal damage?
    #[must_use]
    pub const fn is_live(self) -> bool {
        matches!(self, Shell::Live | Shell::Magic)
    }

    /// Label shown when the shell is revealed.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Shell::Blank => "Blank round",
            Shell::Live => "Live round",
            Shell::Magic => "Sudden Death",
        }
    }

    /// Polarity after an Inverter. Magic is neutralized, not flipped.
    #[must_use]
    pub const fn inverted(self) -> Shell {
        match self {
            Shell::Blank => Shell::Live,
            Shell::Live | Shell::Magic => Shell::Blank,
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Live/blank split of a freshly composed deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    /// Live shells, Magic included.
    pub live: usize,
    pub blank: usize,
    pub magic: bool,
}

impl Composition {
    /// Total shells.
    #[must_use]
    pub fn total(&self) -> usize {
        self.live + self.blank
    }
}

/// Ordered shells; index 0 is the next to fire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    shells: VecDeque<Shell>,
}

impl Deck {
    /// Build a deck from explicit shells, front first.
    pub fn from_shells(shells: impl IntoIterator<Item = Shell>) -> Self {
        Self {
            shells: shells.into_iter().collect(),
        }
    }

    /// Compose and shuffle a fresh deck.
    pub fn compose(rng: &mut GameRng, with_magic: bool) -> (Self, Composition) {
        let total = rng.gen_range_inclusive(MIN_SHELLS..=MAX_SHELLS) as usize;
        let live = rng.gen_range_inclusive(1..=(total as i32 - 1)) as usize;
        let blank = total - live;

        let mut shells: Vec<Shell> = std::iter::repeat(Shell::Live)
            .take(live)
            .chain(std::iter::repeat(Shell::Blank).take(blank))
            .collect();
        if with_magic {
            shells[0] = Shell::Magic;
        }
        rng.shuffle(&mut shells);

        let composition = Composition {
            live,
            blank,
            magic: with_magic,
        };
        (Self::from_shells(shells), composition)
    }

    /// Number of shells left.
    #[must_use]
    pub fn len(&self) -> usize {
        self.shells.len()
    }

    /// Check if the chamber is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.shells.is_empty()
    }

    /// Fire the front shell.
    pub fn pop_front(&mut self) -> Option<Shell> {
        self.shells.pop_front()
    }

    /// Look at the front shell.
    #[must_use]
    pub fn front(&self) -> Option<Shell> {
        self.shells.front().copied()
    }

    /// Look at the shell at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Shell> {
        self.shells.get(index).copied()
    }

    /// Replace the front shell, returning the old one.
    pub fn replace_front(&mut self, shell: Shell) -> Option<Shell> {
        self.shells.front_mut().map(|s| std::mem::replace(s, shell))
    }

    /// Live shells left, Magic counted as live.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.shells.iter().filter(|s| s.is_live()).count()
    }

    /// Blank shells left.
    #[must_use]
    pub fn blank_count(&self) -> usize {
        self.shells.len() - self.live_count()
    }

    /// Shells front to back.
    pub fn iter(&self) -> impl Iterator<Item = Shell> + '_ {
        self.shells.iter().copied()
    }
}
