//! Visibility-scoped text log.

use im::Vector;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::PlayerId;

/// Who may read a log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Public,
    /// Only these seats.
    Private(SmallVec<[PlayerId; 2]>),
}

impl Visibility {
    /// Visible to one seat only.
    pub fn only(player: PlayerId) -> Self {
        Self::Private(smallvec::smallvec![player])
    }

    /// Can `viewer` read this? Anonymous viewers see public lines only.
    #[must_use]
    pub fn admits(&self, viewer: Option<PlayerId>) -> bool {
        match self {
            Visibility::Public => true,
            Visibility::Private(audience) => viewer.is_some_and(|v| audience.contains(&v)),
        }
    }
}

/// An immutable log line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub text: String,
    pub visibility: Visibility,
}

/// Append-only log.
///
/// Backed by `im::Vector` so snapshots can hold a cheap copy.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Log {
    entries: Vector<LogEntry>,
}

impl Log {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line.
    pub fn push(&mut self, text: String, visibility: Visibility) {
        self.entries.push_back(LogEntry { text, visibility });
    }

    /// Total lines, all audiences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the log is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// The newest `window` lines `viewer` may read, oldest first.
    #[must_use]
    pub fn visible_tail(&self, viewer: Option<PlayerId>, window: usize) -> Vec<String> {
        let mut tail: Vec<String> = self
            .entries
            .iter()
            .rev()
            .filter(|e| e.visibility.admits(viewer))
            .take(window)
            .map(|e| e.text.clone())
            .collect();
        tail.reverse();
        tail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert!(Visibility::Public.admits(None));
        assert!(Visibility::Public.admits(Some(p1)));
        assert!(Visibility::only(p0).admits(Some(p0)));
        assert!(!Visibility::only(p0).admits(Some(p1)));
        assert!(!Visibility::only(p0).admits(None));
    }

    #[test]
    fn test_visible_tail_filters_then_truncates() {
        let p0 = PlayerId::new(0);
        let mut log = Log::new();
        for n in 0..25 {
            log.push(format!("public {n}"), Visibility::Public);
        }
        log.push("secret".into(), Visibility::only(p0));

        let anon = log.visible_tail(None, 20);
        assert_eq!(anon.len(), 20);
        assert_eq!(anon.first().map(String::as_str), Some("public 5"));
        assert_eq!(anon.last().map(String::as_str), Some("public 24"));

        let owner = log.visible_tail(Some(p0), 20);
        assert_eq!(owner.len(), 20);
        assert_eq!(owner.last().map(String::as_str), Some("secret"));
        assert_eq!(owner.first().map(String::as_str), Some("public 6"));
    }
}
