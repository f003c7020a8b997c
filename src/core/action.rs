//! Actions an actor can submit.
//!
//! A match accepts exactly two verbs: draw (fire the front shell at a
//! target) and use (spend an item). Both arrive from the transport as
//! loose strings, so `DrawMode` and `Item` parse leniently and the
//! resolver validates the rest.

use serde::{Deserialize, Serialize};

use crate::items::Item;

/// How a shot is fired.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// 1 damage; a blank on yourself keeps the turn.
    #[default]
    Safe,
    /// 3 damage, but the gun may snap back to the shooter.
    Risk,
}

impl DrawMode {
    /// Parse transport input. Anything other than `"risk"` is `Safe`.
    #[must_use]
    pub fn parse_lenient(raw: Option<&str>) -> Self {
        match raw {
            Some(s) if s.eq_ignore_ascii_case("risk") => DrawMode::Risk,
            _ => DrawMode::Safe,
        }
    }
}

impl std::fmt::Display for DrawMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DrawMode::Safe => f.write_str("safe"),
            DrawMode::Risk => f.write_str("risk"),
        }
    }
}

/// A complete action from the current actor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    Draw {
        target: String,
        #[serde(default)]
        mode: DrawMode,
    },
    Use {
        item: Item,
        #[serde(default)]
        target: Option<String>,
        #[serde(default)]
        steal_item: Option<Item>,
    },
}

impl Action {
    /// Draw action.
    pub fn draw(target: impl Into<String>, mode: DrawMode) -> Self {
        Self::Draw {
            target: target.into(),
            mode,
        }
    }

    /// Item use with an optional target.
    pub fn use_item(item: Item, target: Option<&str>) -> Self {
        Self::Use {
            item,
            target: target.map(str::to_string),
            steal_item: None,
        }
    }

    /// Choose the item to take when `item` is a Steal.
    #[must_use]
    pub fn with_steal_choice(mut self, choice: Item) -> Self {
        if let Self::Use { steal_item, .. } = &mut self {
            *steal_item = Some(choice);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parse() {
        assert_eq!(DrawMode::parse_lenient(Some("risk")), DrawMode::Risk);
        assert_eq!(DrawMode::parse_lenient(Some("RISK")), DrawMode::Risk);
        assert_eq!(DrawMode::parse_lenient(Some("safe")), DrawMode::Safe);
        assert_eq!(DrawMode::parse_lenient(Some("yolo")), DrawMode::Safe);
        assert_eq!(DrawMode::parse_lenient(None), DrawMode::Safe);
    }

    #[test]
    fn test_steal_choice_only_on_use() {
        let a = Action::use_item(Item::Steal, Some("bo")).with_steal_choice(Item::Heal);
        assert_eq!(
            a,
            Action::Use {
                item: Item::Steal,
                target: Some("bo".into()),
                steal_item: Some(Item::Heal),
            }
        );

        let d = Action::draw("bo", DrawMode::Safe).with_steal_choice(Item::Heal);
        assert_eq!(d, Action::draw("bo", DrawMode::Safe));
    }

    #[test]
    fn test_action_serde() {
        let json = r#"{"type":"draw","target":"bo"}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action, Action::draw("bo", DrawMode::Safe));

        let json = r#"{"type":"use","item":"Cigarette"}"#;
        let action: Action = serde_json::from_str(json).unwrap();
        assert_eq!(action, Action::use_item(Item::Heal, None));
    }
}
