//! Behavior and improvement item records.
//!
//! # Responsibility
//! - Define the stored shape of a behavior with its embedded items.
//! - Provide view projections: completion stats, item ordering, previews.
//!
//! # Invariants
//! - `user_id` is assigned at creation and never reassigned.
//! - Item ids are unique within their parent behavior.
//! - `created_at` values are Unix epoch milliseconds.

use crate::model::ids::{new_record_id, now_epoch_ms};
use crate::model::user::UserId;
use crate::model::validation::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Stable behavior identifier, unique across the whole store.
pub type BehaviorId = String;
/// Item identifier, unique within one behavior.
pub type ItemId = String;

/// Number of characters kept by [`Behavior::description_preview`].
pub const DESCRIPTION_PREVIEW_CHARS: usize = 100;
/// Number of behaviors shown on the home view.
pub const HOME_BEHAVIOR_LIMIT: usize = 5;

/// Color palette for behaviors.
///
/// Stored as a plain lowercase string. Names outside the palette found in
/// stored documents are kept verbatim as `Unlisted` so rewrites preserve them;
/// user input is limited to the palette by `FromStr`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BehaviorColor {
    #[default]
    Indigo,
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
    Pink,
    Unlisted(String),
}

impl BehaviorColor {
    /// All palette entries in display order.
    pub const ALL: [BehaviorColor; 7] = [
        Self::Indigo,
        Self::Blue,
        Self::Green,
        Self::Yellow,
        Self::Red,
        Self::Purple,
        Self::Pink,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Indigo => "indigo",
            Self::Blue => "blue",
            Self::Green => "green",
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Unlisted(name) => name,
        }
    }

    fn palette_entry(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|color| color.as_str() == name)
    }
}

impl Display for BehaviorColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BehaviorColor {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::palette_entry(&value.trim().to_ascii_lowercase())
            .ok_or_else(|| ValidationError::UnknownColor(value.to_string()))
    }
}

impl From<String> for BehaviorColor {
    fn from(value: String) -> Self {
        Self::palette_entry(&value).unwrap_or(Self::Unlisted(value))
    }
}

impl From<BehaviorColor> for String {
    fn from(value: BehaviorColor) -> Self {
        match value {
            BehaviorColor::Unlisted(name) => name,
            listed => listed.as_str().to_string(),
        }
    }
}

/// Single checklist entry embedded in a behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementItem {
    pub id: ItemId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub created_at: i64,
}

impl ImprovementItem {
    /// Creates an incomplete item stamped with the current time.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: new_record_id(),
            text: text.into(),
            completed: false,
            created_at: now_epoch_ms(),
        }
    }
}

/// User-owned goal with its checklist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Behavior {
    pub id: BehaviorId,
    pub user_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub color: BehaviorColor,
    #[serde(default)]
    pub items: Vec<ImprovementItem>,
    #[serde(default)]
    pub created_at: i64,
}

impl Behavior {
    /// Creates an empty behavior owned by `user_id`.
    ///
    /// Title validation happens in the repository, not here.
    pub fn new(
        user_id: impl Into<UserId>,
        title: impl Into<String>,
        description: impl Into<String>,
        color: BehaviorColor,
    ) -> Self {
        Self {
            id: new_record_id(),
            user_id: user_id.into(),
            title: title.into(),
            description: description.into(),
            color,
            items: Vec::new(),
            created_at: now_epoch_ms(),
        }
    }

    pub fn item(&self, item_id: &str) -> Option<&ImprovementItem> {
        self.items.iter().find(|item| item.id == item_id)
    }

    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut ImprovementItem> {
        self.items.iter_mut().find(|item| item.id == item_id)
    }

    /// Completion summary over the embedded items.
    pub fn completion(&self) -> CompletionStats {
        let completed = self.items.iter().filter(|item| item.completed).count();
        CompletionStats::new(completed, self.items.len())
    }

    /// Description shortened for list cards.
    pub fn description_preview(&self) -> String {
        let mut chars = self.description.chars();
        let head: String = chars.by_ref().take(DESCRIPTION_PREVIEW_CHARS).collect();
        if chars.next().is_some() {
            format!("{head}...")
        } else {
            head
        }
    }
}

/// Completed/total counts with a whole-number percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionStats {
    pub completed: usize,
    pub total: usize,
    /// `round(completed / total * 100)`, half rounds up; `0` when empty.
    pub percentage: u32,
}

impl CompletionStats {
    pub fn new(completed: usize, total: usize) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            let scaled = (completed as u64 * 200 + total as u64) / (total as u64 * 2);
            u32::try_from(scaled).unwrap_or(u32::MAX)
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Returns items ordered for display: incomplete first, then newest first.
pub fn sort_items_for_display(items: &[ImprovementItem]) -> Vec<&ImprovementItem> {
    let mut sorted: Vec<&ImprovementItem> = items.iter().collect();
    sorted.sort_by(|a, b| {
        a.completed
            .cmp(&b.completed)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

/// Returns up to `limit` behaviors with the most items first.
///
/// Ties keep their storage order.
pub fn top_behaviors(behaviors: &[Behavior], limit: usize) -> Vec<&Behavior> {
    let mut sorted: Vec<&Behavior> = behaviors.iter().collect();
    sorted.sort_by(|a, b| b.items.len().cmp(&a.items.len()));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::{
        sort_items_for_display, top_behaviors, Behavior, BehaviorColor, CompletionStats,
        ImprovementItem,
    };
    use crate::model::validation::ValidationError;

    fn item(id: &str, completed: bool, created_at: i64) -> ImprovementItem {
        ImprovementItem {
            id: id.to_string(),
            text: format!("item {id}"),
            completed,
            created_at,
        }
    }

    fn behavior_with_items(id: &str, count: usize) -> Behavior {
        let mut behavior = Behavior::new("u1", format!("b{id}"), "", BehaviorColor::Blue);
        behavior.id = id.to_string();
        behavior.items = (0..count)
            .map(|n| item(&n.to_string(), false, n as i64))
            .collect();
        behavior
    }

    #[test]
    fn completion_rounds_half_up_and_handles_empty() {
        assert_eq!(CompletionStats::new(0, 0).percentage, 0);
        assert_eq!(CompletionStats::new(1, 3).percentage, 33);
        assert_eq!(CompletionStats::new(2, 3).percentage, 67);
        assert_eq!(CompletionStats::new(1, 8).percentage, 13);
        assert_eq!(CompletionStats::new(4, 4).percentage, 100);
    }

    #[test]
    fn behavior_completion_counts_completed_items() {
        let mut behavior = behavior_with_items("b", 4);
        behavior.items[0].completed = true;
        let stats = behavior.completion();
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.total, 4);
        assert_eq!(stats.percentage, 25);
    }

    #[test]
    fn description_preview_truncates_long_text() {
        let mut behavior = behavior_with_items("b", 0);
        behavior.description = "x".repeat(100);
        assert_eq!(behavior.description_preview(), "x".repeat(100));

        behavior.description = "é".repeat(101);
        assert_eq!(behavior.description_preview(), format!("{}...", "é".repeat(100)));
    }

    #[test]
    fn items_sort_incomplete_first_then_newest() {
        let items = vec![
            item("old-open", false, 1),
            item("done", true, 5),
            item("new-open", false, 3),
        ];
        let ids: Vec<&str> = sort_items_for_display(&items)
            .into_iter()
            .map(|item| item.id.as_str())
            .collect();
        assert_eq!(ids, vec!["new-open", "old-open", "done"]);
    }

    #[test]
    fn top_behaviors_orders_by_item_count_and_keeps_ties_stable() {
        let behaviors = vec![
            behavior_with_items("a", 1),
            behavior_with_items("b", 3),
            behavior_with_items("c", 1),
            behavior_with_items("d", 0),
        ];
        let ids: Vec<&str> = top_behaviors(&behaviors, 3)
            .into_iter()
            .map(|behavior| behavior.id.as_str())
            .collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn color_parses_case_insensitively_and_rejects_unknown() {
        assert_eq!("Green".parse::<BehaviorColor>(), Ok(BehaviorColor::Green));
        assert_eq!(
            "teal".parse::<BehaviorColor>(),
            Err(ValidationError::UnknownColor("teal".to_string()))
        );
        assert_eq!(BehaviorColor::default(), BehaviorColor::Indigo);
    }

    #[test]
    fn stored_unlisted_color_survives_round_trip() {
        let raw = r#"{"id":"1","userId":"u9","title":"Old","color":"teal","items":[{"id":"i","text":"t"}]}"#;
        let behavior: Behavior = serde_json::from_str(raw).unwrap();
        assert_eq!(behavior.color, BehaviorColor::Unlisted("teal".to_string()));
        assert_eq!(behavior.description, "");
        assert_eq!(behavior.created_at, 0);
        assert!(!behavior.items[0].completed);

        let json = serde_json::to_value(&behavior).unwrap();
        assert_eq!(json["color"], "teal");

        let listed: Behavior =
            serde_json::from_str(r#"{"id":"2","userId":"u9","title":"New","color":"red"}"#).unwrap();
        assert_eq!(listed.color, BehaviorColor::Red);
    }

    #[test]
    fn serialized_shape_uses_camel_case_keys() {
        let behavior = behavior_with_items("b1", 1);
        let json = serde_json::to_value(&behavior).unwrap();
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["color"], "blue");
        assert!(json["createdAt"].is_i64());
        assert_eq!(json["items"][0]["completed"], false);
        assert!(json["items"][0]["createdAt"].is_i64());
    }
}
