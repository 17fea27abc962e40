use serde::{Deserialize, Serialize};

use super::faction::FactionId;
use super::map::TilePos;

/// Icon shown next to quest-related notifications.
pub const ICON_QUEST: &str = "quest";
/// Icon shown next to war-related notifications.
pub const ICON_WAR: &str = "war";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Diplomacy,
    War,
}

/// What the UI should do when the player clicks a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NotificationAction {
    OpenDiplomacy { faction: FactionId },
    ShowTile { pos: TilePos },
}

/// Fire-and-forget message to a faction's player. The engine only ever
/// pushes these; delivery and rendering are someone else's problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub location: Option<TilePos>,
    pub category: NotificationCategory,
    pub icon: String,
    pub actions: Vec<NotificationAction>,
}

impl Notification {
    /// Diplomacy-category notification with an open-diplomacy action
    /// pointing at `sender` — the shape nearly every quest message takes.
    pub fn diplomacy(text: impl Into<String>, sender: FactionId) -> Self {
        Self {
            text: text.into(),
            location: None,
            category: NotificationCategory::Diplomacy,
            icon: ICON_QUEST.to_string(),
            actions: vec![NotificationAction::OpenDiplomacy { faction: sender }],
        }
    }

    pub fn at(mut self, location: Option<TilePos>) -> Self {
        self.location = location;
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = icon.to_string();
        self
    }

    /// Prepend a show-tile action so the click lands on the target first.
    pub fn targeting(mut self, pos: TilePos) -> Self {
        self.actions.insert(0, NotificationAction::ShowTile { pos });
        self
    }
}
