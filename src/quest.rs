//! Live quest instances: the typed per-kind goal data and the
//! [`AssignedQuest`] record held in the ledger.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, QuestKind};
use crate::model::{FactionId, TilePos, World};

/// What a quest instance is actually about. Each variant carries only the
/// auxiliary data its kind needs, so no kind can misread another's payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestGoal {
    /// Destroy the hostile camp at `pos`.
    ClearCamp { pos: TilePos },
    /// Connect the assignee's capital to the assigner's by road.
    BuildRoute,
    /// Hook `resource` into the assignee's trade network.
    ConnectResource { resource: String },
    /// Be the first faction to finish `wonder`.
    ConstructWonder { wonder: String },
    /// Lay eyes on `target`'s territory.
    FindFaction { target: FactionId },
    /// Discover `wonder`.
    FindNaturalWonder { wonder: String },
    /// Gift gold to the assigner, who was recently bullied by `bully`.
    GiveGold { bully: FactionId },
    /// Pledge to protect the assigner against `bully`.
    PledgeProtection { bully: FactionId },
    /// Publicly denounce `target`.
    Denounce { target: FactionId },
    /// Conquer the city-state `target`.
    ConquerCityState { target: FactionId },
    /// Extort tribute from the city-state `target`.
    BullyCityState { target: FactionId },
    /// Gain the most culture; `baseline` is the assignee's total at assignment.
    ContestCulture { baseline: u32 },
    /// Gain the most faith.
    ContestFaith { baseline: u32 },
    /// Research the most technologies.
    ContestTech { baseline: u32 },
}

impl QuestGoal {
    pub fn kind(&self) -> QuestKind {
        match self {
            QuestGoal::ClearCamp { .. } => QuestKind::ClearCamp,
            QuestGoal::BuildRoute => QuestKind::BuildRoute,
            QuestGoal::ConnectResource { .. } => QuestKind::ConnectResource,
            QuestGoal::ConstructWonder { .. } => QuestKind::ConstructWonder,
            QuestGoal::FindFaction { .. } => QuestKind::FindFaction,
            QuestGoal::FindNaturalWonder { .. } => QuestKind::FindNaturalWonder,
            QuestGoal::GiveGold { .. } => QuestKind::GiveGold,
            QuestGoal::PledgeProtection { .. } => QuestKind::PledgeProtection,
            QuestGoal::Denounce { .. } => QuestKind::Denounce,
            QuestGoal::ConquerCityState { .. } => QuestKind::ConquerCityState,
            QuestGoal::BullyCityState { .. } => QuestKind::BullyCityState,
            QuestGoal::ContestCulture { .. } => QuestKind::ContestCulture,
            QuestGoal::ContestFaith { .. } => QuestKind::ContestFaith,
            QuestGoal::ContestTech { .. } => QuestKind::ContestTech,
        }
    }

    /// One-line description for quest lists and notifications.
    pub fn describe(&self, world: &World) -> String {
        match self {
            QuestGoal::ClearCamp { pos } => {
                format!("Destroy the hostile camp at ({}, {})", pos.x, pos.y)
            }
            QuestGoal::BuildRoute => "Connect our capitals by road".to_string(),
            QuestGoal::ConnectResource { resource } => {
                format!("Connect {resource} to your trade network")
            }
            QuestGoal::ConstructWonder { wonder } => format!("Construct {wonder}"),
            QuestGoal::FindFaction { target } => {
                format!("Find the territory of {}", world.faction_name(*target))
            }
            QuestGoal::FindNaturalWonder { wonder } => format!("Find {wonder}"),
            QuestGoal::GiveGold { bully } => {
                format!("Gift us gold to recover from {}", world.faction_name(*bully))
            }
            QuestGoal::PledgeProtection { bully } => {
                format!("Pledge to protect us from {}", world.faction_name(*bully))
            }
            QuestGoal::Denounce { target } => {
                format!("Denounce {}", world.faction_name(*target))
            }
            QuestGoal::ConquerCityState { target } => {
                format!("Conquer {}", world.faction_name(*target))
            }
            QuestGoal::BullyCityState { target } => {
                format!("Demand tribute from {}", world.faction_name(*target))
            }
            QuestGoal::ContestCulture { .. } => "Gain the most culture".to_string(),
            QuestGoal::ContestFaith { .. } => "Gain the most faith".to_string(),
            QuestGoal::ContestTech { .. } => "Research the most technologies".to_string(),
        }
    }
}

/// One live quest instance held against a specific assignee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedQuest {
    pub goal: QuestGoal,
    pub assigner: FactionId,
    pub assignee: FactionId,
    pub assigned_on: u32,
}

impl AssignedQuest {
    pub fn kind(&self) -> QuestKind {
        self.goal.kind()
    }

    pub fn is_global(&self, catalog: &Catalog) -> bool {
        catalog.get(self.kind()).is_some_and(|d| d.is_global())
    }

    pub fn is_individual(&self, catalog: &Catalog) -> bool {
        !self.is_global(catalog)
    }

    /// Duration after game-speed scaling; 0 = never expires.
    pub fn duration(&self, catalog: &Catalog, world: &World) -> u32 {
        catalog
            .get(self.kind())
            .map_or(0, |d| world.scaled(d.duration))
    }

    pub fn remaining_turns(&self, catalog: &Catalog, world: &World) -> u32 {
        let duration = self.duration(catalog, world);
        if duration == 0 {
            return u32::MAX;
        }
        (self.assigned_on + duration).saturating_sub(world.turn)
    }

    pub fn is_expired(&self, catalog: &Catalog, world: &World) -> bool {
        self.duration(catalog, world) > 0 && self.remaining_turns(catalog, world) == 0
    }

    pub fn reward(&self, catalog: &Catalog) -> f64 {
        catalog.get(self.kind()).map_or(0.0, |d| d.reward)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn quest(goal: QuestGoal, assigned_on: u32) -> AssignedQuest {
        AssignedQuest {
            goal,
            assigner: FactionId(1),
            assignee: FactionId(2),
            assigned_on,
        }
    }

    #[test]
    fn goal_kind_matches_variant() {
        let goal = QuestGoal::ConnectResource {
            resource: "Silk".to_string(),
        };
        assert_eq!(goal.kind(), QuestKind::ConnectResource);
        assert_eq!(QuestGoal::BuildRoute.kind(), QuestKind::BuildRoute);
    }

    #[test]
    fn zero_duration_never_expires() {
        let catalog = Catalog::standard();
        let mut world = World::new();
        world.turn = 10_000;
        let q = quest(QuestGoal::BuildRoute, 0);
        assert!(!q.is_expired(&catalog, &world));
        assert_eq!(q.remaining_turns(&catalog, &world), u32::MAX);
    }

    #[test]
    fn expiry_scales_with_game_speed() {
        let catalog = Catalog::standard();
        let mut world = World::new();
        world.speed_modifier = 2.0;
        // ClearCamp: 30 base turns -> 60 scaled
        let q = quest(
            QuestGoal::ClearCamp {
                pos: TilePos::new(0, 0),
            },
            100,
        );
        world.turn = 159;
        assert!(!q.is_expired(&catalog, &world));
        world.turn = 160;
        assert!(q.is_expired(&catalog, &world));
    }

    #[test]
    fn serialized_goal_is_tagged_by_type() {
        let q = quest(
            QuestGoal::ConstructWonder {
                wonder: "Colossus".to_string(),
            },
            5,
        );
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains(r#""type":"construct_wonder""#));
        let back: AssignedQuest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
    }
}
