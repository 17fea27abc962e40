pub mod catalog;
pub mod engine;
pub mod model;
pub mod quest;
pub mod testutil;

pub use catalog::{Catalog, QuestDefinition, QuestKind, Scope};
pub use engine::{Countdown, QuestEngine, Scheduler, TurnContext};
pub use model::{Faction, FactionId, Notification, World};
pub use quest::{AssignedQuest, QuestGoal};
