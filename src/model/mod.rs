pub mod faction;
pub mod map;
pub mod notification;
pub mod relation;
pub mod world;

pub use faction::{Archetype, Faction, FactionId, Personality, Rank};
pub use map::{ResourceKind, TilePos, Wonder};
pub use notification::{Notification, NotificationAction, NotificationCategory};
pub use relation::{Relation, RelationFlag};
pub use world::World;
