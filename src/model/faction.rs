use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::map::TilePos;
use super::notification::Notification;

/// Stable identifier for a faction. Assigned by whoever builds the [`World`];
/// never reused within one game.
///
/// [`World`]: super::World
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FactionId(pub u32);

impl fmt::Display for FactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "faction#{}", self.0)
    }
}

/// Whether a faction is a full (major) polity or a minor one.
/// Only minors dispatch quests; only majors may receive them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Major,
    Minor,
}

/// Diplomatic disposition of a minor faction. Keys one axis of the
/// quest-weight table and gates hostile quest kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Personality {
    Friendly,
    Neutral,
    Hostile,
    Irrational,
}

impl Personality {
    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Friendly => "friendly",
            Personality::Neutral => "neutral",
            Personality::Hostile => "hostile",
            Personality::Irrational => "irrational",
        }
    }
}

/// Structural archetype of a minor faction; the other axis of the
/// quest-weight table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    Cultured,
    Maritime,
    Mercantile,
    Militaristic,
    Religious,
}

impl Archetype {
    pub fn as_str(self) -> &'static str {
        match self {
            Archetype::Cultured => "cultured",
            Archetype::Maritime => "maritime",
            Archetype::Mercantile => "mercantile",
            Archetype::Militaristic => "militaristic",
            Archetype::Religious => "religious",
        }
    }
}

/// One polity and the slice of its world state the quest engine reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faction {
    pub id: FactionId,
    pub name: String,
    pub rank: Rank,
    pub alive: bool,
    pub personality: Personality,
    pub archetype: Archetype,

    /// Capital tile, if the faction has founded one. A minor without a
    /// capital dispatches no quests.
    pub capital: Option<TilePos>,
    pub continent: u8,

    pub military_units: u32,
    pub culture_total: u32,
    pub faith_total: u32,
    pub techs_researched: u32,

    /// Wonders this faction has unlocked the prerequisites for.
    pub unlocked_wonders: BTreeSet<String>,
    /// Resources currently hooked into this faction's trade network.
    pub owned_resources: BTreeSet<String>,
    /// Resource types this faction can see on the map.
    pub revealed_resources: BTreeSet<String>,
    pub found_natural_wonders: BTreeSet<String>,
    /// Factions whose territory this faction has laid eyes on.
    pub seen_territory_of: BTreeSet<FactionId>,
    /// Factions whose capital is road-connected to this faction's capital.
    pub connected_capitals: BTreeSet<FactionId>,
    /// Majors pledged to protect this faction (meaningful for minors).
    pub protectors: BTreeSet<FactionId>,

    /// Set when standing with this faction changed and derived stats
    /// (friend/ally bonuses) need a refresh. Cleared by the outer layer.
    #[serde(default)]
    pub stats_stale: bool,

    /// Pending notifications for this faction's player. Drained by the UI;
    /// not part of the saved state.
    #[serde(skip)]
    pub inbox: Vec<Notification>,
}

impl Faction {
    pub fn new(id: FactionId, name: impl Into<String>, rank: Rank) -> Self {
        Self {
            id,
            name: name.into(),
            rank,
            alive: true,
            personality: Personality::Neutral,
            archetype: Archetype::Mercantile,
            capital: None,
            continent: 0,
            military_units: 0,
            culture_total: 0,
            faith_total: 0,
            techs_researched: 0,
            unlocked_wonders: BTreeSet::new(),
            owned_resources: BTreeSet::new(),
            revealed_resources: BTreeSet::new(),
            found_natural_wonders: BTreeSet::new(),
            seen_territory_of: BTreeSet::new(),
            connected_capitals: BTreeSet::new(),
            protectors: BTreeSet::new(),
            stats_stale: false,
            inbox: Vec::new(),
        }
    }

    pub fn is_major(&self) -> bool {
        self.rank == Rank::Major
    }

    pub fn is_minor(&self) -> bool {
        self.rank == Rank::Minor
    }
}
