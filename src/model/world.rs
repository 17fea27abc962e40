use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::faction::{Faction, FactionId};
use super::map::{ResourceKind, TilePos, Wonder};
use super::notification::Notification;
use super::relation::{Relation, RelationFlag};

/// Shared game state the quest engine reads and (narrowly) writes.
///
/// Every query here is total: a missing faction or relation answers as
/// "dead", "unknown" or "not at war" rather than failing. The engine treats
/// missing data as ineligibility, never as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub factions: BTreeMap<FactionId, Faction>,
    /// Directional relations keyed `(owner, other)`. A key that exists means
    /// `owner` has met `other`.
    pub relations: BTreeMap<(FactionId, FactionId), Relation>,

    /// Tiles currently holding a hostile camp.
    pub camps: BTreeSet<TilePos>,
    /// Distinct resource types present on the map.
    pub map_resources: BTreeMap<String, ResourceKind>,
    pub natural_wonders: BTreeSet<String>,
    pub wonders: BTreeMap<String, Wonder>,

    pub turn: u32,
    /// Game-speed multiplier applied to quest durations and countdowns.
    pub speed_modifier: f64,
    pub religion_enabled: bool,
}

impl World {
    pub fn new() -> Self {
        Self {
            factions: BTreeMap::new(),
            relations: BTreeMap::new(),
            camps: BTreeSet::new(),
            map_resources: BTreeMap::new(),
            natural_wonders: BTreeSet::new(),
            wonders: BTreeMap::new(),
            turn: 0,
            speed_modifier: 1.0,
            religion_enabled: true,
        }
    }

    pub fn faction(&self, id: FactionId) -> Option<&Faction> {
        self.factions.get(&id)
    }

    pub fn faction_mut(&mut self, id: FactionId) -> Option<&mut Faction> {
        self.factions.get_mut(&id)
    }

    pub fn faction_name(&self, id: FactionId) -> String {
        self.faction(id)
            .map(|f| f.name.clone())
            .unwrap_or_else(|| id.to_string())
    }

    pub fn is_alive(&self, id: FactionId) -> bool {
        self.faction(id).is_some_and(|f| f.alive)
    }

    pub fn is_defeated(&self, id: FactionId) -> bool {
        !self.is_alive(id)
    }

    pub fn alive_majors(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values().filter(|f| f.alive && f.is_major())
    }

    pub fn alive_minors(&self) -> impl Iterator<Item = &Faction> {
        self.factions.values().filter(|f| f.alive && f.is_minor())
    }

    // --- Diplomacy ---

    pub fn relation(&self, owner: FactionId, other: FactionId) -> Option<&Relation> {
        self.relations.get(&(owner, other))
    }

    pub fn knows(&self, owner: FactionId, other: FactionId) -> bool {
        owner != other && self.relations.contains_key(&(owner, other))
    }

    /// Factions `owner` has met, in id order.
    pub fn known_by(&self, owner: FactionId) -> Vec<FactionId> {
        self.relations
            .keys()
            .filter(|(a, b)| *a == owner && *b != owner)
            .map(|(_, b)| *b)
            .collect()
    }

    pub fn at_war(&self, a: FactionId, b: FactionId) -> bool {
        self.relation(a, b).is_some_and(|r| r.at_war)
            || self.relation(b, a).is_some_and(|r| r.at_war)
    }

    /// Establish mutual contact; idempotent.
    pub fn make_contact(&mut self, a: FactionId, b: FactionId) {
        if a == b {
            return;
        }
        self.relations.entry((a, b)).or_default();
        self.relations.entry((b, a)).or_default();
    }

    pub fn declare_war(&mut self, a: FactionId, b: FactionId) {
        self.make_contact(a, b);
        if let Some(r) = self.relations.get_mut(&(a, b)) {
            r.at_war = true;
        }
        if let Some(r) = self.relations.get_mut(&(b, a)) {
            r.at_war = true;
        }
    }

    pub fn end_war(&mut self, a: FactionId, b: FactionId) {
        if let Some(r) = self.relations.get_mut(&(a, b)) {
            r.at_war = false;
        }
        if let Some(r) = self.relations.get_mut(&(b, a)) {
            r.at_war = false;
        }
    }

    /// Add to the standing `other` holds with `owner`. Marks `owner`'s
    /// derived stats stale so friend/ally bonuses get recomputed.
    pub fn add_standing(&mut self, owner: FactionId, other: FactionId, amount: f64) {
        self.make_contact(owner, other);
        if let Some(r) = self.relations.get_mut(&(owner, other)) {
            r.standing += amount;
        }
        if let Some(f) = self.faction_mut(owner) {
            f.stats_stale = true;
        }
    }

    pub fn standing(&self, owner: FactionId, other: FactionId) -> f64 {
        self.relation(owner, other).map_or(0.0, |r| r.standing)
    }

    /// Stamp `flag` on the `(owner, other)` relation with the current turn.
    pub fn set_flag(&mut self, owner: FactionId, other: FactionId, flag: RelationFlag) {
        let turn = self.turn;
        self.make_contact(owner, other);
        if let Some(r) = self.relations.get_mut(&(owner, other)) {
            r.flags.insert(flag, turn);
        }
    }

    pub fn clear_flag(&mut self, owner: FactionId, other: FactionId, flag: RelationFlag) {
        if let Some(r) = self.relations.get_mut(&(owner, other)) {
            r.flags.remove(&flag);
        }
    }

    pub fn has_flag(&self, owner: FactionId, other: FactionId, flag: RelationFlag) -> bool {
        self.relation(owner, other).is_some_and(|r| r.has_flag(flag))
    }

    pub fn flag_turn(
        &self,
        owner: FactionId,
        other: FactionId,
        flag: RelationFlag,
    ) -> Option<u32> {
        self.relation(owner, other).and_then(|r| r.flag_turn(flag))
    }

    // --- Map facts ---

    pub fn wonder_built_by(&self, name: &str) -> Option<FactionId> {
        self.wonders.get(name).and_then(|w| w.built_by)
    }

    pub fn capitals_connected(&self, a: FactionId, b: FactionId) -> bool {
        self.faction(a).is_some_and(|f| f.connected_capitals.contains(&b))
    }

    // --- Misc ---

    /// Scale a turn count by the game-speed modifier, truncating.
    pub fn scaled(&self, turns: u32) -> u32 {
        (turns as f64 * self.speed_modifier) as u32
    }

    /// Push a notification to `target`'s inbox. No-op for unknown factions.
    pub fn notify(&mut self, target: FactionId, notification: Notification) {
        if let Some(f) = self.faction_mut(target) {
            f.inbox.push(notification);
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
