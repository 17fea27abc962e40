use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Marker set on a directional relation, stamped with the turn it was set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RelationFlag {
    /// The other party extorted tribute from the owner.
    Bullied,
    /// The owner has publicly denounced the other party.
    Denounced,
}

/// One direction of a diplomatic pair, owned by the faction the key's first
/// id names. Existence of the relation at all means the pair have met.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Relation {
    pub at_war: bool,
    /// Reputation the other party holds with the owner. The quest reward
    /// currency when the owner is a minor faction.
    pub standing: f64,
    /// Flag -> turn the flag was last stamped.
    pub flags: BTreeMap<RelationFlag, u32>,
}

impl Relation {
    pub fn has_flag(&self, flag: RelationFlag) -> bool {
        self.flags.contains_key(&flag)
    }

    pub fn flag_turn(&self, flag: RelationFlag) -> Option<u32> {
        self.flags.get(&flag).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_round_trip_as_json_map_keys() {
        let mut rel = Relation::default();
        rel.flags.insert(RelationFlag::Bullied, 12);
        rel.flags.insert(RelationFlag::Denounced, 30);
        let json = serde_json::to_string(&rel).unwrap();
        assert!(json.contains("bullied"));
        let back: Relation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.flag_turn(RelationFlag::Bullied), Some(12));
        assert_eq!(back.flag_turn(RelationFlag::Denounced), Some(30));
    }
}
