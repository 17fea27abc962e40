//! The quest catalog: the closed set of quest kinds plus the per-kind
//! tuning knobs (scope, duration, reward, selection weights).
//!
//! The engine treats the catalog as read-only content. `Catalog::standard()`
//! carries the built-in tuning; a modded catalog can be loaded from JSON.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every quest kind the engine knows how to run. Closed by design: each
/// variant has exhaustive eligibility/completion/obsolescence handling.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum QuestKind {
    ClearCamp,
    BuildRoute,
    ConnectResource,
    ConstructWonder,
    FindFaction,
    FindNaturalWonder,
    GiveGold,
    PledgeProtection,
    Denounce,
    ConquerCityState,
    BullyCityState,
    ContestCulture,
    ContestFaith,
    ContestTech,
}

impl QuestKind {
    pub const ALL: [QuestKind; 14] = [
        QuestKind::ClearCamp,
        QuestKind::BuildRoute,
        QuestKind::ConnectResource,
        QuestKind::ConstructWonder,
        QuestKind::FindFaction,
        QuestKind::FindNaturalWonder,
        QuestKind::GiveGold,
        QuestKind::PledgeProtection,
        QuestKind::Denounce,
        QuestKind::ConquerCityState,
        QuestKind::BullyCityState,
        QuestKind::ContestCulture,
        QuestKind::ContestFaith,
        QuestKind::ContestTech,
    ];

    /// Human-readable name used in notification text.
    pub fn display_name(self) -> &'static str {
        match self {
            QuestKind::ClearCamp => "Clear Hostile Camp",
            QuestKind::BuildRoute => "Build a Road",
            QuestKind::ConnectResource => "Connect a Resource",
            QuestKind::ConstructWonder => "Construct a Wonder",
            QuestKind::FindFaction => "Find a Faction",
            QuestKind::FindNaturalWonder => "Find a Natural Wonder",
            QuestKind::GiveGold => "Give Gold",
            QuestKind::PledgeProtection => "Pledge Protection",
            QuestKind::Denounce => "Denounce Our Enemy",
            QuestKind::ConquerCityState => "Conquer a City-State",
            QuestKind::BullyCityState => "Bully a City-State",
            QuestKind::ContestCulture => "Contest of Culture",
            QuestKind::ContestFaith => "Contest of Faith",
            QuestKind::ContestTech => "Contest of Technology",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    /// Offered to every eligible major at once, resolved as a competition.
    Global,
    /// Offered to exactly one major.
    Individual,
}

fn default_min_partners() -> u32 {
    1
}

/// Tuning for one quest kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestDefinition {
    pub scope: Scope,
    /// Minimum number of eligible counterparts required to launch.
    /// Only consulted for global quests.
    #[serde(default = "default_min_partners")]
    pub min_partners: u32,
    /// Duration in turns before game-speed scaling. `0` = never expires.
    #[serde(default)]
    pub duration: u32,
    /// Standing granted to each winner.
    pub reward: f64,
    /// Selection-weight multipliers keyed by the assigner's personality and
    /// archetype names. Missing key = factor 1.
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,
}

impl QuestDefinition {
    pub fn is_global(&self) -> bool {
        self.scope == Scope::Global
    }

    pub fn is_individual(&self) -> bool {
        self.scope == Scope::Individual
    }

    pub fn expires(&self) -> bool {
        self.duration > 0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub quests: BTreeMap<QuestKind, QuestDefinition>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            quests: BTreeMap::new(),
        }
    }

    pub fn get(&self, kind: QuestKind) -> Option<&QuestDefinition> {
        self.quests.get(&kind)
    }

    pub fn of_scope(&self, scope: Scope) -> impl Iterator<Item = (QuestKind, &QuestDefinition)> {
        self.quests
            .iter()
            .filter(move |(_, d)| d.scope == scope)
            .map(|(k, d)| (*k, d))
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Built-in tuning, loosely following the classic city-state quest
    /// values the engine was balanced against.
    pub fn standard() -> Self {
        fn def(scope: Scope, reward: f64) -> QuestDefinition {
            QuestDefinition {
                scope,
                min_partners: 1,
                duration: 0,
                reward,
                weights: BTreeMap::new(),
            }
        }
        fn weights(pairs: &[(&str, f64)]) -> BTreeMap<String, f64> {
            pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
        }

        let mut quests = BTreeMap::new();

        quests.insert(QuestKind::ClearCamp, QuestDefinition {
            duration: 30,
            weights: weights(&[("militaristic", 3.0), ("hostile", 2.0)]),
            ..def(Scope::Global, 50.0)
        });
        quests.insert(QuestKind::BuildRoute, QuestDefinition {
            weights: weights(&[("maritime", 0.5), ("mercantile", 2.0)]),
            ..def(Scope::Individual, 50.0)
        });
        quests.insert(QuestKind::ConnectResource, QuestDefinition {
            weights: weights(&[("mercantile", 2.0), ("maritime", 2.0)]),
            ..def(Scope::Individual, 40.0)
        });
        quests.insert(QuestKind::ConstructWonder, QuestDefinition {
            weights: weights(&[("cultured", 3.0)]),
            ..def(Scope::Individual, 40.0)
        });
        quests.insert(QuestKind::FindFaction, def(Scope::Individual, 35.0));
        quests.insert(QuestKind::FindNaturalWonder, QuestDefinition {
            weights: weights(&[("maritime", 1.5), ("irrational", 1.5)]),
            ..def(Scope::Individual, 40.0)
        });
        quests.insert(QuestKind::GiveGold, QuestDefinition {
            weights: weights(&[("mercantile", 2.0), ("hostile", 2.0)]),
            ..def(Scope::Individual, 20.0)
        });
        quests.insert(QuestKind::PledgeProtection, QuestDefinition {
            weights: weights(&[("friendly", 2.0)]),
            ..def(Scope::Individual, 20.0)
        });
        quests.insert(QuestKind::Denounce, QuestDefinition {
            weights: weights(&[("hostile", 2.0)]),
            ..def(Scope::Individual, 30.0)
        });
        quests.insert(QuestKind::ConquerCityState, QuestDefinition {
            weights: weights(&[("militaristic", 2.0), ("hostile", 2.0), ("neutral", 0.5)]),
            ..def(Scope::Individual, 60.0)
        });
        quests.insert(QuestKind::BullyCityState, QuestDefinition {
            weights: weights(&[("hostile", 2.0), ("irrational", 1.5)]),
            ..def(Scope::Individual, 40.0)
        });
        quests.insert(QuestKind::ContestCulture, QuestDefinition {
            duration: 45,
            min_partners: 3,
            weights: weights(&[("cultured", 2.0)]),
            ..def(Scope::Global, 40.0)
        });
        quests.insert(QuestKind::ContestFaith, QuestDefinition {
            duration: 45,
            min_partners: 3,
            weights: weights(&[("religious", 2.0)]),
            ..def(Scope::Global, 40.0)
        });
        quests.insert(QuestKind::ContestTech, QuestDefinition {
            duration: 45,
            min_partners: 3,
            ..def(Scope::Global, 40.0)
        });

        Self { quests }
    }
}
