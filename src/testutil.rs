//! Scenario builder for tests: assembles small worlds with a quest-giving
//! minor, some majors, mutual contact and a seeded random source, then
//! drives engine turns against them.

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::catalog::Catalog;
use crate::engine::{QuestEngine, TurnContext};
use crate::model::{Faction, FactionId, Rank, TilePos, World};

pub struct Scenario {
    pub world: World,
    pub catalog: Catalog,
    pub rng: SmallRng,
    next_id: u32,
    next_x: i32,
}

impl Scenario {
    pub fn new(seed: u64) -> Self {
        Self::with_catalog(seed, Catalog::standard())
    }

    pub fn with_catalog(seed: u64, catalog: Catalog) -> Self {
        Self {
            world: World::new(),
            catalog,
            rng: SmallRng::seed_from_u64(seed),
            next_id: 1,
            next_x: 0,
        }
    }

    fn add_faction(&mut self, name: &str, rank: Rank) -> FactionId {
        let id = FactionId(self.next_id);
        self.next_id += 1;
        let mut faction = Faction::new(id, name, rank);
        // Capitals in a row, 2 tiles apart: close enough for road and camp
        // quests unless a test moves them.
        faction.capital = Some(TilePos::new(self.next_x, 0));
        self.next_x += 2;
        self.world.factions.insert(id, faction);
        id
    }

    /// Add a quest-dispatching minor faction with its engine.
    pub fn minor(&mut self, name: &str) -> (FactionId, QuestEngine) {
        let id = self.add_faction(name, Rank::Minor);
        (id, QuestEngine::new(id))
    }

    /// Add a minor faction without an engine (a quest target).
    pub fn city_state(&mut self, name: &str) -> FactionId {
        self.add_faction(name, Rank::Minor)
    }

    pub fn major(&mut self, name: &str) -> FactionId {
        self.add_faction(name, Rank::Major)
    }

    /// Mutual contact between every pair of factions.
    pub fn meet_everyone(&mut self) {
        let ids: Vec<FactionId> = self.world.factions.keys().copied().collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                self.world.make_contact(*a, *b);
            }
        }
    }

    pub fn faction_mut(&mut self, id: FactionId) -> &mut Faction {
        self.world.faction_mut(id).expect("faction exists")
    }

    pub fn ctx(&mut self) -> TurnContext<'_> {
        TurnContext {
            world: &mut self.world,
            catalog: &self.catalog,
            rng: &mut self.rng,
        }
    }

    /// Advance one turn and run the engine's turn-end hook.
    pub fn end_turn(&mut self, engine: &mut QuestEngine) {
        self.world.turn += 1;
        engine.on_turn_end(&mut self.ctx());
    }

    /// Run turns until `world.turn == turn` inclusive.
    pub fn run_until(&mut self, engine: &mut QuestEngine, turn: u32) {
        while self.world.turn < turn {
            self.end_turn(engine);
        }
    }

    /// Drain and return a faction's pending notifications.
    pub fn take_inbox(&mut self, id: FactionId) -> Vec<crate::model::Notification> {
        std::mem::take(&mut self.faction_mut(id).inbox)
    }
}
