//! The quest engine proper: one [`QuestEngine`] per quest-dispatching minor
//! faction, exclusively owning that faction's ledger, countdowns and
//! war-assistance state. All mutation funnels through [`on_turn_end`] and
//! the event hooks.
//!
//! [`on_turn_end`]: QuestEngine::on_turn_end

pub mod context;
pub mod eligibility;
pub mod lifecycle;
pub mod rewards;
pub mod scheduler;
pub mod selector;
pub mod war_aid;

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, QuestKind};
use crate::model::{FactionId, Notification, RelationFlag, TilePos};
use crate::quest::{AssignedQuest, QuestGoal};

pub use context::TurnContext;
pub use scheduler::{Countdown, Scheduler};

/// Per-minor-faction quest state. Serializable as opaque structured data;
/// the outer save system decides where it lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestEngine {
    /// The minor faction dispatching quests.
    pub faction: FactionId,
    /// Active assigned quests, in assignment order.
    pub ledger: Vec<AssignedQuest>,
    pub scheduler: Scheduler,
    /// Aggressor -> kills required to earn the war-assistance bonus.
    pub kill_quotas: BTreeMap<FactionId, u32>,
    /// Aggressor -> (helper -> kills credited so far).
    pub kills: BTreeMap<FactionId, BTreeMap<FactionId, u32>>,
}

impl QuestEngine {
    pub fn new(faction: FactionId) -> Self {
        Self {
            faction,
            ledger: Vec::new(),
            scheduler: Scheduler::new(),
            kill_quotas: BTreeMap::new(),
            kills: BTreeMap::new(),
        }
    }

    /// The single turn-loop entry point. Runs the full sequence: countdown
    /// tick, lifecycle sweeps, new-assignment attempts, war-assistance
    /// teardown.
    pub fn on_turn_end(&mut self, ctx: &mut TurnContext<'_>) {
        if ctx.world.is_defeated(self.faction) {
            self.ledger.clear();
            self.scheduler.clear();
            self.kill_quotas.clear();
            self.kills.clear();
            return;
        }
        // No quests until the faction has somewhere to dispatch them from.
        if ctx.world.faction(self.faction).and_then(|f| f.capital).is_none() {
            return;
        }

        self.scheduler.tick(ctx.world, ctx.rng);

        self.sweep_global_quests(ctx);
        self.sweep_individual_quests(ctx);

        self.try_start_global_quest(ctx);
        self.try_start_individual_quests(ctx);

        self.sweep_war_assistance(ctx);
    }

    // --- Ledger lookups ---

    pub fn quests_for(&self, assignee: FactionId) -> impl Iterator<Item = &AssignedQuest> {
        self.ledger.iter().filter(move |q| q.assignee == assignee)
    }

    pub fn has_quests_for(&self, assignee: FactionId) -> bool {
        self.quests_for(assignee).next().is_some()
    }

    /// Whether this faction has asked anyone to conquer `target`.
    pub fn wants_conquest_of(&self, target: FactionId) -> bool {
        self.ledger
            .iter()
            .any(|q| q.goal == QuestGoal::ConquerCityState { target })
    }

    pub(crate) fn has_active(&self, kind: QuestKind, assignee: FactionId) -> bool {
        self.ledger
            .iter()
            .any(|q| q.kind() == kind && q.assignee == assignee)
    }

    pub(crate) fn individual_count(&self, catalog: &Catalog, assignee: FactionId) -> usize {
        self.ledger
            .iter()
            .filter(|q| q.assignee == assignee && q.is_individual(catalog))
            .count()
    }

    /// Number of distinct active global series (kind + assignment turn).
    pub(crate) fn active_global_series(&self, catalog: &Catalog) -> usize {
        self.ledger
            .iter()
            .filter(|q| q.is_global(catalog))
            .map(|q| (q.kind(), q.assigned_on))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Leader text for a contest quest, or `None` for non-contest quests
    /// and contests nobody is leading yet.
    pub fn contest_status(
        &self,
        ctx: &TurnContext<'_>,
        quest: &AssignedQuest,
    ) -> Option<String> {
        let descriptor = match quest.goal {
            QuestGoal::ContestCulture { .. } => "Culture",
            QuestGoal::ContestFaith { .. } => "Faith",
            QuestGoal::ContestTech { .. } => "Technologies",
            _ => return None,
        };
        let group: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| q.kind() == quest.kind() && q.assigned_on == quest.assigned_on)
            .cloned()
            .collect();
        let standings = lifecycle::Standings::evaluate(ctx.world, &group);
        if standings.winners.is_empty() {
            return None;
        }

        let leaders: Vec<String> = standings
            .winner_ids()
            .iter()
            .map(|id| ctx.world.faction_name(*id))
            .collect();
        let lead = format!(
            "{} with {} {}",
            leaders.join(", "),
            standings.max_score,
            descriptor
        );
        if standings.winner_ids().contains(&quest.assignee) {
            Some(format!("Current leaders: {lead}"))
        } else {
            Some(format!(
                "Current leaders: {lead}, you: {} {}",
                lifecycle::score(ctx.world, quest),
                descriptor
            ))
        }
    }

    // --- Event hooks (off-turn resolution) ---

    /// Hook: the camp at `pos` was destroyed by `by`. Rewards the matching
    /// instance held by the destroyer; all other instances for that camp
    /// are dropped without notification (the camp is simply gone).
    pub fn on_camp_cleared(&mut self, ctx: &mut TurnContext<'_>, by: FactionId, pos: TilePos) {
        let matching: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| q.goal == QuestGoal::ClearCamp { pos })
            .cloned()
            .collect();

        if let Some(winner) = matching.iter().find(|q| q.assignee == by).cloned() {
            self.give_reward(ctx, &winner);
        }
        self.remove_quests(&matching);
    }

    /// Hook: city-state `city_state` was conquered by `attacker`.
    pub fn on_city_state_conquered(
        &mut self,
        ctx: &mut TurnContext<'_>,
        city_state: FactionId,
        attacker: FactionId,
    ) {
        let matching: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| {
                q.assignee == attacker && q.goal == QuestGoal::ConquerCityState { target: city_state }
            })
            .cloned()
            .collect();
        for quest in &matching {
            self.give_reward(ctx, quest);
        }
        self.remove_quests(&matching);
    }

    /// Hook: city-state `city_state` was bullied by `bully`. Rewards any
    /// matching tribute quests; when the bullied party is this engine's own
    /// faction, the insult is remembered and every individual quest the
    /// bully held is revoked.
    pub fn on_city_state_bullied(
        &mut self,
        ctx: &mut TurnContext<'_>,
        city_state: FactionId,
        bully: FactionId,
    ) {
        let matching: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| {
                q.assignee == bully && q.goal == QuestGoal::BullyCityState { target: city_state }
            })
            .cloned()
            .collect();
        for quest in &matching {
            self.give_reward(ctx, quest);
        }
        self.remove_quests(&matching);

        if city_state != self.faction {
            return;
        }
        ctx.world.set_flag(self.faction, bully, RelationFlag::Bullied);

        let revoked: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| q.assignee == bully && q.is_individual(ctx.catalog))
            .cloned()
            .collect();
        if revoked.is_empty() {
            return;
        }
        self.remove_quests(&revoked);
        let text = format!(
            "{} cancelled the quests they had given you because you demanded tribute from them.",
            ctx.world.faction_name(self.faction)
        );
        ctx.world
            .notify(bully, Notification::diplomacy(text, self.faction));
    }

    /// Hook: `donor` gifted gold to this engine's faction.
    pub fn on_gold_gift(&mut self, ctx: &mut TurnContext<'_>, donor: FactionId) {
        let matching: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| q.assignee == donor && matches!(q.goal, QuestGoal::GiveGold { .. }))
            .cloned()
            .collect();
        for quest in &matching {
            self.give_reward(ctx, quest);
        }
        self.remove_quests(&matching);
    }
}
