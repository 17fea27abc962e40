//! Candidate selection: which quest kind fires when a countdown reaches
//! zero, and who it is offered to.

use rand::{Rng, RngCore};

use crate::catalog::{QuestDefinition, QuestKind, Scope};
use crate::engine::context::TurnContext;
use crate::engine::eligibility::{self, BULLY_MEMORY_TURNS};
use crate::engine::scheduler::{GLOBAL_MAX_ACTIVE, INDIVIDUAL_MAX_ACTIVE};
use crate::engine::QuestEngine;
use crate::model::{FactionId, Notification, RelationFlag, World};
use crate::quest::{AssignedQuest, QuestGoal};

/// Weighted choice over `(candidate, weight)` pairs: probability
/// proportional to weight. Non-positive weights can never win.
pub fn weighted_pick<T: Copy>(rng: &mut dyn RngCore, candidates: &[(T, f64)]) -> Option<T> {
    let total: f64 = candidates.iter().map(|(_, w)| w.max(0.0)).sum();
    if total <= 0.0 {
        return None;
    }
    let mut roll = rng.random_range(0.0..total);
    for (candidate, weight) in candidates {
        if *weight <= 0.0 {
            continue;
        }
        if roll < *weight {
            return Some(*candidate);
        }
        roll -= weight;
    }
    // Float summation slack lands on the last positive-weight candidate.
    candidates
        .iter()
        .rev()
        .find(|(_, w)| *w > 0.0)
        .map(|(c, _)| *c)
}

/// Selection weight of a kind for a given assigner: base 1, multiplied by
/// the personality entry and the archetype entry of the weight table, each
/// only when present.
pub fn quest_weight(world: &World, assigner: FactionId, def: &QuestDefinition) -> f64 {
    let Some(assigner_f) = world.faction(assigner) else {
        return 0.0;
    };
    let mut weight = 1.0;
    if let Some(w) = def.weights.get(assigner_f.personality.as_str()) {
        weight *= w;
    }
    if let Some(w) = def.weights.get(assigner_f.archetype.as_str()) {
        weight *= w;
    }
    weight
}

/// True when `challenger` bullied `assigner` recently enough that the
/// assigner still refuses to offer them individual quests.
fn bullied_recently(world: &World, assigner: FactionId, challenger: FactionId) -> bool {
    world
        .flag_turn(assigner, challenger, RelationFlag::Bullied)
        .is_some_and(|turn| world.turn.saturating_sub(turn) <= BULLY_MEMORY_TURNS)
}

impl QuestEngine {
    /// Full validity of offering `kind` to `challenger` right now, ledger
    /// state included.
    pub(crate) fn quest_valid(
        &self,
        ctx: &TurnContext<'_>,
        kind: QuestKind,
        def: &QuestDefinition,
        challenger: FactionId,
    ) -> bool {
        if !eligibility::can_assign_to(ctx.world, self.faction, challenger) {
            return false;
        }
        if self.has_active(kind, challenger) {
            return false;
        }
        if def.is_individual() && bullied_recently(ctx.world, self.faction, challenger) {
            return false;
        }
        eligibility::is_eligible(ctx.world, self.faction, challenger, kind)
    }

    /// Global path: fires when the global countdown hits zero and no global
    /// series is active. On success the countdown goes back to unset;
    /// otherwise it stays at zero and retries next turn.
    pub(crate) fn try_start_global_quest(&mut self, ctx: &mut TurnContext<'_>) {
        if !self.scheduler.global.fired() {
            return;
        }
        if self.active_global_series(ctx.catalog) >= GLOBAL_MAX_ACTIVE {
            return;
        }

        let catalog = ctx.catalog;
        let majors: Vec<FactionId> = ctx.world.alive_majors().map(|f| f.id).collect();

        let mut candidates: Vec<(QuestKind, f64)> = Vec::new();
        for (kind, def) in catalog.of_scope(Scope::Global) {
            let eligible = majors
                .iter()
                .filter(|id| self.quest_valid(ctx, kind, def, **id))
                .count();
            if eligible as u32 >= def.min_partners {
                candidates.push((kind, quest_weight(ctx.world, self.faction, def)));
            }
        }

        let Some(kind) = weighted_pick(ctx.rng, &candidates) else {
            return;
        };
        let Some(def) = catalog.get(kind) else {
            return;
        };
        let assignees: Vec<FactionId> = majors
            .into_iter()
            .filter(|id| self.quest_valid(ctx, kind, def, *id))
            .collect();

        self.assign_quest(ctx, kind, &assignees);
        self.scheduler.reset_global();
    }

    /// Individual path: one attempt per counterpart whose countdown fired.
    pub(crate) fn try_start_individual_quests(&mut self, ctx: &mut TurnContext<'_>) {
        let due: Vec<FactionId> = self
            .scheduler
            .individual
            .iter()
            .filter(|(_, c)| c.fired())
            .map(|(id, _)| *id)
            .collect();

        let catalog = ctx.catalog;
        for challenger in due {
            if self.individual_count(catalog, challenger) >= INDIVIDUAL_MAX_ACTIVE {
                continue;
            }
            let mut candidates: Vec<(QuestKind, f64)> = Vec::new();
            for (kind, def) in catalog.of_scope(Scope::Individual) {
                if self.quest_valid(ctx, kind, def, challenger) {
                    candidates.push((kind, quest_weight(ctx.world, self.faction, def)));
                }
            }

            if let Some(kind) = weighted_pick(ctx.rng, &candidates) {
                self.assign_quest(ctx, kind, &[challenger]);
            }
        }
    }

    /// Create one instance per assignee, resolving per-assignee parameters,
    /// and notify each assignee. Individual assignments also unset that
    /// counterpart's countdown so it re-seeds next turn.
    pub(crate) fn assign_quest(
        &mut self,
        ctx: &mut TurnContext<'_>,
        kind: QuestKind,
        assignees: &[FactionId],
    ) {
        let Some(def) = ctx.catalog.get(kind) else {
            return;
        };
        let individual = def.is_individual();
        let turn = ctx.world.turn;

        for &assignee in assignees {
            let Some(goal) =
                eligibility::resolve_goal(ctx.world, ctx.rng, self.faction, assignee, kind)
            else {
                continue;
            };

            debug_assert!(
                !self.has_active(kind, assignee),
                "duplicate quest {kind:?} for {assignee}"
            );
            debug_assert!(
                !individual
                    || self.individual_count(ctx.catalog, assignee) < INDIVIDUAL_MAX_ACTIVE,
                "individual quest cap exceeded for {assignee}"
            );

            tracing::debug!(
                assigner = %self.faction,
                assignee = %assignee,
                ?kind,
                turn,
                "quest assigned"
            );

            let mut notification = Notification::diplomacy(
                format!(
                    "{} assigned you a new quest: {}.",
                    ctx.world.faction_name(self.faction),
                    kind.display_name()
                ),
                self.faction,
            );
            if let QuestGoal::ClearCamp { pos } = goal {
                notification = notification.targeting(pos);
            }
            ctx.world.notify(assignee, notification);

            self.ledger.push(AssignedQuest {
                goal,
                assigner: self.faction,
                assignee,
                assigned_on: turn,
            });
            if individual {
                self.scheduler.reset_individual(assignee);
            }
        }
    }
}
