//! Quest resolution: completion, obsolescence and timeout checks, contest
//! scoring, and the per-turn ledger sweeps.
//!
//! Sweeps work snapshot-then-apply: decisions are computed over a copy of
//! the ledger, then removals happen in one pass, so resolution never
//! iterates a collection it is mutating.

use std::collections::BTreeMap;

use crate::catalog::QuestKind;
use crate::engine::context::TurnContext;
use crate::engine::eligibility::can_assign_to;
use crate::engine::QuestEngine;
use crate::model::{FactionId, World};
use crate::quest::{AssignedQuest, QuestGoal};

/// Kind-specific success check. Hook-completed kinds (camp, gold, conquest,
/// tribute) never complete from the turn sweep.
pub fn is_complete(world: &World, assigner: FactionId, quest: &AssignedQuest) -> bool {
    let assignee = quest.assignee;
    match &quest.goal {
        QuestGoal::BuildRoute => world.capitals_connected(assignee, assigner),
        QuestGoal::ConnectResource { resource } => world
            .faction(assignee)
            .is_some_and(|f| f.owned_resources.contains(resource)),
        QuestGoal::ConstructWonder { wonder } => world.wonder_built_by(wonder) == Some(assignee),
        QuestGoal::FindFaction { target } => world
            .faction(assignee)
            .is_some_and(|f| f.seen_territory_of.contains(target)),
        QuestGoal::FindNaturalWonder { wonder } => world
            .faction(assignee)
            .is_some_and(|f| f.found_natural_wonders.contains(wonder)),
        QuestGoal::PledgeProtection { .. } => world
            .faction(assigner)
            .is_some_and(|f| f.protectors.contains(&assignee)),
        QuestGoal::Denounce { target } => {
            world.has_flag(assignee, *target, crate::model::RelationFlag::Denounced)
        }
        QuestGoal::ClearCamp { .. }
        | QuestGoal::GiveGold { .. }
        | QuestGoal::ConquerCityState { .. }
        | QuestGoal::BullyCityState { .. }
        | QuestGoal::ContestCulture { .. }
        | QuestGoal::ContestFaith { .. }
        | QuestGoal::ContestTech { .. } => false,
    }
}

/// Kind-specific "success is now permanently impossible" check.
pub fn is_obsolete(world: &World, quest: &AssignedQuest) -> bool {
    match &quest.goal {
        QuestGoal::ClearCamp { pos } => !world.camps.contains(pos),
        QuestGoal::ConstructWonder { wonder } => world
            .wonder_built_by(wonder)
            .is_some_and(|builder| builder != quest.assignee),
        QuestGoal::FindFaction { target }
        | QuestGoal::Denounce { target }
        | QuestGoal::ConquerCityState { target }
        | QuestGoal::BullyCityState { target } => world.is_defeated(*target),
        _ => false,
    }
}

/// Contest score: total gained since assignment. Non-contest kinds score 0.
pub fn score(world: &World, quest: &AssignedQuest) -> i64 {
    let Some(assignee) = world.faction(quest.assignee) else {
        return 0;
    };
    match &quest.goal {
        QuestGoal::ContestCulture { baseline } => {
            assignee.culture_total as i64 - *baseline as i64
        }
        QuestGoal::ContestFaith { baseline } => assignee.faith_total as i64 - *baseline as i64,
        QuestGoal::ContestTech { baseline } => {
            assignee.techs_researched as i64 - *baseline as i64
        }
        _ => 0,
    }
}

/// Winners and losers of one global series. All instances tied at the
/// maximum positive score win; everyone else loses. With no positive score
/// there are no winners at all.
#[derive(Debug, Default)]
pub struct Standings {
    pub winners: Vec<AssignedQuest>,
    pub losers: Vec<AssignedQuest>,
    pub max_score: i64,
}

impl Standings {
    pub fn evaluate(world: &World, instances: &[AssignedQuest]) -> Self {
        let max_score = instances.iter().map(|q| score(world, q)).max().unwrap_or(0);
        let mut standings = Standings {
            max_score,
            ..Standings::default()
        };
        for quest in instances {
            if max_score > 0 && score(world, quest) == max_score {
                standings.winners.push(quest.clone());
            } else {
                standings.losers.push(quest.clone());
            }
        }
        standings
    }

    pub fn winner_ids(&self) -> Vec<FactionId> {
        self.winners.iter().map(|q| q.assignee).collect()
    }
}

impl QuestEngine {
    /// Resolve global series: first drop participants that stopped being
    /// valid assignees, then resolve any series one of whose instances has
    /// timed out — atomically, as a group.
    pub(crate) fn sweep_global_quests(&mut self, ctx: &mut TurnContext<'_>) {
        let dropped: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| {
                q.is_global(ctx.catalog) && !can_assign_to(ctx.world, self.faction, q.assignee)
            })
            .cloned()
            .collect();
        for quest in &dropped {
            self.notify_no_longer_needed(ctx, quest);
        }
        self.remove_quests(&dropped);

        let mut groups: BTreeMap<(QuestKind, u32), Vec<AssignedQuest>> = BTreeMap::new();
        for quest in self.ledger.iter().filter(|q| q.is_global(ctx.catalog)) {
            groups
                .entry((quest.kind(), quest.assigned_on))
                .or_default()
                .push(quest.clone());
        }

        for instances in groups.into_values() {
            if instances
                .iter()
                .any(|q| q.is_expired(ctx.catalog, ctx.world))
            {
                self.resolve_global_series(ctx, &instances);
            }
        }
    }

    /// Resolving an empty series is a silent no-op.
    pub(crate) fn resolve_global_series(
        &mut self,
        ctx: &mut TurnContext<'_>,
        instances: &[AssignedQuest],
    ) {
        if instances.is_empty() {
            return;
        }
        let standings = Standings::evaluate(ctx.world, instances);
        tracing::debug!(
            assigner = %self.faction,
            kind = ?instances[0].kind(),
            winners = standings.winners.len(),
            losers = standings.losers.len(),
            max_score = standings.max_score,
            "global series resolved"
        );

        for quest in &standings.winners {
            self.give_reward(ctx, quest);
        }
        let winner_ids = standings.winner_ids();
        for quest in &standings.losers {
            if winner_ids.is_empty() {
                self.notify_no_longer_needed(ctx, quest);
            } else {
                self.notify_contest_ended(ctx, quest, &winner_ids);
            }
        }
        self.remove_quests(instances);
    }

    /// Resolve individual quests, each independently, in priority order:
    /// invalid parties, completion, obsolescence, timeout.
    pub(crate) fn sweep_individual_quests(&mut self, ctx: &mut TurnContext<'_>) {
        let snapshot: Vec<AssignedQuest> = self
            .ledger
            .iter()
            .filter(|q| q.is_individual(ctx.catalog))
            .cloned()
            .collect();

        let mut resolved = Vec::new();
        for quest in snapshot {
            if !can_assign_to(ctx.world, self.faction, quest.assignee) {
                self.notify_no_longer_needed(ctx, &quest);
            } else if is_complete(ctx.world, self.faction, &quest) {
                self.give_reward(ctx, &quest);
            } else if is_obsolete(ctx.world, &quest) {
                self.notify_no_longer_needed(ctx, &quest);
            } else if quest.is_expired(ctx.catalog, ctx.world) {
                self.notify_timed_out(ctx, &quest);
            } else {
                continue;
            }
            resolved.push(quest);
        }
        self.remove_quests(&resolved);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Faction, Rank, TilePos};

    const MINOR: FactionId = FactionId(1);

    fn contest(assignee: u32, baseline: u32) -> AssignedQuest {
        AssignedQuest {
            goal: QuestGoal::ContestCulture { baseline },
            assigner: MINOR,
            assignee: FactionId(assignee),
            assigned_on: 10,
        }
    }

    fn world_with_culture(totals: &[(u32, u32)]) -> World {
        let mut world = World::new();
        for (id, culture) in totals {
            let mut f = Faction::new(FactionId(*id), format!("F{id}"), Rank::Major);
            f.culture_total = *culture;
            world.factions.insert(f.id, f);
        }
        world
    }

    #[test]
    fn ties_at_max_all_win() {
        let world = world_with_culture(&[(2, 150), (3, 150), (4, 120)]);
        let instances = vec![contest(2, 100), contest(3, 100), contest(4, 100)];
        let standings = Standings::evaluate(&world, &instances);
        assert_eq!(standings.max_score, 50);
        assert_eq!(standings.winner_ids(), vec![FactionId(2), FactionId(3)]);
        assert_eq!(standings.losers.len(), 1);
        assert_eq!(standings.losers[0].assignee, FactionId(4));
    }

    #[test]
    fn zero_progress_means_no_winners() {
        let world = world_with_culture(&[(2, 100), (3, 100)]);
        let instances = vec![contest(2, 100), contest(3, 100)];
        let standings = Standings::evaluate(&world, &instances);
        assert!(standings.winners.is_empty());
        assert_eq!(standings.losers.len(), 2);
    }

    #[test]
    fn camp_obsolete_once_cleared_elsewhere() {
        let mut world = World::new();
        let pos = TilePos::new(3, 3);
        world.camps.insert(pos);
        let quest = AssignedQuest {
            goal: QuestGoal::ClearCamp { pos },
            assigner: MINOR,
            assignee: FactionId(2),
            assigned_on: 0,
        };
        assert!(!is_obsolete(&world, &quest));
        world.camps.remove(&pos);
        assert!(is_obsolete(&world, &quest));
    }

    #[test]
    fn wonder_built_by_rival_is_obsolete_not_complete() {
        let mut world = world_with_culture(&[(2, 0), (3, 0)]);
        world.wonders.insert("Colossus".into(), crate::model::Wonder {
            built_by: Some(FactionId(3)),
            ..crate::model::Wonder::unbuilt()
        });
        let quest = AssignedQuest {
            goal: QuestGoal::ConstructWonder {
                wonder: "Colossus".into(),
            },
            assigner: MINOR,
            assignee: FactionId(2),
            assigned_on: 0,
        };
        assert!(is_obsolete(&world, &quest));
        assert!(!is_complete(&world, MINOR, &quest));

        world.wonders.get_mut("Colossus").unwrap().built_by = Some(FactionId(2));
        assert!(is_complete(&world, MINOR, &quest));
        assert!(!is_obsolete(&world, &quest));
    }

    #[test]
    fn score_is_zero_for_missing_assignee() {
        let world = World::new();
        assert_eq!(score(&world, &contest(9, 50)), 0);
    }
}
