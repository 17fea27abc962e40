//! Per-kind eligibility predicates and quest-parameter resolution.
//!
//! Every check here is a pure read of world state and answers "could this
//! quest be offered right now, and against what target". Missing data of any
//! sort means ineligible, never an error. Ties between equally valid
//! parameter values are broken uniformly at random at resolution time, so
//! counting eligible counterparts draws nothing from the random source.

use rand::{Rng, RngCore};

use crate::catalog::QuestKind;
use crate::model::{FactionId, RelationFlag, TilePos, World};
use crate::quest::QuestGoal;

/// How far from the assigner's capital a hostile camp may be.
pub const CAMP_SEARCH_RADIUS: u32 = 8;
/// Maximum capital-to-capital distance for a road quest.
pub const ROUTE_MAX_DISTANCE: u32 = 7;
/// City-states farther than this from the assigner are never hostile-quest
/// targets.
pub const CITY_STATE_TARGET_RADIUS: u32 = 12;
/// A bullying is forgotten after this many turns.
pub const BULLY_MEMORY_TURNS: u32 = 20;
/// A wonder already more than this far along anywhere is not worth asking for.
pub const WONDER_PROGRESS_CUTOFF: f64 = 0.25;

/// Baseline check: may `assigner` offer `challenger` any quest at all.
pub fn can_assign_to(world: &World, assigner: FactionId, challenger: FactionId) -> bool {
    world.is_alive(challenger)
        && world.faction(challenger).is_some_and(|f| f.is_major())
        && world.knows(assigner, challenger)
        && !world.at_war(assigner, challenger)
}

/// Kind-specific eligibility, without resolving parameters.
pub fn is_eligible(
    world: &World,
    assigner: FactionId,
    challenger: FactionId,
    kind: QuestKind,
) -> bool {
    match kind {
        QuestKind::ClearCamp => !camp_candidates(world, assigner).is_empty(),
        QuestKind::BuildRoute => route_possible(world, assigner, challenger),
        QuestKind::ConnectResource => !resource_candidates(world, assigner, challenger).is_empty(),
        QuestKind::ConstructWonder => !wonder_candidates(world, challenger).is_empty(),
        QuestKind::FindFaction => !find_faction_candidates(world, challenger).is_empty(),
        QuestKind::FindNaturalWonder => {
            !natural_wonder_candidates(world, assigner, challenger).is_empty()
        }
        QuestKind::GiveGold => recent_bully(world, assigner).is_some(),
        QuestKind::PledgeProtection => {
            recent_bully(world, assigner).is_some()
                && world
                    .faction(assigner)
                    .is_some_and(|f| !f.protectors.contains(&challenger))
        }
        QuestKind::Denounce => denounce_target(world, assigner, challenger).is_some(),
        QuestKind::ConquerCityState => {
            world
                .faction(assigner)
                .is_some_and(|f| f.personality != crate::model::Personality::Friendly)
                && !city_state_targets(world, assigner, challenger).is_empty()
        }
        QuestKind::BullyCityState => !city_state_targets(world, assigner, challenger).is_empty(),
        QuestKind::ContestCulture | QuestKind::ContestTech => true,
        QuestKind::ContestFaith => world.religion_enabled,
    }
}

/// Resolve the concrete goal for an eligible `(kind, challenger)` pair.
/// Returns `None` when the kind turned out ineligible after all (the world
/// may have changed between counting and assignment within one sweep).
pub fn resolve_goal(
    world: &World,
    rng: &mut dyn RngCore,
    assigner: FactionId,
    challenger: FactionId,
    kind: QuestKind,
) -> Option<QuestGoal> {
    match kind {
        QuestKind::ClearCamp => {
            let pos = pick(rng, camp_candidates(world, assigner))?;
            Some(QuestGoal::ClearCamp { pos })
        }
        QuestKind::BuildRoute => {
            route_possible(world, assigner, challenger).then_some(QuestGoal::BuildRoute)
        }
        QuestKind::ConnectResource => {
            let resource = pick(rng, resource_candidates(world, assigner, challenger))?;
            Some(QuestGoal::ConnectResource { resource })
        }
        QuestKind::ConstructWonder => {
            let wonder = pick(rng, wonder_candidates(world, challenger))?;
            Some(QuestGoal::ConstructWonder { wonder })
        }
        QuestKind::FindFaction => {
            let target = pick(rng, find_faction_candidates(world, challenger))?;
            Some(QuestGoal::FindFaction { target })
        }
        QuestKind::FindNaturalWonder => {
            let wonder = pick(rng, natural_wonder_candidates(world, assigner, challenger))?;
            Some(QuestGoal::FindNaturalWonder { wonder })
        }
        QuestKind::GiveGold => {
            let bully = recent_bully(world, assigner)?;
            Some(QuestGoal::GiveGold { bully })
        }
        QuestKind::PledgeProtection => {
            is_eligible(world, assigner, challenger, kind)
                .then(|| recent_bully(world, assigner))
                .flatten()
                .map(|bully| QuestGoal::PledgeProtection { bully })
        }
        QuestKind::Denounce => {
            let target = denounce_target(world, assigner, challenger)?;
            Some(QuestGoal::Denounce { target })
        }
        QuestKind::ConquerCityState => {
            if !is_eligible(world, assigner, challenger, kind) {
                return None;
            }
            let target = pick(rng, city_state_targets(world, assigner, challenger))?;
            Some(QuestGoal::ConquerCityState { target })
        }
        QuestKind::BullyCityState => {
            let target = pick(rng, city_state_targets(world, assigner, challenger))?;
            Some(QuestGoal::BullyCityState { target })
        }
        QuestKind::ContestCulture => {
            let baseline = world.faction(challenger)?.culture_total;
            Some(QuestGoal::ContestCulture { baseline })
        }
        QuestKind::ContestFaith => {
            if !world.religion_enabled {
                return None;
            }
            let baseline = world.faction(challenger)?.faith_total;
            Some(QuestGoal::ContestFaith { baseline })
        }
        QuestKind::ContestTech => {
            let baseline = world.faction(challenger)?.techs_researched;
            Some(QuestGoal::ContestTech { baseline })
        }
    }
}

/// The faction that most recently bullied `assigner`, if the memory hasn't
/// faded yet. Most recent stamp wins; id order breaks exact ties.
pub fn recent_bully(world: &World, assigner: FactionId) -> Option<FactionId> {
    world
        .relations
        .iter()
        .filter(|((owner, _), _)| *owner == assigner)
        .filter_map(|((_, other), rel)| {
            rel.flag_turn(RelationFlag::Bullied).map(|turn| (*other, turn))
        })
        .filter(|(_, turn)| world.turn.saturating_sub(*turn) <= BULLY_MEMORY_TURNS)
        .max_by_key(|(id, turn)| (*turn, std::cmp::Reverse(*id)))
        .map(|(id, _)| id)
}

fn pick<T>(rng: &mut dyn RngCore, mut candidates: Vec<T>) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    let index = rng.random_range(0..candidates.len());
    Some(candidates.swap_remove(index))
}

fn camp_candidates(world: &World, assigner: FactionId) -> Vec<TilePos> {
    let Some(capital) = world.faction(assigner).and_then(|f| f.capital) else {
        return Vec::new();
    };
    world
        .camps
        .iter()
        .copied()
        .filter(|pos| capital.aerial_distance(*pos) <= CAMP_SEARCH_RADIUS)
        .collect()
}

fn route_possible(world: &World, assigner: FactionId, challenger: FactionId) -> bool {
    let Some(assigner_f) = world.faction(assigner) else {
        return false;
    };
    let Some(challenger_f) = world.faction(challenger) else {
        return false;
    };
    let (Some(a_cap), Some(c_cap)) = (assigner_f.capital, challenger_f.capital) else {
        return false;
    };
    !world.capitals_connected(challenger, assigner)
        && assigner_f.continent == challenger_f.continent
        && a_cap.aerial_distance(c_cap) <= ROUTE_MAX_DISTANCE
}

fn resource_candidates(world: &World, assigner: FactionId, challenger: FactionId) -> Vec<String> {
    let Some(assigner_f) = world.faction(assigner) else {
        return Vec::new();
    };
    let Some(challenger_f) = world.faction(challenger) else {
        return Vec::new();
    };
    world
        .map_resources
        .iter()
        .filter(|(name, kind)| {
            **kind != crate::model::ResourceKind::Bonus
                && challenger_f.revealed_resources.contains(*name)
                && !assigner_f.owned_resources.contains(*name)
                && !challenger_f.owned_resources.contains(*name)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

fn wonder_candidates(world: &World, challenger: FactionId) -> Vec<String> {
    let Some(challenger_f) = world.faction(challenger) else {
        return Vec::new();
    };
    world
        .wonders
        .iter()
        .filter(|(name, wonder)| {
            !wonder.exclusive
                && wonder.built_by.is_none()
                && wonder.progress < WONDER_PROGRESS_CUTOFF
                && challenger_f.unlocked_wonders.contains(*name)
        })
        .map(|(name, _)| name.clone())
        .collect()
}

fn find_faction_candidates(world: &World, challenger: FactionId) -> Vec<FactionId> {
    let Some(challenger_f) = world.faction(challenger) else {
        return Vec::new();
    };
    world
        .alive_majors()
        .filter(|f| {
            f.id != challenger
                && world.knows(challenger, f.id)
                && !challenger_f.seen_territory_of.contains(&f.id)
        })
        .map(|f| f.id)
        .collect()
}

fn natural_wonder_candidates(
    world: &World,
    assigner: FactionId,
    challenger: FactionId,
) -> Vec<String> {
    let Some(assigner_f) = world.faction(assigner) else {
        return Vec::new();
    };
    let Some(challenger_f) = world.faction(challenger) else {
        return Vec::new();
    };
    world
        .natural_wonders
        .iter()
        .filter(|w| {
            !assigner_f.found_natural_wonders.contains(*w)
                && !challenger_f.found_natural_wonders.contains(*w)
        })
        .cloned()
        .collect()
}

fn denounce_target(world: &World, assigner: FactionId, challenger: FactionId) -> Option<FactionId> {
    let bully = recent_bully(world, assigner)?;
    let valid = world.knows(challenger, bully)
        && !world.has_flag(challenger, bully, RelationFlag::Denounced)
        && !world.at_war(challenger, bully);
    valid.then_some(bully)
}

/// City-states in the assigner's closest proximity band, known to both
/// parties. Distant city-states are never targeted.
fn city_state_targets(world: &World, assigner: FactionId, challenger: FactionId) -> Vec<FactionId> {
    let Some(capital) = world.faction(assigner).and_then(|f| f.capital) else {
        return Vec::new();
    };
    let candidates: Vec<(FactionId, u32)> = world
        .alive_minors()
        .filter(|f| f.id != assigner)
        .filter_map(|f| f.capital.map(|c| (f.id, capital.aerial_distance(c))))
        .collect();

    let Some(closest) = candidates.iter().map(|(_, d)| *d).min() else {
        return Vec::new();
    };
    if closest > CITY_STATE_TARGET_RADIUS {
        return Vec::new();
    }
    candidates
        .into_iter()
        .filter(|(id, dist)| {
            *dist == closest && world.knows(challenger, *id) && world.knows(assigner, *id)
        })
        .map(|(id, _)| id)
        .collect()
}
