//! Individual quest lifecycle: completion payout, obsolescence beating the
//! deadline, timeout, and cleanup when parties fall away.

use std::collections::BTreeMap;

use quest_engine::catalog::{Catalog, QuestDefinition, QuestKind, Scope};
use quest_engine::engine::Countdown;
use quest_engine::model::Wonder;
use quest_engine::quest::{AssignedQuest, QuestGoal};
use quest_engine::testutil::Scenario;

fn single_kind_catalog(kind: QuestKind, duration: u32, reward: f64) -> Catalog {
    let mut catalog = Catalog::empty();
    catalog.quests.insert(kind, QuestDefinition {
        scope: Scope::Individual,
        min_partners: 1,
        duration,
        reward,
        weights: BTreeMap::new(),
    });
    catalog
}

#[test]
fn wonder_claimed_by_rival_resolves_before_the_deadline() {
    let catalog = single_kind_catalog(QuestKind::ConstructWonder, 20, 40.0);
    let mut s = Scenario::with_catalog(5, catalog);
    let (minor, mut engine) = s.minor("Geneva");
    let builder = s.major("Rome");
    let rival = s.major("Egypt");
    s.meet_everyone();
    s.world.turn = 10;
    s.world.wonders.insert("Colossus".into(), Wonder::unbuilt());
    engine.ledger.push(AssignedQuest {
        goal: QuestGoal::ConstructWonder {
            wonder: "Colossus".into(),
        },
        assigner: minor,
        assignee: builder,
        assigned_on: 10,
    });

    s.run_until(&mut engine, 24);
    assert_eq!(engine.ledger.len(), 1);

    s.world.wonders.get_mut("Colossus").unwrap().built_by = Some(rival);
    s.end_turn(&mut engine);

    assert!(engine.ledger.is_empty());
    assert_eq!(s.world.standing(minor, builder), 0.0);
    let inbox = s.take_inbox(builder);
    assert!(
        inbox
            .iter()
            .any(|n| n.text.contains("no longer needs your help"))
    );
    assert!(!inbox.iter().any(|n| n.text.contains("expired")));
}

#[test]
fn unfinished_wonder_quest_expires_at_the_deadline() {
    let catalog = single_kind_catalog(QuestKind::ConstructWonder, 20, 40.0);
    let mut s = Scenario::with_catalog(6, catalog);
    let (minor, mut engine) = s.minor("Geneva");
    let builder = s.major("Rome");
    s.meet_everyone();
    s.world.turn = 10;
    s.world.wonders.insert("Colossus".into(), Wonder::unbuilt());
    engine.ledger.push(AssignedQuest {
        goal: QuestGoal::ConstructWonder {
            wonder: "Colossus".into(),
        },
        assigner: minor,
        assignee: builder,
        assigned_on: 10,
    });

    s.run_until(&mut engine, 29);
    assert_eq!(engine.ledger.len(), 1);

    s.end_turn(&mut engine);
    assert!(engine.ledger.is_empty());
    assert_eq!(s.world.standing(minor, builder), 0.0);
    let inbox = s.take_inbox(builder);
    assert!(inbox.iter().any(|n| n.text.contains("has expired")));
}

#[test]
fn completed_road_pays_the_configured_standing() {
    let catalog = single_kind_catalog(QuestKind::BuildRoute, 0, 50.0);
    let mut s = Scenario::with_catalog(2, catalog);
    let (minor, mut engine) = s.minor("Geneva");
    let major = s.major("Rome");
    s.meet_everyone();
    s.world.turn = 10;
    engine.ledger.push(AssignedQuest {
        goal: QuestGoal::BuildRoute,
        assigner: minor,
        assignee: major,
        assigned_on: 10,
    });

    s.end_turn(&mut engine);
    assert_eq!(engine.ledger.len(), 1);

    s.faction_mut(major).connected_capitals.insert(minor);
    s.end_turn(&mut engine);
    assert!(engine.ledger.is_empty());
    assert_eq!(s.world.standing(minor, major), 50.0);
    let inbox = s.take_inbox(major);
    assert!(
        inbox
            .iter()
            .any(|n| n.text.contains("rewarded you with 50 standing"))
    );
}

#[test]
fn war_with_the_assigner_voids_quests() {
    let catalog = single_kind_catalog(QuestKind::BuildRoute, 0, 50.0);
    let mut s = Scenario::with_catalog(4, catalog);
    let (minor, mut engine) = s.minor("Geneva");
    let major = s.major("Rome");
    s.meet_everyone();
    s.world.turn = 10;
    engine.ledger.push(AssignedQuest {
        goal: QuestGoal::BuildRoute,
        assigner: minor,
        assignee: major,
        assigned_on: 10,
    });

    s.world.declare_war(minor, major);
    s.end_turn(&mut engine);

    assert!(engine.ledger.is_empty());
    assert_eq!(s.world.standing(minor, major), 0.0);
    let inbox = s.take_inbox(major);
    assert!(
        inbox
            .iter()
            .any(|n| n.text.contains("no longer needs your help"))
    );
}

#[test]
fn defeated_minor_forfeits_all_quest_state() {
    let mut s = Scenario::new(8);
    let (minor, mut engine) = s.minor("Geneva");
    let major = s.major("Rome");
    let aggressor = s.major("Mongolia");
    s.meet_everyone();
    s.world.turn = 10;
    engine.ledger.push(AssignedQuest {
        goal: QuestGoal::BuildRoute,
        assigner: minor,
        assignee: major,
        assigned_on: 10,
    });
    engine.scheduler.global = Countdown::Armed(3);
    engine.kill_quotas.insert(aggressor, 3);

    s.faction_mut(minor).alive = false;
    s.end_turn(&mut engine);

    assert!(engine.ledger.is_empty());
    assert!(engine.scheduler.global.is_unset());
    assert!(engine.scheduler.individual.is_empty());
    assert!(engine.kill_quotas.is_empty());
}
