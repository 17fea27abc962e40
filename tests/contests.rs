//! Global contest resolution: ties, stalls, and participants dropping out
//! of a running series.

use std::collections::BTreeMap;

use quest_engine::catalog::{Catalog, QuestDefinition, QuestKind, Scope};
use quest_engine::model::FactionId;
use quest_engine::quest::{AssignedQuest, QuestGoal};
use quest_engine::testutil::Scenario;

fn culture_contest_catalog() -> Catalog {
    let mut catalog = Catalog::empty();
    catalog.quests.insert(QuestKind::ContestCulture, QuestDefinition {
        scope: Scope::Global,
        min_partners: 3,
        duration: 10,
        reward: 40.0,
        weights: BTreeMap::new(),
    });
    catalog
}

struct Contest {
    s: Scenario,
    minor: FactionId,
    engine: quest_engine::QuestEngine,
    majors: [FactionId; 3],
}

/// Three majors at 100 culture each, all holding a contest instance
/// assigned on turn 10 with baseline 100.
fn running_contest(seed: u64) -> Contest {
    let mut s = Scenario::with_catalog(seed, culture_contest_catalog());
    let (minor, mut engine) = s.minor("Geneva");
    let majors = [s.major("Rome"), s.major("Egypt"), s.major("Babylon")];
    s.meet_everyone();
    s.world.turn = 10;
    for id in majors {
        s.faction_mut(id).culture_total = 100;
        engine.ledger.push(AssignedQuest {
            goal: QuestGoal::ContestCulture { baseline: 100 },
            assigner: minor,
            assignee: id,
            assigned_on: 10,
        });
    }
    Contest {
        s,
        minor,
        engine,
        majors,
    }
}

#[test]
fn tied_leaders_all_collect_the_reward() {
    let Contest {
        mut s,
        minor,
        mut engine,
        majors: [a, b, c],
    } = running_contest(21);

    s.run_until(&mut engine, 19);
    assert_eq!(engine.ledger.len(), 3);

    s.faction_mut(a).culture_total = 150;
    s.faction_mut(b).culture_total = 150;
    s.faction_mut(c).culture_total = 120;
    s.end_turn(&mut engine);

    assert!(engine.ledger.is_empty());
    assert_eq!(s.world.standing(minor, a), 40.0);
    assert_eq!(s.world.standing(minor, b), 40.0);
    assert_eq!(s.world.standing(minor, c), 0.0);

    let winner_inbox = s.take_inbox(a);
    assert!(
        winner_inbox
            .iter()
            .any(|n| n.text.contains("rewarded you with 40 standing"))
    );
    assert!(!winner_inbox.iter().any(|n| n.text.contains("has ended")));

    let loser_inbox = s.take_inbox(c);
    assert!(
        loser_inbox
            .iter()
            .any(|n| n.text.contains("It was won by Rome, Egypt."))
    );
}

#[test]
fn stalled_contest_ends_with_no_winner() {
    let Contest {
        mut s,
        minor,
        mut engine,
        majors,
    } = running_contest(22);

    s.run_until(&mut engine, 20);

    assert!(engine.ledger.is_empty());
    for id in majors {
        assert_eq!(s.world.standing(minor, id), 0.0);
        let inbox = s.take_inbox(id);
        assert!(
            inbox
                .iter()
                .any(|n| n.text.contains("no longer needs your help"))
        );
        assert!(!inbox.iter().any(|n| n.text.contains("It was won by")));
    }
}

#[test]
fn warring_participant_is_dropped_from_the_series() {
    let Contest {
        mut s,
        minor,
        mut engine,
        majors: [a, b, c],
    } = running_contest(23);

    s.run_until(&mut engine, 12);
    s.world.declare_war(minor, c);
    s.end_turn(&mut engine);

    assert_eq!(engine.ledger.len(), 2);
    assert!(engine.ledger.iter().all(|q| q.assignee != c));
    assert!(
        s.take_inbox(c)
            .iter()
            .any(|n| n.text.contains("no longer needs your help"))
    );

    s.faction_mut(a).culture_total = 130;
    s.run_until(&mut engine, 20);

    assert!(engine.ledger.is_empty());
    assert_eq!(s.world.standing(minor, a), 40.0);
    assert_eq!(s.world.standing(minor, b), 0.0);
    assert!(
        s.take_inbox(b)
            .iter()
            .any(|n| n.text.contains("It was won by Rome."))
    );
    // the dropped party hears nothing further
    assert!(s.take_inbox(c).is_empty());
    assert_eq!(s.world.standing(minor, c), 0.0);
}
