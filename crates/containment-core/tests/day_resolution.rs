//! End-to-end tests of the day cycle through the public API.
//!
//! Each test builds a small world, staffs it through `set_roster`, lands
//! the movement transitions, and then plans and commits days.

#![allow(
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::missing_panics_doc,
    clippy::float_cmp
)]

use containment_core::{
    DispatchError, GameSession, PlaybackConfig, SessionError, build_plan, consume_one_transition,
    drain_transitions, set_roster,
};
use containment_settlement::{AnomalyDef, ContentTable, PhaseDef};
use containment_types::{
    AgentId, AgentLocation, AnomalyDefId, AnomalyId, AnomalyPhase, AssignmentSlot, Attributes,
    CityKind, DayEvent, MapPos,
};
use containment_world::{AgentEntity, AnomalyInstance, CityEntity, DayCommitPatch, WorldState};

const AN: &str = "AN_001_0000_RUST";

// =============================================================================
// Fixtures
// =============================================================================

fn make_world() -> WorldState {
    let mut world = WorldState::new(1);
    world
        .add_city(CityEntity::new("BASE", "Headquarters", CityKind::Base, 0, MapPos::new(0.0, 0.0)))
        .unwrap();
    world
        .add_city(CityEntity::new("N1", "Ashford", CityKind::Ordinary, 2000, MapPos::new(6.0, 0.0)))
        .unwrap();
    world
        .add_city(CityEntity::new("N2", "Brightwater", CityKind::Ordinary, 900, MapPos::new(-6.0, 0.0)))
        .unwrap();
    world
        .add_anomaly(AnomalyInstance::new(AN, "RUST", "N1", 1, 0))
        .unwrap();
    world
}

fn add_agent(world: &mut WorldState, id: &str, attrs: [u32; 4], hp: u32) {
    world
        .add_agent(AgentEntity::new(id, id, Attributes::from(attrs), hp, 20))
        .unwrap();
}

fn make_table(requirements: [u32; 4], hp_damage: u32) -> ContentTable {
    let phase = PhaseDef {
        requirements,
        hp_damage,
        sanity_damage: 0,
    };
    let mut table = ContentTable::default();
    table.balance.pop_to_money_rate = 0.0;
    table.anomalies.insert(
        AnomalyDefId::from("RUST"),
        AnomalyDef {
            name: "Rust Bloom".to_owned(),
            investigate: phase,
            contain: phase,
            operate: phase,
            ..AnomalyDef::default()
        },
    );
    table
}

/// Put `ids` on the investigate roster and land them on site.
fn staff(world: &mut WorldState, ids: &[&str]) {
    let ids: Vec<AgentId> = ids.iter().map(|s| AgentId::from(*s)).collect();
    set_roster(world, AN, AssignmentSlot::Investigate, &ids).unwrap();
    drain_transitions(world);
}

fn plan_and_commit(world: &mut WorldState, table: &ContentTable) -> Vec<DayEvent> {
    let plan = build_plan(world, table, &PlaybackConfig::default());
    plan.patch.apply_to(world);
    world.day = world.day.saturating_add(1);
    plan.events
}

fn anomaly(world: &WorldState) -> &AnomalyInstance {
    world.anomaly(&AnomalyId::from(AN)).unwrap()
}

fn agent<'a>(world: &'a WorldState, id: &str) -> &'a AgentEntity {
    world.agent(&AgentId::from(id)).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn simple_progress() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [6, 4, 6, 4], 20);
    staff(&mut world, &["A1"]);

    let events = plan_and_commit(&mut world, &make_table([5, 5, 5, 5], 0));

    let checks: Vec<&DayEvent> = events.iter().filter(|e| e.kind() == "agent_check").collect();
    assert_eq!(checks.len(), 1);
    match checks[0] {
        DayEvent::AgentCheck {
            roll, dc, success, ..
        } => {
            assert_eq!((*roll, *dc, *success), (2, 4, false));
        }
        other => panic!("unexpected event {other:?}"),
    }

    let deltas: Vec<&DayEvent> = events.iter().filter(|e| e.kind() == "progress_delta").collect();
    assert_eq!(deltas.len(), 1);
    match deltas[0] {
        DayEvent::ProgressDelta {
            before, delta, after, ..
        } => {
            assert!(before.abs() < 1e-6);
            assert!((delta - 0.05).abs() < 1e-6);
            assert!((after - 0.05).abs() < 1e-6);
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!((anomaly(&world).investigate_progress - 0.05).abs() < 1e-6);
}

#[test]
fn lethal_damage() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [0, 0, 0, 0], 3);
    staff(&mut world, &["A1"]);
    let table = make_table([5, 5, 5, 5], 10);

    let first = plan_and_commit(&mut world, &table);
    let second = plan_and_commit(&mut world, &table);

    let kills = first
        .iter()
        .chain(second.iter())
        .filter(|e| e.kind() == "agent_killed")
        .count();
    assert_eq!(kills, 1);
    assert_eq!(agent(&world, "A1").hp.current, 0);
    assert!(agent(&world, "A1").is_dead);
}

#[test]
fn phase_completion() {
    let mut world = make_world();
    add_agent(&mut world, "B2", [9, 9, 9, 9], 20);
    add_agent(&mut world, "A1", [9, 9, 9, 9], 20);
    staff(&mut world, &["B2", "A1"]);
    world
        .anomaly_mut(&AnomalyId::from(AN))
        .unwrap()
        .investigate_progress = 0.9;

    let events = plan_and_commit(&mut world, &make_table([5, 5, 5, 5], 0));

    let recalled: Vec<&DayEvent> = events.iter().filter(|e| e.kind() == "roster_recalled").collect();
    assert_eq!(recalled.len(), 1);
    assert_eq!(
        recalled[0],
        &DayEvent::RosterRecalled {
            anomaly: AnomalyId::from(AN),
            slot: AssignmentSlot::Investigate,
            agents: vec![AgentId::from("A1"), AgentId::from("B2")],
        }
    );
    let advanced: Vec<&DayEvent> = events.iter().filter(|e| e.kind() == "phase_advanced").collect();
    assert_eq!(
        advanced,
        vec![&DayEvent::PhaseAdvanced {
            anomaly: AnomalyId::from(AN),
            from: AnomalyPhase::Investigate,
            to: AnomalyPhase::Contain,
        }]
    );
    assert_eq!(anomaly(&world).phase, AnomalyPhase::Contain);
    assert_eq!(agent(&world, "A1").location, AgentLocation::Base);
    assert_eq!(agent(&world, "B2").location, AgentLocation::Base);
}

#[test]
fn empty_roster_dispatch() {
    let mut world = make_world();
    let change = set_roster(&mut world, AN, AssignmentSlot::Investigate, &[]).unwrap();
    assert_eq!(change.enqueued(), 0);
    assert!(world.transitions().is_empty());
    assert_eq!(world.transition_lock(), 0);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn identical_inputs_produce_identical_hashes() {
    let build = || {
        let mut world = make_world();
        add_agent(&mut world, "A1", [6, 4, 6, 4], 20);
        add_agent(&mut world, "A2", [2, 8, 2, 8], 20);
        staff(&mut world, &["A1", "A2"]);
        build_plan(&world, &make_table([5, 5, 5, 5], 4), &PlaybackConfig::default())
    };
    let a = build();
    let b = build();
    assert_eq!(a.events, b.events);
    assert_eq!(a.events_hash, b.events_hash);
    assert_eq!(a.patch, b.patch);
}

#[test]
fn patch_application_is_idempotent() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [6, 4, 6, 4], 20);
    staff(&mut world, &["A1"]);
    let plan = build_plan(&world, &make_table([5, 5, 5, 5], 3), &PlaybackConfig::default());

    plan.patch.apply_to(&mut world);
    let once = DayCommitPatch::from_shadow(&world);
    plan.patch.apply_to(&mut world);
    let twice = DayCommitPatch::from_shadow(&world);
    assert_eq!(once, twice);
    assert_eq!(once, plan.patch);
}

#[test]
fn progress_and_phase_never_regress() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [6, 6, 6, 4], 200);
    staff(&mut world, &["A1"]);
    let table = make_table([5, 5, 5, 5], 1);

    let mut last_phase = AnomalyPhase::Investigate;
    let mut last_progress = 0.0_f32;
    for _ in 0..20 {
        plan_and_commit(&mut world, &table);
        let current = anomaly(&world);
        assert!(current.phase >= last_phase);
        if current.phase == last_phase {
            assert!(current.progress(current.phase) >= last_progress);
        }
        assert!((0.0..=1.0).contains(&current.investigate_progress));
        assert!((0.0..=1.0).contains(&current.contain_progress));
        last_phase = current.phase;
        last_progress = current.progress(current.phase);
    }
    // 0.08 per day: investigation completes on day 13.
    assert_eq!(anomaly(&world).phase, AnomalyPhase::Contain);
}

#[test]
fn casualties_stay_parked_through_phase_completion() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [9, 9, 9, 9], 20);
    add_agent(&mut world, "A2", [0, 0, 0, 0], 1);
    staff(&mut world, &["A1", "A2"]);
    world
        .anomaly_mut(&AnomalyId::from(AN))
        .unwrap()
        .investigate_progress = 0.95;

    plan_and_commit(&mut world, &make_table([5, 5, 5, 5], 5));

    assert!(agent(&world, "A2").is_dead);
    assert!(agent(&world, "A2").location.is_at(&AnomalyId::from(AN)));
    assert_eq!(anomaly(&world).rosters.investigate, vec![AgentId::from("A2")]);
    assert_eq!(agent(&world, "A1").location, AgentLocation::Base);
}

#[test]
fn rosters_stay_exclusive_across_reassignments() {
    let mut world = make_world();
    for id in ["A1", "A2", "A3", "A4"] {
        add_agent(&mut world, id, [5, 5, 5, 5], 20);
    }
    let ids = |raw: &[&str]| raw.iter().map(|s| AgentId::from(*s)).collect::<Vec<_>>();

    set_roster(&mut world, AN, AssignmentSlot::Investigate, &ids(&["A1", "A2", "A3"])).unwrap();
    set_roster(&mut world, AN, AssignmentSlot::Contain, &ids(&["A3", "A4", "A3"])).unwrap();
    set_roster(&mut world, AN, AssignmentSlot::Operate, &ids(&["A2", "A4"])).unwrap();

    let rosters = &anomaly(&world).rosters;
    for id in ["A1", "A2", "A3", "A4"] {
        let slots = AssignmentSlot::ALL
            .iter()
            .filter(|slot| rosters.get(**slot).contains(&AgentId::from(id)))
            .count();
        assert_eq!(slots, 1, "{id} is on {slots} rosters");
    }

    while consume_one_transition(&mut world).is_some() {}
    assert_eq!(world.transition_lock(), 0);
    assert!(matches!(
        agent(&world, "A4").location,
        AgentLocation::AtAnomaly {
            slot: AssignmentSlot::Operate,
            ..
        }
    ));
}

#[test]
fn dispatch_rejects_unknown_anomaly_without_mutation() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [5, 5, 5, 5], 20);
    let err = set_roster(
        &mut world,
        "AN_999_9999_NOPE",
        AssignmentSlot::Investigate,
        &[AgentId::from("A1")],
    )
    .unwrap_err();
    assert!(matches!(err, DispatchError::AnomalyNotFound { .. }));
    assert_eq!(agent(&world, "A1").location, AgentLocation::Base);
    assert_eq!(world.transition_lock(), 0);
}

// =============================================================================
// Session
// =============================================================================

#[test]
fn session_refuses_stale_plan_and_pending_transitions() {
    let mut world = make_world();
    add_agent(&mut world, "A1", [5, 5, 5, 5], 20);
    let mut session = GameSession::new(
        world,
        Box::new(make_table([5, 5, 5, 5], 0)),
        7,
        PlaybackConfig::default(),
    );

    session
        .set_roster(AN, AssignmentSlot::Investigate, &[AgentId::from("A1")])
        .unwrap();
    assert!(matches!(
        session.end_day(),
        Err(SessionError::TransitionsPending { pending: 1 })
    ));

    let stale = session.plan_day();
    session.drain_transitions();
    session.end_day().unwrap();
    assert!(matches!(
        session.commit(&stale),
        Err(SessionError::StalePlan { .. })
    ));
    assert_eq!(session.state().day, 2);
}
