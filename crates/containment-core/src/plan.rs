//! Day planning.
//!
//! [`build_plan`] resolves a whole day against a clone of the live state and
//! returns the ordered event log plus a patch of after-values. The live
//! state is only borrowed immutably; nothing becomes visible to it until the
//! caller applies the patch.
//!
//! Settlement order:
//!
//! 1. Clone the live state into a shadow and drop its movement transitions.
//! 2. For each anomaly in spawn order: focus, work, area effect, end.
//! 3. City economy, base recovery, cleanup.
//! 4. Phase-completion recall.
//! 5. One resource delta if money, panic or negentropy moved.
//! 6. End of day.
//! 7. Capture the shadow into the patch.

use containment_settlement::{
    ContentRegistry, EventSink, apply_anomaly_work, apply_area_effect, apply_base_recovery,
    apply_city_economy, apply_cleanup, apply_phase_recall, util::anomaly_position,
};
use containment_types::DayEvent;
use containment_world::{DayCommitPatch, WorldState};
use serde::Serialize;
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::config::PlaybackConfig;

/// Panic changes smaller than this are not reported.
pub const PANIC_EPSILON: f32 = 1e-4;

/// A fully resolved day, ready to replay and commit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayResolutionPlan {
    /// Day that was resolved.
    pub day: u32,
    /// Ordered event log.
    pub events: Vec<DayEvent>,
    /// After-values to apply to the live state.
    pub patch: DayCommitPatch,
    /// Hex SHA-256 digest of the JSON-encoded event log.
    pub events_hash: String,
}

impl DayResolutionPlan {
    /// Number of events of the given kind.
    pub fn count(&self, kind: &str) -> usize {
        self.events.iter().filter(|e| e.kind() == kind).count()
    }
}

/// Hex SHA-256 over the canonical JSON encoding of `events`.
pub fn hash_events(events: &[DayEvent]) -> String {
    let mut hasher = Sha256::new();
    match serde_json::to_vec(events) {
        Ok(bytes) => hasher.update(&bytes),
        Err(err) => warn!(%err, "Event log could not be encoded for hashing"),
    }
    hex::encode(hasher.finalize())
}

/// Resolve the live state's current day without mutating it.
pub fn build_plan(
    live: &WorldState,
    registry: &dyn ContentRegistry,
    playback: &PlaybackConfig,
) -> DayResolutionPlan {
    let day = live.day;
    let mut shadow = live.clone();
    shadow.clear_transitions();

    let money_before = shadow.money;
    let panic_before = shadow.panic;
    let negentropy_before = shadow.negentropy;

    let mut events: Vec<DayEvent> = Vec::new();

    for anomaly_id in shadow.anomaly_order() {
        let position = shadow
            .anomaly(&anomaly_id)
            .and_then(|a| anomaly_position(&shadow, a));
        events.emit(DayEvent::FocusAnomaly {
            anomaly: anomaly_id.clone(),
            position,
            zoom: playback.focus_zoom,
            duration: playback.focus_duration,
        });

        apply_anomaly_work(&mut shadow, &anomaly_id, registry, &mut events);
        apply_area_effect(&mut shadow, &anomaly_id, registry, &mut events);

        events.emit(DayEvent::EndOfAnomaly {
            anomaly: anomaly_id,
        });
    }

    let balance = *registry.balance();
    apply_city_economy(&mut shadow, &balance, &mut events);
    apply_base_recovery(&mut shadow, &balance);
    apply_cleanup(&mut shadow);

    apply_phase_recall(&mut shadow, &mut events);

    let money = shadow.money.saturating_sub(money_before);
    let panic = shadow.panic - panic_before;
    let negentropy = shadow.negentropy.saturating_sub(negentropy_before);
    if money != 0 || panic.abs() > PANIC_EPSILON || negentropy != 0 {
        events.emit(DayEvent::ResourceDelta {
            money,
            panic,
            negentropy,
        });
    }

    events.emit(DayEvent::EndOfDay { day });

    let patch = DayCommitPatch::from_shadow(&shadow);
    let events_hash = hash_events(&events);

    debug!(day, anomalies = shadow.anomalies().len(), "Shadow settlement finished");
    info!(
        day,
        events = events.len(),
        hash = %events_hash,
        money_delta = money,
        negentropy_delta = negentropy,
        "Day plan built"
    );

    DayResolutionPlan {
        day,
        events,
        patch,
        events_hash,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use containment_settlement::{AnomalyDef, ContentTable, PhaseDef};
    use containment_types::{
        AgentId, AgentLocation, AnomalyDefId, AnomalyId, AnomalyPhase, AssignmentSlot,
        Attributes, CityKind, MapPos,
    };
    use containment_world::{AgentEntity, AnomalyInstance, CityEntity};

    use super::*;

    const AN: &str = "AN_001_0000_X";

    fn make_world() -> WorldState {
        let mut world = WorldState::new(1);
        world
            .add_city(CityEntity::new("BASE", "Base", CityKind::Base, 0, MapPos::new(0.0, 0.0)))
            .unwrap();
        world
            .add_city(CityEntity::new("N1", "Ashford", CityKind::Ordinary, 1000, MapPos::new(10.0, 0.0)))
            .unwrap();
        world
            .add_anomaly(AnomalyInstance::new(AN, "X", "N1", 1, 0))
            .unwrap();
        world
    }

    fn make_agent(world: &mut WorldState, id: &str, attrs: [u32; 4], hp: u32) {
        let mut agent = AgentEntity::new(id, id, Attributes::from(attrs), hp, 20);
        agent.location = AgentLocation::AtAnomaly {
            anomaly: AnomalyId::from(AN),
            slot: AssignmentSlot::Investigate,
        };
        world.add_agent(agent).unwrap();
        world
            .anomaly_mut(&AnomalyId::from(AN))
            .unwrap()
            .rosters
            .investigate
            .push(AgentId::from(id));
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
            AnomalyDefId::from("X"),
            AnomalyDef {
                investigate: phase,
                contain: phase,
                operate: phase,
                ..AnomalyDef::default()
            },
        );
        table
    }

    #[test]
    fn plan_does_not_touch_live_state() {
        let mut world = make_world();
        make_agent(&mut world, "A1", [6, 4, 6, 4], 20);
        let before = DayCommitPatch::from_shadow(&world);

        let plan = build_plan(&world, &make_table([5, 5, 5, 5], 4), &PlaybackConfig::default());

        assert_eq!(DayCommitPatch::from_shadow(&world), before);
        assert_ne!(plan.patch, before);
    }

    #[test]
    fn event_log_is_framed_per_anomaly_and_day() {
        let mut world = make_world();
        make_agent(&mut world, "A1", [6, 4, 6, 4], 20);
        let plan = build_plan(&world, &make_table([5, 5, 5, 5], 0), &PlaybackConfig::default());

        let kinds: Vec<&str> = plan.events.iter().map(DayEvent::kind).collect();
        assert_eq!(
            kinds,
            vec!["focus_anomaly", "agent_check", "progress_delta", "end_of_anomaly", "end_of_day"]
        );
        assert_eq!(plan.day, 1);
        let after = plan.patch.anomalies.get(&AnomalyId::from(AN)).unwrap();
        assert!((after.investigate_progress - 0.05).abs() < 1e-6);
    }

    #[test]
    fn focus_event_uses_playback_tuning() {
        let world = make_world();
        let plan = build_plan(&world, &make_table([0; 4], 0), &PlaybackConfig::default());
        match &plan.events[0] {
            DayEvent::FocusAnomaly { position, zoom, duration, .. } => {
                assert_eq!(*position, Some(MapPos::new(10.0, 0.0)));
                assert!((zoom - 1.15).abs() < f32::EPSILON);
                assert!((duration - 0.6).abs() < f32::EPSILON);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn resource_delta_reports_economy() {
        let world = make_world();
        let mut table = make_table([0; 4], 0);
        table.balance.pop_to_money_rate = 0.01;
        let plan = build_plan(&world, &table, &PlaybackConfig::default());

        assert_eq!(plan.count("city_money_burst"), 1);
        let delta = plan
            .events
            .iter()
            .find(|e| e.kind() == "resource_delta")
            .unwrap();
        assert!(matches!(delta, DayEvent::ResourceDelta { money: 10, negentropy: 0, .. }));
        assert_eq!(plan.patch.money, 10);
    }

    #[test]
    fn quiet_day_has_no_resource_delta() {
        let world = make_world();
        let plan = build_plan(&world, &make_table([0; 4], 0), &PlaybackConfig::default());
        assert_eq!(plan.count("resource_delta"), 0);
        assert!(matches!(plan.events.last(), Some(DayEvent::EndOfDay { day: 1 })));
    }

    #[test]
    fn completed_phase_recalls_after_settlement() {
        let mut world = make_world();
        make_agent(&mut world, "A2", [5, 5, 5, 5], 20);
        make_agent(&mut world, "A1", [5, 5, 5, 5], 20);
        world
            .anomaly_mut(&AnomalyId::from(AN))
            .unwrap()
            .investigate_progress = 0.85;

        let plan = build_plan(&world, &make_table([5, 5, 5, 5], 0), &PlaybackConfig::default());

        assert_eq!(plan.count("roster_recalled"), 1);
        assert_eq!(plan.count("phase_advanced"), 1);
        let after = plan.patch.anomalies.get(&AnomalyId::from(AN)).unwrap();
        assert_eq!(after.phase, AnomalyPhase::Contain);
        for id in ["A1", "A2"] {
            let agent = plan.patch.agents.get(&AgentId::from(id)).unwrap();
            assert_eq!(agent.location, AgentLocation::Base);
        }
    }

    #[test]
    fn identical_inputs_hash_identically() {
        let mut world = make_world();
        make_agent(&mut world, "A1", [6, 4, 6, 4], 20);
        let table = make_table([5, 5, 5, 5], 3);
        let a = build_plan(&world, &table, &PlaybackConfig::default());
        let b = build_plan(&world, &table, &PlaybackConfig::default());
        assert_eq!(a.events_hash, b.events_hash);
        assert_eq!(a.events_hash.len(), 64);
        assert_eq!(a.events_hash, hash_events(&a.events));
    }

    #[test]
    fn pending_transitions_do_not_leak_into_plan() {
        let mut world = make_world();
        world.enqueue_transition(containment_world::MovementTransition::pending(
            AgentId::from("A9"),
            AnomalyId::from(AN),
            AssignmentSlot::Investigate,
            containment_types::TransitionDirection::Dispatch,
            1,
        ));
        let plan = build_plan(&world, &make_table([0; 4], 0), &PlaybackConfig::default());
        assert_eq!(world.transition_lock(), 1);
        assert_eq!(plan.count("end_of_day"), 1);
    }
}
