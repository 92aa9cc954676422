//! Phase-completion recall.
//!
//! `Investigate --(progress >= 1)--> Contain --(progress >= 1)--> Operate`.
//! On each transition the capable members of the finished phase's roster
//! who are on site in that slot are sent home and taken off the roster.
//! Members still travelling keep their slot, as do dead and insane ones.

use containment_types::{AgentId, AgentLocation, AnomalyId, AnomalyPhase, DayEvent};
use containment_world::WorldState;
use tracing::info;

use crate::sink::EventSink;

/// One phase transition performed by [`apply_phase_recall`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTransition {
    /// Advancing anomaly.
    pub anomaly: AnomalyId,
    /// Completed phase.
    pub from: AnomalyPhase,
    /// New phase.
    pub to: AnomalyPhase,
    /// Agents sent home, ascending.
    pub recalled: Vec<AgentId>,
}

/// Advance every anomaly whose current phase is complete, in canonical
/// anomaly order.
pub fn apply_phase_recall(
    state: &mut WorldState,
    sink: &mut dyn EventSink,
) -> Vec<PhaseTransition> {
    let mut transitions = Vec::new();

    for anomaly_id in state.anomaly_order() {
        while let Some(transition) = advance_once(state, &anomaly_id) {
            if !transition.recalled.is_empty() {
                sink.emit(DayEvent::RosterRecalled {
                    anomaly: anomaly_id.clone(),
                    slot: transition.from.slot(),
                    agents: transition.recalled.clone(),
                });
            }
            sink.emit(DayEvent::PhaseAdvanced {
                anomaly: anomaly_id.clone(),
                from: transition.from,
                to: transition.to,
            });
            info!(
                anomaly = %anomaly_id,
                from = ?transition.from,
                to = ?transition.to,
                recalled = transition.recalled.len(),
                "Phase advanced"
            );
            transitions.push(transition);
        }
    }

    transitions
}

/// Perform at most one transition on `anomaly_id`.
fn advance_once(state: &mut WorldState, anomaly_id: &AnomalyId) -> Option<PhaseTransition> {
    let anomaly = state.anomaly(anomaly_id)?;
    let from = anomaly.phase;
    let to = from.next()?;
    if anomaly.progress(from) < 1.0 {
        return None;
    }
    let slot = from.slot();

    let mut recalled: Vec<AgentId> = anomaly
        .rosters
        .get(slot)
        .iter()
        .filter(|id| {
            state.agent(id).is_some_and(|a| {
                a.is_capable()
                    && a.location.is_at(anomaly_id)
                    && a.location.slot() == Some(slot)
            })
        })
        .cloned()
        .collect();
    recalled.sort();
    recalled.dedup();

    for id in &recalled {
        if let Some(agent) = state.agent_mut(id) {
            agent.location = AgentLocation::Base;
        }
    }

    let anomaly = state.anomaly_mut(anomaly_id)?;
    anomaly
        .rosters
        .get_mut(slot)
        .retain(|id| !recalled.contains(id));
    anomaly.phase = to;

    Some(PhaseTransition {
        anomaly: anomaly_id.clone(),
        from,
        to,
        recalled,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use containment_types::AssignmentSlot;

    use super::*;
    use crate::testing::{make_agent_at, make_anomaly, make_world};

    const AN: &str = "AN_001_0000_X";

    fn complete_investigation(world: &mut WorldState) {
        world
            .anomaly_mut(&AnomalyId::from(AN))
            .unwrap()
            .investigate_progress = 1.0;
    }

    #[test]
    fn completion_recalls_roster_in_id_order() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        make_agent_at(&mut world, "B2", [0; 4], 10, AN, AssignmentSlot::Investigate);
        make_agent_at(&mut world, "A1", [0; 4], 10, AN, AssignmentSlot::Investigate);
        complete_investigation(&mut world);

        let mut events = Vec::new();
        let done = apply_phase_recall(&mut world, &mut events);

        assert_eq!(done.len(), 1);
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            DayEvent::RosterRecalled {
                anomaly: AnomalyId::from(AN),
                slot: AssignmentSlot::Investigate,
                agents: vec![AgentId::from("A1"), AgentId::from("B2")],
            }
        );
        assert_eq!(
            events[1],
            DayEvent::PhaseAdvanced {
                anomaly: AnomalyId::from(AN),
                from: AnomalyPhase::Investigate,
                to: AnomalyPhase::Contain,
            }
        );
        for id in ["A1", "B2"] {
            assert_eq!(world.agent(&AgentId::from(id)).unwrap().location, AgentLocation::Base);
        }
        let anomaly = world.anomaly(&AnomalyId::from(AN)).unwrap();
        assert_eq!(anomaly.phase, AnomalyPhase::Contain);
        assert!(anomaly.rosters.investigate.is_empty());
    }

    #[test]
    fn casualties_keep_their_slot() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        make_agent_at(&mut world, "A1", [0; 4], 10, AN, AssignmentSlot::Investigate);
        make_agent_at(&mut world, "A2", [0; 4], 10, AN, AssignmentSlot::Investigate);
        make_agent_at(&mut world, "A3", [0; 4], 10, AN, AssignmentSlot::Investigate);
        world.agent_mut(&AgentId::from("A1")).unwrap().is_dead = true;
        world.agent_mut(&AgentId::from("A2")).unwrap().is_insane = true;
        complete_investigation(&mut world);

        let mut events = Vec::new();
        apply_phase_recall(&mut world, &mut events);

        let anomaly = world.anomaly(&AnomalyId::from(AN)).unwrap();
        assert_eq!(
            anomaly.rosters.investigate,
            vec![AgentId::from("A1"), AgentId::from("A2")]
        );
        assert!(world.agent(&AgentId::from("A1")).unwrap().location.is_at(&AnomalyId::from(AN)));
        assert!(matches!(
            &events[0],
            DayEvent::RosterRecalled { agents, .. } if agents == &vec![AgentId::from("A3")]
        ));
    }

    #[test]
    fn empty_roster_still_advances_without_recall_event() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        complete_investigation(&mut world);

        let mut events = Vec::new();
        apply_phase_recall(&mut world, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind(), "phase_advanced");
    }

    #[test]
    fn both_phases_complete_in_one_pass() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        let anomaly = world.anomaly_mut(&AnomalyId::from(AN)).unwrap();
        anomaly.investigate_progress = 1.0;
        anomaly.contain_progress = 1.0;

        let mut events = Vec::new();
        let done = apply_phase_recall(&mut world, &mut events);
        assert_eq!(done.len(), 2);
        assert_eq!(
            world.anomaly(&AnomalyId::from(AN)).unwrap().phase,
            AnomalyPhase::Operate
        );
    }

    #[test]
    fn incomplete_and_operated_anomalies_stay_put() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        make_anomaly(&mut world, "AN_2", "Y", "N2", 1);
        world
            .anomaly_mut(&AnomalyId::from(AN))
            .unwrap()
            .investigate_progress = 0.99;
        world.anomaly_mut(&AnomalyId::from("AN_2")).unwrap().phase = AnomalyPhase::Operate;

        let mut events = Vec::new();
        assert!(apply_phase_recall(&mut world, &mut events).is_empty());
        assert!(events.is_empty());
    }

    #[test]
    fn agent_already_heading_home_is_not_recalled_again() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        make_agent_at(&mut world, "A1", [0; 4], 10, AN, AssignmentSlot::Investigate);
        world.agent_mut(&AgentId::from("A1")).unwrap().location = AgentLocation::TravellingToBase {
            anomaly: AnomalyId::from(AN),
            slot: AssignmentSlot::Investigate,
        };
        complete_investigation(&mut world);

        let mut events = Vec::new();
        apply_phase_recall(&mut world, &mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn agent_still_arriving_keeps_its_slot() {
        let mut world = make_world();
        make_anomaly(&mut world, AN, "X", "N1", 0);
        make_agent_at(&mut world, "A1", [0; 4], 10, AN, AssignmentSlot::Investigate);
        make_agent_at(&mut world, "A2", [0; 4], 10, AN, AssignmentSlot::Investigate);
        let arriving = AgentLocation::TravellingToAnomaly {
            anomaly: AnomalyId::from(AN),
            slot: AssignmentSlot::Investigate,
        };
        world.agent_mut(&AgentId::from("A2")).unwrap().location = arriving.clone();
        complete_investigation(&mut world);

        let mut events = Vec::new();
        let done = apply_phase_recall(&mut world, &mut events);

        assert_eq!(done[0].recalled, vec![AgentId::from("A1")]);
        assert_eq!(world.agent(&AgentId::from("A2")).unwrap().location, arriving);
        assert_eq!(
            world.anomaly(&AnomalyId::from(AN)).unwrap().rosters.investigate,
            vec![AgentId::from("A2")]
        );
    }
}
