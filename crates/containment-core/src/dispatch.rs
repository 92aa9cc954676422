//! Roster assignment and movement-transition enqueueing.
//!
//! [`set_roster`] atomically replaces one slot's roster on an anomaly. The
//! logical consequences are applied at once: agents' locations flip to a
//! travelling value and one movement transition per affected agent is queued
//! for the consumer to land later.

use containment_types::{AgentId, AgentLocation, AnomalyId, AssignmentSlot, TransitionDirection};
use containment_world::{MovementTransition, WorldState};
use tracing::{debug, info};

/// Precondition failures of [`set_roster`]. Nothing is mutated on error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// The anomaly key was empty.
    #[error("anomaly key is empty")]
    EmptyAnomalyKey,

    /// No anomaly instance has this id.
    #[error("anomaly not found: {key}")]
    AnomalyNotFound {
        /// The key that failed to resolve.
        key: String,
    },
}

/// What a roster replacement changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterChange {
    /// Canonical anomaly id.
    pub anomaly: AnomalyId,
    /// Slot that was replaced.
    pub slot: Option<AssignmentSlot>,
    /// Newly listed agents, in request order.
    pub added: Vec<AgentId>,
    /// Delisted agents, in previous roster order.
    pub removed: Vec<AgentId>,
    /// Dispatch transitions queued.
    pub dispatched: usize,
    /// Recall transitions queued.
    pub recalled: usize,
}

impl RosterChange {
    /// Total transitions queued.
    pub const fn enqueued(&self) -> usize {
        self.dispatched.saturating_add(self.recalled)
    }
}

/// Drop empty ids and duplicates, keeping first occurrences in order.
pub fn normalize_roster(requested: &[AgentId]) -> Vec<AgentId> {
    let mut out: Vec<AgentId> = Vec::with_capacity(requested.len());
    for id in requested {
        if !id.is_empty() && !out.contains(id) {
            out.push(id.clone());
        }
    }
    out
}

/// Replace the `slot` roster of the anomaly `anomaly_key` with `requested`.
///
/// Agents placed here are removed from the anomaly's other two slots. Each
/// added agent not already standing at the anomaly gets a dispatch
/// transition; each removed agent at, or travelling to, this anomaly in this
/// slot gets a recall transition. Agents the state does not know are
/// enqueued anyway so the consumer can decide.
pub fn set_roster(
    state: &mut WorldState,
    anomaly_key: &str,
    slot: AssignmentSlot,
    requested: &[AgentId],
) -> Result<RosterChange, DispatchError> {
    if anomaly_key.is_empty() {
        return Err(DispatchError::EmptyAnomalyKey);
    }
    let key = AnomalyId::from(anomaly_key);
    let anomaly = state
        .anomaly_mut(&key)
        .ok_or_else(|| DispatchError::AnomalyNotFound {
            key: anomaly_key.to_owned(),
        })?;
    let anomaly_id = anomaly.id.clone();

    let roster = normalize_roster(requested);
    let previous = anomaly.rosters.get(slot).to_vec();

    for other in AssignmentSlot::ALL {
        if other != slot {
            anomaly.rosters.get_mut(other).retain(|id| !roster.contains(id));
        }
    }
    anomaly.rosters.get_mut(slot).clone_from(&roster);

    let added: Vec<AgentId> = roster
        .iter()
        .filter(|id| !previous.contains(id))
        .cloned()
        .collect();
    let removed: Vec<AgentId> = previous
        .iter()
        .filter(|id| !roster.contains(id))
        .cloned()
        .collect();

    let mut change = RosterChange {
        anomaly: anomaly_id.clone(),
        slot: Some(slot),
        added,
        removed,
        dispatched: 0,
        recalled: 0,
    };
    let day = state.day;

    for id in &change.added {
        let needs_travel = state
            .agent(id)
            .is_none_or(|a| !a.location.is_at(&anomaly_id));
        if needs_travel {
            state.enqueue_transition(MovementTransition::pending(
                id.clone(),
                anomaly_id.clone(),
                slot,
                TransitionDirection::Dispatch,
                day,
            ));
            change.dispatched = change.dispatched.saturating_add(1);
        }
    }

    for id in &change.removed {
        let was_here = state
            .agent(id)
            .is_none_or(|a| a.location.is_assigned_to(&anomaly_id, slot));
        if was_here {
            state.enqueue_transition(MovementTransition::pending(
                id.clone(),
                anomaly_id.clone(),
                slot,
                TransitionDirection::Recall,
                day,
            ));
            change.recalled = change.recalled.saturating_add(1);
        }
    }

    // Logical half: locations change now, landing happens on consume.
    for id in &roster {
        if let Some(agent) = state.agent_mut(id) {
            agent.location = if agent.location.is_at(&anomaly_id) {
                AgentLocation::AtAnomaly {
                    anomaly: anomaly_id.clone(),
                    slot,
                }
            } else {
                AgentLocation::TravellingToAnomaly {
                    anomaly: anomaly_id.clone(),
                    slot,
                }
            };
        }
    }
    for id in &change.removed {
        let Some(agent) = state.agent_mut(id) else {
            continue;
        };
        if agent.location.is_assigned_to(&anomaly_id, slot) {
            agent.location = AgentLocation::TravellingToBase {
                anomaly: anomaly_id.clone(),
                slot,
            };
        }
    }

    debug!(
        anomaly = %anomaly_id,
        slot = slot.label(),
        size = roster.len(),
        lock = state.transition_lock(),
        "Roster replaced"
    );
    if change.enqueued() > 0 {
        info!(
            anomaly = %anomaly_id,
            slot = slot.label(),
            dispatched = change.dispatched,
            recalled = change.recalled,
            "Movement transitions enqueued"
        );
    }
    Ok(change)
}
