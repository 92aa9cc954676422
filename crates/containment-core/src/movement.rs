//! Movement-transition consumption.
//!
//! Transitions are consumed strictly one at a time in enqueue order. Each
//! consumption lands the agent (dispatch: on site in the token's slot;
//! recall: at base), completes the token and releases the lock once.

use containment_types::{AgentLocation, TransitionDirection, TransitionState};
use containment_world::{MovementTransition, WorldState};
use tracing::{debug, warn};

/// Land the oldest pending transition.
///
/// Returns the completed token, or `None` when nothing is pending.
pub fn consume_one_transition(state: &mut WorldState) -> Option<MovementTransition> {
    let pos = state
        .transitions()
        .iter()
        .position(|t| t.state == TransitionState::Pending)?;

    let token = state.transitions_mut().get_mut(pos)?;
    token.state = TransitionState::Playing;
    let mut landed = token.clone();

    match state.agent_mut(&landed.agent) {
        Some(agent) => {
            agent.location = match landed.direction {
                TransitionDirection::Dispatch => AgentLocation::AtAnomaly {
                    anomaly: landed.anomaly.clone(),
                    slot: landed.slot,
                },
                TransitionDirection::Recall => AgentLocation::Base,
            };
        }
        None => warn!(agent = %landed.agent, "Transition for unknown agent completed without landing"),
    }

    if let Some(token) = state.transitions_mut().get_mut(pos) {
        token.state = TransitionState::Completed;
    }
    landed.state = TransitionState::Completed;
    state.release_transition_lock();

    debug!(
        agent = %landed.agent,
        anomaly = %landed.anomaly,
        direction = ?landed.direction,
        lock = state.transition_lock(),
        "Transition landed"
    );
    Some(landed)
}

/// Drop completed transitions, returning how many were removed.
pub fn prune_completed(state: &mut WorldState) -> usize {
    let pruned = state.prune_completed_transitions();
    if pruned > 0 {
        debug!(pruned, remaining = state.transitions().len(), "Completed transitions pruned");
    }
    pruned
}

/// Consume every pending transition, then prune the completed ones.
pub fn drain_transitions(state: &mut WorldState) -> Vec<MovementTransition> {
    let mut landed = Vec::new();
    while let Some(token) = consume_one_transition(state) {
        landed.push(token);
    }
    prune_completed(state);
    landed
}
