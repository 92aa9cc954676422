//! Shared queries and formulas for the settlement systems.

use containment_types::{AgentId, AnomalyId, AssignmentSlot, Attributes, MapPos};
use containment_world::{AnomalyInstance, WorldState};
use tracing::warn;

use crate::content::{AnomalyDef, ContentRegistry};

/// Progress within this distance of a full bar is snapped to exactly `1.0`.
pub const PROGRESS_EPSILON: f32 = 1e-4;

/// Progress contribution per match count, indexed 0..=4.
const CONTRIBUTION: [f32; 5] = [0.00, 0.02, 0.05, 0.08, 0.10];

/// Number of `requirements` the agent meets or exceeds (0..=4).
pub fn match_count(attributes: &Attributes, requirements: &[u32; 4]) -> u8 {
    let met = attributes
        .as_array()
        .iter()
        .zip(requirements)
        .filter(|(have, need)| have >= need)
        .count();
    u8::try_from(met).unwrap_or(4).min(4)
}

/// Daily progress added by one agent with the given match count.
pub fn progress_contribution(matches: u8) -> f32 {
    CONTRIBUTION
        .get(usize::from(matches.min(4)))
        .copied()
        .unwrap_or(0.0)
}

/// `ceil(base * (4 - matches) / 4)`, computed in integers.
pub fn scaled_damage(base: u32, matches: u8) -> u32 {
    let missing = u64::from(4_u8.saturating_sub(matches));
    let scaled = u64::from(base)
        .saturating_mul(missing)
        .saturating_add(3)
        / 4;
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

/// Roster members of `slot` physically present at `anomaly` and not dead,
/// in ascending id order.
pub fn arrived_workers(
    state: &WorldState,
    anomaly: &AnomalyInstance,
    slot: AssignmentSlot,
) -> Vec<AgentId> {
    let mut workers: Vec<AgentId> = anomaly
        .rosters
        .get(slot)
        .iter()
        .filter(|id| {
            state
                .agent(id)
                .is_some_and(|a| !a.is_dead && a.location.is_at(&anomaly.id))
        })
        .cloned()
        .collect();
    workers.sort();
    workers.dedup();
    workers
}

/// The anomaly's own position, else its origin city's position.
pub fn anomaly_position(state: &WorldState, anomaly: &AnomalyInstance) -> Option<MapPos> {
    anomaly
        .position
        .or_else(|| state.city(&anomaly.origin_city).map(|c| c.position))
        .filter(|p| p.x.is_finite() && p.y.is_finite())
}

/// Look up the definition of an anomaly, substituting a neutral one with a
/// warning when the registry does not know it.
pub fn resolve_def(registry: &dyn ContentRegistry, anomaly: &AnomalyInstance) -> AnomalyDef {
    registry.anomaly(&anomaly.def_id).cloned().unwrap_or_else(|| {
        warn!(
            anomaly = %anomaly.id,
            def = %anomaly.def_id,
            "Missing anomaly definition, using neutral values"
        );
        AnomalyDef::default()
    })
}

/// Population a city loses to one day of the anomaly's area effect.
pub fn population_loss(def: &AnomalyDef, population: u32) -> u32 {
    def.population_kill.min(population)
}

/// Shorthand used by systems that need the anomaly by id and bail out
/// quietly when it vanished.
pub(crate) fn find_anomaly<'a>(
    state: &'a WorldState,
    id: &AnomalyId,
) -> Option<&'a AnomalyInstance> {
    let found = state.anomaly(id);
    if found.is_none() {
        warn!(anomaly = %id, "Anomaly not found during settlement");
    }
    found
}
