//! Roster policies for unattended runs.
//!
//! A [`RosterPolicy`] looks at the live world once per day, before the day
//! ends, and returns the roster orders it wants applied. Policies never
//! mutate state themselves; the runner applies their orders through
//! dispatch.

use containment_settlement::{ContentRegistry, util::match_count};
use containment_types::{AgentId, AnomalyId, AnomalyPhase, AssignmentSlot};
use containment_world::{AgentEntity, AnomalyInstance, WorldState};

/// One requested roster replacement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterOrder {
    /// Target anomaly.
    pub anomaly: AnomalyId,
    /// Slot to replace.
    pub slot: AssignmentSlot,
    /// Full new roster.
    pub agents: Vec<AgentId>,
}

/// Source of daily roster orders.
pub trait RosterPolicy {
    /// Orders to apply before the current day ends.
    fn plan_rosters(
        &mut self,
        state: &WorldState,
        content: &dyn ContentRegistry,
    ) -> Vec<RosterOrder>;
}

/// Never changes any roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdlePolicy;

impl RosterPolicy for IdlePolicy {
    fn plan_rosters(&mut self, _state: &WorldState, _content: &dyn ContentRegistry) -> Vec<RosterOrder> {
        Vec::new()
    }
}

/// Staffs every unattended anomaly with the best-matching idle agents.
///
/// Anomalies are visited in spawn order. An anomaly is unattended when no
/// capable agent sits on the roster of its active slot. Candidates are
/// capable agents at base, ranked by match count against the active phase's
/// requirements and then by id.
#[derive(Debug, Clone, Copy)]
pub struct GreedyPolicy {
    /// Agents sent to investigation and containment.
    pub squad_size: usize,
    /// Agents sent to operate a contained anomaly.
    pub operators: usize,
}

impl Default for GreedyPolicy {
    fn default() -> Self {
        Self {
            squad_size: 2,
            operators: 1,
        }
    }
}

impl GreedyPolicy {
    const fn wanted(&self, phase: AnomalyPhase) -> usize {
        match phase {
            AnomalyPhase::Investigate | AnomalyPhase::Contain => self.squad_size,
            AnomalyPhase::Operate => self.operators,
        }
    }
}

fn is_attended(state: &WorldState, anomaly: &AnomalyInstance) -> bool {
    anomaly
        .rosters
        .get(anomaly.active_slot())
        .iter()
        .any(|id| state.agent(id).is_some_and(AgentEntity::is_capable))
}

impl RosterPolicy for GreedyPolicy {
    fn plan_rosters(
        &mut self,
        state: &WorldState,
        content: &dyn ContentRegistry,
    ) -> Vec<RosterOrder> {
        let mut idle: Vec<&AgentEntity> = state
            .agents()
            .iter()
            .filter(|a| a.is_capable() && a.location.anomaly().is_none())
            .collect();
        let mut orders = Vec::new();

        for anomaly_id in state.anomaly_order() {
            if idle.is_empty() {
                break;
            }
            let Some(anomaly) = state.anomaly(&anomaly_id) else {
                continue;
            };
            if is_attended(state, anomaly) {
                continue;
            }
            let requirements = content
                .anomaly(&anomaly.def_id)
                .map(|def| def.phase(anomaly.phase).requirements)
                .unwrap_or_default();

            idle.sort_by(|a, b| {
                let score_a = match_count(&a.attributes, &requirements);
                let score_b = match_count(&b.attributes, &requirements);
                score_b.cmp(&score_a).then_with(|| a.id.cmp(&b.id))
            });
            let take = self.wanted(anomaly.phase).min(idle.len());
            let squad: Vec<AgentId> = idle.drain(..take).map(|a| a.id.clone()).collect();
            if squad.is_empty() {
                continue;
            }
            orders.push(RosterOrder {
                anomaly: anomaly_id,
                slot: anomaly.active_slot(),
                agents: squad,
            });
        }
        orders
    }
}
