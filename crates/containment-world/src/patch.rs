//! After-value patches produced by day planning.
//!
//! A [`DayCommitPatch`] records only final values: it is captured verbatim
//! from the shadow state at the end of planning and applied by exact
//! overwrite, so applying it twice yields the same state as applying it once.

use std::collections::BTreeMap;

use containment_types::{AgentId, AgentLocation, AnomalyId, AnomalyPhase, CityId, Vital};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::state::{Rosters, WorldState};

/// Final values of one city.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityAfter {
    /// Population at end of day.
    pub population: u32,
}

/// Final values of one agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentAfter {
    /// Hit points at end of day.
    pub hp: Vital,
    /// Sanity at end of day.
    pub sanity: Vital,
    /// Death flag at end of day.
    pub is_dead: bool,
    /// Insanity flag at end of day.
    pub is_insane: bool,
    /// Location at end of day.
    pub location: AgentLocation,
}

/// Final values of one anomaly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnomalyAfter {
    /// Phase at end of day.
    pub phase: AnomalyPhase,
    /// Investigation progress at end of day.
    pub investigate_progress: f32,
    /// Containment progress at end of day.
    pub contain_progress: f32,
    /// Rosters at end of day.
    pub rosters: Rosters,
}

/// Entity counts touched by [`DayCommitPatch::apply_to`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    /// Cities overwritten.
    pub cities: usize,
    /// Agents overwritten.
    pub agents: usize,
    /// Anomalies overwritten.
    pub anomalies: usize,
    /// Patch entries whose entity no longer exists in the target.
    pub missing: usize,
}

/// The set of after-values computed during planning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayCommitPatch {
    /// Money at end of day.
    pub money: i64,
    /// Global panic at end of day.
    pub panic: f32,
    /// Negentropy at end of day.
    pub negentropy: i64,
    /// Per-city final values.
    pub cities: BTreeMap<CityId, CityAfter>,
    /// Per-agent final values.
    pub agents: BTreeMap<AgentId, AgentAfter>,
    /// Per-anomaly final values.
    pub anomalies: BTreeMap<AnomalyId, AnomalyAfter>,
}

impl DayCommitPatch {
    /// Capture the final values of a shadow state.
    pub fn from_shadow(shadow: &WorldState) -> Self {
        let cities = shadow
            .cities()
            .iter()
            .map(|c| {
                (
                    c.id.clone(),
                    CityAfter {
                        population: c.population,
                    },
                )
            })
            .collect();

        let agents = shadow
            .agents()
            .iter()
            .map(|a| {
                (
                    a.id.clone(),
                    AgentAfter {
                        hp: a.hp,
                        sanity: a.sanity,
                        is_dead: a.is_dead,
                        is_insane: a.is_insane,
                        location: a.location.clone(),
                    },
                )
            })
            .collect();

        let anomalies = shadow
            .anomalies()
            .iter()
            .map(|a| {
                (
                    a.id.clone(),
                    AnomalyAfter {
                        phase: a.phase,
                        investigate_progress: a.investigate_progress,
                        contain_progress: a.contain_progress,
                        rosters: a.rosters.clone(),
                    },
                )
            })
            .collect();

        Self {
            money: shadow.money,
            panic: shadow.panic,
            negentropy: shadow.negentropy,
            cities,
            agents,
            anomalies,
        }
    }

    /// Overwrite the live state with the recorded after-values.
    ///
    /// Entries whose entity is missing from `state` are skipped and counted.
    pub fn apply_to(&self, state: &mut WorldState) -> ApplySummary {
        let mut summary = ApplySummary::default();

        state.money = self.money;
        state.panic = self.panic;
        state.negentropy = self.negentropy;

        for (id, after) in &self.cities {
            if let Some(city) = state.city_mut(id) {
                city.population = after.population;
                summary.cities = summary.cities.saturating_add(1);
            } else {
                warn!(city = %id, "patch entry for unknown city skipped");
                summary.missing = summary.missing.saturating_add(1);
            }
        }

        for (id, after) in &self.agents {
            if let Some(agent) = state.agent_mut(id) {
                agent.hp = after.hp;
                agent.sanity = after.sanity;
                agent.is_dead = after.is_dead;
                agent.is_insane = after.is_insane;
                agent.location = after.location.clone();
                summary.agents = summary.agents.saturating_add(1);
            } else {
                warn!(agent = %id, "patch entry for unknown agent skipped");
                summary.missing = summary.missing.saturating_add(1);
            }
        }

        for (id, after) in &self.anomalies {
            if let Some(anomaly) = state.anomaly_mut(id) {
                anomaly.phase = after.phase;
                anomaly.investigate_progress = after.investigate_progress;
                anomaly.contain_progress = after.contain_progress;
                anomaly.rosters = after.rosters.clone();
                summary.anomalies = summary.anomalies.saturating_add(1);
            } else {
                warn!(anomaly = %id, "patch entry for unknown anomaly skipped");
                summary.missing = summary.missing.saturating_add(1);
            }
        }

        summary
    }
}
