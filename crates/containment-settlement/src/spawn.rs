//! Daily anomaly spawning.
//!
//! Each day the content schedule asks for a number of new anomalies. A
//! definition is drawn uniformly from the sorted definition ids and a host
//! city uniformly from the unlocked ordinary cities. Definitions that are
//! already active, or already discovered somewhere, are skipped. Attempts
//! are capped so an exhausted pool cannot loop forever.

use containment_types::{AnomalyDefId, AnomalyId, CityId, MapPos};
use containment_world::{AnomalyInstance, WorldState};
use rand::Rng;
use tracing::{info, warn};

use crate::content::ContentRegistry;

/// Outcome of one day's spawn pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpawnReport {
    /// Day the spawn ran for.
    pub day: u32,
    /// Quota requested by the schedule.
    pub requested: u32,
    /// Anomalies actually created.
    pub spawned: u32,
    /// Draws made.
    pub attempts: u32,
    /// Ids of the created instances, in creation order.
    pub created: Vec<AnomalyId>,
    /// Set when the quota could not be met.
    pub warning: Option<String>,
}

/// Replace every character outside `[A-Za-z0-9]` with `_`.
pub fn sanitize_key(raw: &str) -> String {
    if raw.is_empty() {
        return "NULL".to_owned();
    }
    raw.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Deterministic instance id: `AN_{day:03}_{seq:04}_{sanitized def}`.
pub fn instance_id(day: u32, seq: u64, def: &AnomalyDefId) -> AnomalyId {
    AnomalyId::new(format!("AN_{day:03}_{seq:04}_{}", sanitize_key(def.as_str())))
}

fn already_present(state: &WorldState, def: &AnomalyDefId) -> bool {
    state
        .anomalies()
        .iter()
        .any(|a| a.def_id.as_str().eq_ignore_ascii_case(def.as_str()))
        || state
            .cities()
            .iter()
            .any(|c| {
                c.discovered
                    .iter()
                    .any(|d| d.as_str().eq_ignore_ascii_case(def.as_str()))
            })
}

/// Spawn the scheduled anomalies for the state's current day.
pub fn spawn_scheduled<R: Rng + ?Sized>(
    state: &mut WorldState,
    registry: &dyn ContentRegistry,
    rng: &mut R,
) -> SpawnReport {
    let day = state.day;
    let requested = registry.spawn_quota(day);
    let mut report = SpawnReport {
        day,
        requested,
        ..SpawnReport::default()
    };
    if requested == 0 {
        return report;
    }

    let mut hosts: Vec<(CityId, MapPos)> = state
        .cities()
        .iter()
        .filter(|c| c.unlocked && c.is_ordinary())
        .map(|c| (c.id.clone(), c.position))
        .collect();
    hosts.sort_by(|a, b| a.0.cmp(&b.0));
    if hosts.is_empty() {
        let message = format!("day {day}: no unlocked ordinary city, spawn skipped");
        warn!(day, requested, "{message}");
        report.warning = Some(message);
        return report;
    }

    let defs = registry.anomaly_ids();
    let max_attempts = requested.saturating_mul(6).max(10);

    while report.spawned < requested && report.attempts < max_attempts {
        report.attempts = report.attempts.saturating_add(1);

        let Some(def) = defs.get(rng.random_range(0..defs.len().max(1))) else {
            break;
        };
        if already_present(state, def) {
            continue;
        }
        let Some((city, position)) = hosts.get(rng.random_range(0..hosts.len())).cloned() else {
            continue;
        };

        let seq = state.allocate_spawn_seq();
        let id = instance_id(day, seq, def);
        let mut anomaly = AnomalyInstance::new(id.clone(), def.clone(), city.clone(), day, seq);
        anomaly.position = Some(position);
        if let Err(err) = state.add_anomaly(anomaly) {
            warn!(day, %err, "Spawned anomaly rejected");
            continue;
        }
        info!(day, anomaly = %id, def = %def, city = %city, "Anomaly spawned");
        report.spawned = report.spawned.saturating_add(1);
        report.created.push(id);
    }

    if report.spawned < requested {
        let message = format!(
            "day {day}: requested {requested}, spawned {}, attempts {}",
            report.spawned, report.attempts
        );
        warn!(day, requested, spawned = report.spawned, "Spawn quota not met");
        report.warning = Some(message);
    }
    report
}
