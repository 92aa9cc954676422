//! Anomaly work: turns a roster into phase progress and agent harm.
//!
//! Only roster members of the current phase's slot who are physically at
//! the anomaly and alive take part, in ascending id order. Each one makes a
//! capability check, contributes progress by match count, and takes damage
//! scaled by how many requirements they missed.

use containment_types::{AnomalyId, AnomalyPhase, CHECK_DIFFICULTY, DayEvent};
use containment_world::WorldState;
use tracing::debug;

use crate::content::ContentRegistry;
use crate::sink::EventSink;
use crate::util::{
    PROGRESS_EPSILON, anomaly_position, arrived_workers, find_anomaly, match_count,
    progress_contribution, resolve_def, scaled_damage,
};

/// What one anomaly's work pass did.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WorkReport {
    /// Agents that took part.
    pub workers: usize,
    /// Total progress applied after clamping.
    pub progress: f32,
    /// Agents killed or driven insane.
    pub casualties: usize,
    /// Negentropy produced.
    pub negentropy: i64,
}

const fn check_reason(matches: u8) -> &'static str {
    match matches {
        4.. => "check.success",
        1..=3 => "check.partial",
        0 => "check.fail",
    }
}

const fn casualty_reason(phase: AnomalyPhase, killed: bool) -> &'static str {
    match (phase, killed) {
        (AnomalyPhase::Investigate, true) => "casualty.killed.investigate",
        (AnomalyPhase::Contain, true) => "casualty.killed.contain",
        (AnomalyPhase::Operate, true) => "casualty.killed.operate",
        (AnomalyPhase::Investigate, false) => "casualty.insane.investigate",
        (AnomalyPhase::Contain, false) => "casualty.insane.contain",
        (AnomalyPhase::Operate, false) => "casualty.insane.operate",
    }
}

/// Run one day of work at `anomaly_id`.
pub fn apply_anomaly_work(
    state: &mut WorldState,
    anomaly_id: &AnomalyId,
    registry: &dyn ContentRegistry,
    sink: &mut dyn EventSink,
) -> WorkReport {
    let mut report = WorkReport::default();

    let Some(anomaly) = find_anomaly(state, anomaly_id) else {
        return report;
    };
    let phase = anomaly.phase;
    let slot = phase.slot();
    let def = resolve_def(registry, anomaly);
    let phase_def = *def.phase(phase);
    let position = anomaly_position(state, anomaly);
    let workers = arrived_workers(state, anomaly, slot);
    report.workers = workers.len();

    for agent_id in &workers {
        let Some(agent) = state.agent_mut(agent_id) else {
            continue;
        };
        let matches = match_count(&agent.attributes, &phase_def.requirements);
        let hp_damage = scaled_damage(phase_def.hp_damage, matches);
        let sanity_damage = scaled_damage(phase_def.sanity_damage, matches);
        let outcome = agent.apply_impact(hp_damage, sanity_damage);

        sink.emit(DayEvent::AgentCheck {
            anomaly: anomaly_id.clone(),
            agent: agent_id.clone(),
            slot,
            roll: matches,
            dc: CHECK_DIFFICULTY,
            success: matches >= CHECK_DIFFICULTY,
            reason_key: check_reason(matches).to_owned(),
        });

        if let Some(progress) = state
            .anomaly_mut(anomaly_id)
            .and_then(|a| a.progress_mut(phase))
        {
            let before = *progress;
            let mut after = (before + progress_contribution(matches)).clamp(0.0, 1.0);
            if after >= 1.0 - PROGRESS_EPSILON {
                after = 1.0;
            }
            *progress = after;
            let delta = after - before;
            if delta > 0.0 {
                report.progress += delta;
                sink.emit(DayEvent::ProgressDelta {
                    anomaly: anomaly_id.clone(),
                    phase,
                    agent: Some(agent_id.clone()),
                    before,
                    delta,
                    after,
                });
            }
        }

        if outcome.killed {
            report.casualties = report.casualties.saturating_add(1);
            sink.emit(DayEvent::AgentKilled {
                anomaly: anomaly_id.clone(),
                agent: agent_id.clone(),
                reason_key: casualty_reason(phase, true).to_owned(),
            });
        }
        if outcome.went_insane {
            report.casualties = report.casualties.saturating_add(1);
            sink.emit(DayEvent::AgentInsane {
                anomaly: anomaly_id.clone(),
                agent: agent_id.clone(),
                reason_key: casualty_reason(phase, false).to_owned(),
            });
        }

        debug!(
            anomaly = %anomaly_id,
            agent = %agent_id,
            matches,
            hp_damage,
            sanity_damage,
            "Agent worked"
        );
    }

    if phase == AnomalyPhase::Operate && !workers.is_empty() && def.negentropy_per_day > 0 {
        let amount = def.negentropy_per_day;
        state.negentropy = state.negentropy.saturating_add(amount);
        report.negentropy = amount;
        sink.emit(DayEvent::NegentropyBurst {
            anomaly: anomaly_id.clone(),
            position,
            amount,
        });
    }

    debug!(
        anomaly = %anomaly_id,
        ?phase,
        workers = report.workers,
        progress = report.progress,
        casualties = report.casualties,
        "Anomaly work settled"
    );
    report
}
