//! End-of-settlement housekeeping.
//!
//! Clamps progress back into `[0, 1]` and drops roster entries that no
//! longer resolve to an agent. Phase transitions belong to the recall
//! system and are never made here.

use std::collections::BTreeSet;

use containment_types::{AgentId, AnomalyPhase, AssignmentSlot};
use containment_world::WorldState;
use tracing::{debug, warn};

/// What cleanup changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Progress values that were out of range.
    pub clamped: usize,
    /// Roster entries removed.
    pub dropped: usize,
}

fn clamp_progress(value: &mut f32) -> bool {
    if value.is_nan() {
        *value = 0.0;
        return true;
    }
    let fixed = value.clamp(0.0, 1.0);
    let changed = (fixed - *value).abs() > 0.0;
    *value = fixed;
    changed
}

/// Run cleanup over every anomaly.
pub fn apply_cleanup(state: &mut WorldState) -> CleanupReport {
    let mut report = CleanupReport::default();
    let known: BTreeSet<AgentId> = state.agents().iter().map(|a| a.id.clone()).collect();

    for anomaly in state.anomalies_mut() {
        for phase in [AnomalyPhase::Investigate, AnomalyPhase::Contain] {
            if anomaly.progress_mut(phase).is_some_and(clamp_progress) {
                report.clamped = report.clamped.saturating_add(1);
            }
        }

        for slot in AssignmentSlot::ALL {
            let roster = anomaly.rosters.get_mut(slot);
            let before = roster.len();
            roster.retain(|id| !id.is_empty() && known.contains(id));
            let dropped = before.saturating_sub(roster.len());
            if dropped > 0 {
                warn!(anomaly = %anomaly.id, ?slot, dropped, "Dropped unknown roster entries");
                report.dropped = report.dropped.saturating_add(dropped);
            }
        }
    }

    debug!(clamped = report.clamped, dropped = report.dropped, "Cleanup settled");
    report
}
