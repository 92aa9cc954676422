//! The day event log.
//!
//! A [`DayEvent`] is one observable occurrence during settlement. The log is
//! self-describing: every variant carries the before/after values a consumer
//! needs to render it, so playback never has to consult world state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{AnomalyPhase, AssignmentSlot};
use crate::geometry::MapPos;
use crate::ids::{AgentId, AnomalyId, CityId};

/// Difficulty class of every capability check: all four requirements met.
pub const CHECK_DIFFICULTY: u8 = 4;

/// One entry of a day's resolution log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DayEvent {
    /// Camera hint: settlement of this anomaly starts here.
    FocusAnomaly {
        /// Anomaly being settled.
        anomaly: AnomalyId,
        /// Where to look, if the anomaly position resolves.
        position: Option<MapPos>,
        /// Suggested camera zoom.
        zoom: f32,
        /// Suggested focus duration in seconds.
        duration: f32,
    },
    /// An operative's capability check against the current phase.
    AgentCheck {
        /// Anomaly being worked.
        anomaly: AnomalyId,
        /// Operative making the check.
        agent: AgentId,
        /// Roster slot being worked.
        slot: AssignmentSlot,
        /// Match count (0..=4).
        roll: u8,
        /// Always [`CHECK_DIFFICULTY`].
        dc: u8,
        /// Whether `roll >= dc`.
        success: bool,
        /// Localisation key describing the outcome.
        reason_key: String,
    },
    /// Phase progress changed.
    ProgressDelta {
        /// Anomaly whose progress moved.
        anomaly: AnomalyId,
        /// Phase the progress belongs to.
        phase: AnomalyPhase,
        /// Contributing operative, if any.
        agent: Option<AgentId>,
        /// Progress before the change.
        before: f32,
        /// Applied change (after clamping).
        delta: f32,
        /// Progress after the change.
        after: f32,
    },
    /// An operative's hit points reached zero for the first time.
    AgentKilled {
        /// Anomaly where it happened.
        anomaly: AnomalyId,
        /// The casualty.
        agent: AgentId,
        /// Localisation key describing the cause.
        reason_key: String,
    },
    /// An operative's sanity reached zero for the first time.
    AgentInsane {
        /// Anomaly where it happened.
        anomaly: AnomalyId,
        /// The casualty.
        agent: AgentId,
        /// Localisation key describing the cause.
        reason_key: String,
    },
    /// An anomaly lashed out at the surrounding area.
    AreaAttack {
        /// Attacking anomaly.
        anomaly: AnomalyId,
        /// Centre of the effect.
        origin: MapPos,
        /// Effect radius; zero means nearest city only.
        radius: f32,
    },
    /// An operated anomaly yielded negentropy.
    NegentropyBurst {
        /// Producing anomaly.
        anomaly: AnomalyId,
        /// Where to show the burst, if known.
        position: Option<MapPos>,
        /// Amount produced.
        amount: i64,
    },
    /// A city lost population to an area attack.
    CityPopulationLoss {
        /// Attacking anomaly.
        anomaly: AnomalyId,
        /// Affected city.
        city: CityId,
        /// Population before the loss.
        before: u32,
        /// Population removed.
        loss: u32,
        /// Population after the loss.
        after: u32,
        /// Distance from the attack origin to the city.
        distance: f32,
        /// Radius of the attack.
        radius: f32,
    },
    /// A city paid its daily taxes.
    CityMoneyBurst {
        /// Paying city.
        city: CityId,
        /// City position.
        position: MapPos,
        /// Amount paid.
        amount: i64,
    },
    /// Aggregate change of global resources over the day.
    ResourceDelta {
        /// Change in money.
        money: i64,
        /// Change in global panic.
        panic: f32,
        /// Change in negentropy.
        negentropy: i64,
    },
    /// An anomaly moved to its next phase.
    PhaseAdvanced {
        /// Advancing anomaly.
        anomaly: AnomalyId,
        /// Phase that was completed.
        from: AnomalyPhase,
        /// Phase that begins.
        to: AnomalyPhase,
    },
    /// The roster of a completed phase was sent home.
    RosterRecalled {
        /// Anomaly whose phase completed.
        anomaly: AnomalyId,
        /// Slot that was recalled.
        slot: AssignmentSlot,
        /// Recalled operatives in ascending id order.
        agents: Vec<AgentId>,
    },
    /// Settlement of one anomaly is finished.
    EndOfAnomaly {
        /// The anomaly.
        anomaly: AnomalyId,
    },
    /// The day is fully resolved. Always the last event.
    EndOfDay {
        /// Day that was resolved.
        day: u32,
    },
}

impl DayEvent {
    /// Snake-case kind tag, matching the serialized `kind` field.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::FocusAnomaly { .. } => "focus_anomaly",
            Self::AgentCheck { .. } => "agent_check",
            Self::ProgressDelta { .. } => "progress_delta",
            Self::AgentKilled { .. } => "agent_killed",
            Self::AgentInsane { .. } => "agent_insane",
            Self::AreaAttack { .. } => "area_attack",
            Self::NegentropyBurst { .. } => "negentropy_burst",
            Self::CityPopulationLoss { .. } => "city_population_loss",
            Self::CityMoneyBurst { .. } => "city_money_burst",
            Self::ResourceDelta { .. } => "resource_delta",
            Self::PhaseAdvanced { .. } => "phase_advanced",
            Self::RosterRecalled { .. } => "roster_recalled",
            Self::EndOfAnomaly { .. } => "end_of_anomaly",
            Self::EndOfDay { .. } => "end_of_day",
        }
    }

    /// The anomaly this event concerns, if any.
    pub const fn anomaly(&self) -> Option<&AnomalyId> {
        match self {
            Self::FocusAnomaly { anomaly, .. }
            | Self::AgentCheck { anomaly, .. }
            | Self::ProgressDelta { anomaly, .. }
            | Self::AgentKilled { anomaly, .. }
            | Self::AgentInsane { anomaly, .. }
            | Self::AreaAttack { anomaly, .. }
            | Self::NegentropyBurst { anomaly, .. }
            | Self::CityPopulationLoss { anomaly, .. }
            | Self::PhaseAdvanced { anomaly, .. }
            | Self::RosterRecalled { anomaly, .. }
            | Self::EndOfAnomaly { anomaly } => Some(anomaly),
            Self::CityMoneyBurst { .. } | Self::ResourceDelta { .. } | Self::EndOfDay { .. } => {
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn serialized_tag_matches_kind() {
        let events = [
            DayEvent::EndOfDay { day: 3 },
            DayEvent::PhaseAdvanced {
                anomaly: AnomalyId::from("AN_001_0001_x"),
                from: AnomalyPhase::Investigate,
                to: AnomalyPhase::Contain,
            },
            DayEvent::ResourceDelta {
                money: 10,
                panic: 0.0,
                negentropy: 0,
            },
        ];
        for event in &events {
            let value = serde_json::to_value(event).unwrap();
            assert_eq!(value["kind"], event.kind());
        }
    }

    #[test]
    fn event_round_trips_through_json() {
        let event = DayEvent::RosterRecalled {
            anomaly: AnomalyId::from("AN_001_0001_x"),
            slot: AssignmentSlot::Investigate,
            agents: vec![AgentId::from("A1"), AgentId::from("A2")],
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: DayEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }

    #[test]
    fn global_events_have_no_anomaly() {
        assert!(DayEvent::EndOfDay { day: 1 }.anomaly().is_none());
        let id = AnomalyId::from("AN_1");
        let end = DayEvent::EndOfAnomaly {
            anomaly: id.clone(),
        };
        assert_eq!(end.anomaly(), Some(&id));
    }
}
