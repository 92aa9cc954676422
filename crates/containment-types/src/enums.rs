//! Enumeration types for the Containment engine.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::AnomalyId;

// ---------------------------------------------------------------------------
// Anomaly lifecycle
// ---------------------------------------------------------------------------

/// Lifecycle stage of an anomaly instance.
///
/// Phases only ever advance `Investigate -> Contain -> Operate`; the derived
/// ordering follows that sequence, so `a < b` means `a` comes earlier.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum AnomalyPhase {
    /// Operatives are gathering information about the anomaly.
    #[default]
    Investigate,
    /// Operatives are working to contain the anomaly.
    Contain,
    /// The anomaly is contained and managed; terminal for this engine.
    Operate,
}

impl AnomalyPhase {
    /// The phase that follows this one, or `None` for [`AnomalyPhase::Operate`].
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Investigate => Some(Self::Contain),
            Self::Contain => Some(Self::Operate),
            Self::Operate => None,
        }
    }

    /// The roster slot that works this phase.
    pub const fn slot(self) -> AssignmentSlot {
        match self {
            Self::Investigate => AssignmentSlot::Investigate,
            Self::Contain => AssignmentSlot::Contain,
            Self::Operate => AssignmentSlot::Operate,
        }
    }
}

/// One of the three exclusive rosters on an anomaly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum AssignmentSlot {
    /// Investigation team.
    Investigate,
    /// Containment team.
    Contain,
    /// Long-term management team.
    Operate,
}

impl AssignmentSlot {
    /// All slots in canonical order.
    pub const ALL: [Self; 3] = [Self::Investigate, Self::Contain, Self::Operate];

    /// Short lowercase label, used in logs.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Investigate => "investigate",
            Self::Contain => "contain",
            Self::Operate => "operate",
        }
    }
}

// ---------------------------------------------------------------------------
// Agents
// ---------------------------------------------------------------------------

/// Where an operative currently is.
///
/// The anomaly/slot association exists exactly when the agent is off-base,
/// so a base agent can never carry a stale assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(tag = "kind")]
pub enum AgentLocation {
    /// At headquarters, available for assignment and recovering.
    #[default]
    Base,
    /// Dispatched and on the way to an anomaly.
    TravellingToAnomaly {
        /// Destination anomaly.
        anomaly: AnomalyId,
        /// Roster slot the agent will work.
        slot: AssignmentSlot,
    },
    /// Physically present at an anomaly.
    AtAnomaly {
        /// Anomaly the agent is working.
        anomaly: AnomalyId,
        /// Roster slot the agent is working.
        slot: AssignmentSlot,
    },
    /// Recalled and on the way home.
    TravellingToBase {
        /// Anomaly the agent is leaving.
        anomaly: AnomalyId,
        /// Roster slot the agent was working.
        slot: AssignmentSlot,
    },
}

impl AgentLocation {
    /// The anomaly this location refers to, if off-base.
    pub const fn anomaly(&self) -> Option<&AnomalyId> {
        match self {
            Self::Base => None,
            Self::TravellingToAnomaly { anomaly, .. }
            | Self::AtAnomaly { anomaly, .. }
            | Self::TravellingToBase { anomaly, .. } => Some(anomaly),
        }
    }

    /// The roster slot this location refers to, if off-base.
    pub const fn slot(&self) -> Option<AssignmentSlot> {
        match self {
            Self::Base => None,
            Self::TravellingToAnomaly { slot, .. }
            | Self::AtAnomaly { slot, .. }
            | Self::TravellingToBase { slot, .. } => Some(*slot),
        }
    }

    /// Whether the agent is physically present at the given anomaly.
    pub fn is_at(&self, anomaly: &AnomalyId) -> bool {
        matches!(self, Self::AtAnomaly { anomaly: a, .. } if a == anomaly)
    }

    /// Whether the agent is at, or travelling to, the given anomaly and slot.
    pub fn is_assigned_to(&self, anomaly: &AnomalyId, slot: AssignmentSlot) -> bool {
        match self {
            Self::AtAnomaly { anomaly: a, slot: s }
            | Self::TravellingToAnomaly { anomaly: a, slot: s } => a == anomaly && *s == slot,
            Self::Base | Self::TravellingToBase { .. } => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Cities
// ---------------------------------------------------------------------------

/// Kind of city on the world map.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum CityKind {
    /// The player's headquarters. Pays no taxes, never spawns anomalies.
    Base,
    /// A regular city.
    #[default]
    Ordinary,
}

// ---------------------------------------------------------------------------
// Movement transitions
// ---------------------------------------------------------------------------

/// Direction of a movement transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum TransitionDirection {
    /// Base to anomaly.
    Dispatch,
    /// Anomaly to base.
    Recall,
}

/// Lifecycle state of a movement transition.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export, export_to = "bindings/")]
pub enum TransitionState {
    /// Queued, not yet picked up by the consumer.
    #[default]
    Pending,
    /// Picked up; the landing effect is being applied.
    Playing,
    /// Landing effect applied.
    Completed,
}
