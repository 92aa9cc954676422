//! Error types for the `containment-world` crate.

use containment_types::{AgentId, AnomalyId, CityId};

/// Errors raised by structural changes to a [`WorldState`].
///
/// [`WorldState`]: crate::state::WorldState
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A city with this id is already present.
    #[error("duplicate city id: {0}")]
    DuplicateCity(CityId),

    /// An agent with this id is already present.
    #[error("duplicate agent id: {0}")]
    DuplicateAgent(AgentId),

    /// An anomaly instance with this id is already present.
    #[error("duplicate anomaly id: {0}")]
    DuplicateAnomaly(AnomalyId),

    /// An entity was inserted with an empty identifier.
    #[error("{kind} id must not be empty")]
    EmptyId {
        /// Which kind of entity was rejected.
        kind: &'static str,
    },
}
