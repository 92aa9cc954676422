//! World state for the Containment day-resolution engine.
//!
//! # Modules
//!
//! - [`state`] -- [`WorldState`] aggregate with cities, agents, anomalies and
//!   movement transitions.
//! - [`index`] -- Derived id-to-position cache, rebuilt on structural change.
//! - [`patch`] -- [`DayCommitPatch`] after-values and idempotent application.
//! - [`starting_world`] -- Default map and squad for a new game.
//! - [`error`] -- Error types for structural changes.

pub mod error;
pub mod index;
pub mod patch;
pub mod starting_world;
pub mod state;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use index::WorldIndex;
pub use patch::{AgentAfter, AnomalyAfter, ApplySummary, CityAfter, DayCommitPatch};
pub use starting_world::{BASE_CITY_ID, StartingResources, create_starting_world};
pub use state::{
    AgentEntity, AnomalyInstance, CityEntity, ImpactOutcome, MovementTransition, Rosters,
    WorldState,
};
