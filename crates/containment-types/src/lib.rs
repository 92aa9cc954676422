//! Shared type definitions for the Containment day-resolution engine.
//!
//! This crate is the single source of truth for the identifiers, enums and
//! event types used across the workspace. Presentation-facing types are
//! exported to `TypeScript` via `ts-rs` for the playback client.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe identifier wrappers
//! - [`enums`] -- Phases, roster slots, agent locations, transition states
//! - [`geometry`] -- Map positions and distances
//! - [`structs`] -- Attribute scores and bounded vitals
//! - [`events`] -- The closed [`DayEvent`] variant emitted during settlement

pub mod enums;
pub mod events;
pub mod geometry;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    AgentLocation, AnomalyPhase, AssignmentSlot, CityKind, TransitionDirection,
    TransitionState,
};
pub use events::{CHECK_DIFFICULTY, DayEvent};
pub use geometry::MapPos;
pub use ids::{AgentId, AnomalyDefId, AnomalyId, CityId, TransitionId};
pub use structs::{Attributes, Vital};
