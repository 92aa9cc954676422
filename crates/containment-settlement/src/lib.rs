//! Daily settlement systems for the Containment day-resolution engine.
//!
//! Every system operates on a [`WorldState`] passed in explicitly (during
//! planning, the shadow copy) and reports what happened through an
//! [`EventSink`]. Content is read through the [`ContentRegistry`] trait.
//!
//! # Modules
//!
//! - [`content`] -- Content registry trait, anomaly definitions, balance
//! - [`sink`] -- Event sink trait
//! - [`util`] -- Match counts, progress and damage tables, roster queries
//! - [`work`] -- Anomaly work: checks, progress, damage, casualties
//! - [`behavior`] -- Area effects on nearby cities
//! - [`economy`] -- City taxes
//! - [`recovery`] -- Healing at headquarters
//! - [`cleanup`] -- Progress clamping and roster hygiene
//! - [`recall`] -- Phase completion and roster recall
//! - [`spawn`] -- Scheduled anomaly spawning
//!
//! [`WorldState`]: containment_world::WorldState

pub mod behavior;
pub mod cleanup;
pub mod content;
pub mod economy;
pub mod recall;
pub mod recovery;
pub mod sink;
pub mod spawn;
pub mod util;
pub mod work;

#[cfg(test)]
mod testing;

// Re-export primary types at crate root.
pub use behavior::{AreaEffectReport, apply_area_effect};
pub use cleanup::{CleanupReport, apply_cleanup};
pub use content::{AnomalyDef, Balance, ContentError, ContentRegistry, ContentTable, PhaseDef};
pub use economy::apply_city_economy;
pub use recall::{PhaseTransition, apply_phase_recall};
pub use recovery::apply_base_recovery;
pub use sink::{EventSink, NullSink};
pub use spawn::{SpawnReport, instance_id, spawn_scheduled};
pub use work::{WorkReport, apply_anomaly_work};
