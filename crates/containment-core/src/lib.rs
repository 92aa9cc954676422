//! Day resolution, dispatch and orchestration for the Containment engine.
//!
//! This crate owns the day cycle: a day is resolved against a shadow copy
//! of the world into a replayable event log plus a patch, the patch is
//! committed, the day advances and new anomalies spawn.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `containment-config.yaml`.
//! - [`plan`] -- [`build_plan`] and the [`DayResolutionPlan`] it returns.
//! - [`dispatch`] -- Roster replacement and movement-transition enqueueing.
//! - [`movement`] -- One-at-a-time movement-transition consumption.
//! - [`session`] -- [`GameSession`]: plan, commit, end day.
//! - [`policy`] -- [`RosterPolicy`] implementations for unattended runs.
//! - [`runner`] -- Multi-day run loop with observers.

pub mod config;
pub mod dispatch;
pub mod movement;
pub mod plan;
pub mod policy;
pub mod runner;
pub mod session;

// Re-export primary types at crate root.
pub use config::{ConfigError, LoggingConfig, PlaybackConfig, SimulationConfig, WorldConfig};
pub use dispatch::{DispatchError, RosterChange, set_roster};
pub use movement::{consume_one_transition, drain_transitions, prune_completed};
pub use plan::{DayResolutionPlan, build_plan, hash_events};
pub use policy::{GreedyPolicy, IdlePolicy, RosterOrder, RosterPolicy};
pub use runner::{DayObserver, NoOpObserver, RunEndReason, RunResult, RunnerError, log_run_end, run_days};
pub use session::{DayOutcome, GameSession, SessionError};
