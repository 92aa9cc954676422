//! Multi-day run loop.
//!
//! [`run_days`] drives a [`GameSession`] day after day without a player:
//!
//! - **Rosters**: a [`RosterPolicy`] issues roster orders each morning
//! - **Movement**: every queued transition is landed before the day ends
//! - **Observation**: a [`DayObserver`] sees each landing and each day
//! - **Termination**: stop after `max_days` or when no capable agent is left

use containment_world::{MovementTransition, WorldState};
use tracing::{debug, info};

use crate::dispatch::DispatchError;
use crate::policy::RosterPolicy;
use crate::session::{DayOutcome, GameSession, SessionError};

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A policy order could not be applied.
    #[error("dispatch error: {source}")]
    Dispatch {
        /// The underlying dispatch error.
        #[from]
        source: DispatchError,
    },

    /// The session refused to end a day.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: SessionError,
    },
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEndReason {
    /// The configured number of days was played.
    MaxDaysReached,
    /// Every agent is dead or insane.
    NoCapableAgents,
}

/// Result of a run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Why the run stopped.
    pub end_reason: RunEndReason,
    /// Days resolved by this run.
    pub days_run: u32,
    /// Day number of the last resolved day, if any.
    pub last_day: Option<u32>,
    /// Event hash of the last resolved day, if any.
    pub last_hash: Option<String>,
}

/// Callback invoked as the run progresses.
pub trait DayObserver {
    /// Called for each movement transition as it lands.
    fn on_transition(&mut self, _transition: &MovementTransition) {}

    /// Called after each day is committed and the next day's anomalies
    /// spawned.
    fn on_day(&mut self, outcome: &DayOutcome, state: &WorldState);
}

/// An observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpObserver;

impl DayObserver for NoOpObserver {
    fn on_day(&mut self, _outcome: &DayOutcome, _state: &WorldState) {}
}

fn capable_agents(state: &WorldState) -> usize {
    state.agents().iter().filter(|a| a.is_capable()).count()
}

/// Play days until a termination condition is met.
///
/// `max_days` of zero means no day limit; the run then only ends when no
/// capable agent remains.
///
/// # Errors
///
/// Returns [`RunnerError`] if a policy order is rejected or the session
/// refuses to end a day.
pub fn run_days(
    session: &mut GameSession,
    policy: &mut dyn RosterPolicy,
    observer: &mut dyn DayObserver,
    max_days: u32,
) -> Result<RunResult, RunnerError> {
    let mut days_run: u32 = 0;
    let mut last: Option<(u32, String)> = None;

    info!(
        start_day = session.state().day,
        max_days,
        agents = session.state().agents().len(),
        "Run starting"
    );

    let end_reason = loop {
        if max_days > 0 && days_run >= max_days {
            info!(days_run, "Day limit reached");
            break RunEndReason::MaxDaysReached;
        }
        if capable_agents(session.state()) == 0 {
            info!(day = session.state().day, "No capable agents left");
            break RunEndReason::NoCapableAgents;
        }

        let orders = policy.plan_rosters(session.state(), session.content());
        for order in orders {
            let change = session.set_roster(order.anomaly.as_str(), order.slot, &order.agents)?;
            debug!(
                anomaly = %change.anomaly,
                added = change.added.len(),
                removed = change.removed.len(),
                "Policy order applied"
            );
        }

        for landed in session.drain_transitions() {
            observer.on_transition(&landed);
        }

        let outcome = session.end_day()?;
        observer.on_day(&outcome, session.state());

        days_run = days_run.saturating_add(1);
        last = Some((outcome.plan.day, outcome.plan.events_hash));
    };

    let (last_day, last_hash) = match last {
        Some((day, hash)) => (Some(day), Some(hash)),
        None => (None, None),
    };
    Ok(RunResult {
        end_reason,
        days_run,
        last_day,
        last_hash,
    })
}

/// Log the end of a run together with the survivors.
pub fn log_run_end(result: &RunResult, state: &WorldState) {
    let dead = state.agents().iter().filter(|a| a.is_dead).count();
    info!(
        reason = ?result.end_reason,
        days_run = result.days_run,
        last_day = result.last_day,
        last_hash = result.last_hash.as_deref(),
        money = state.money,
        negentropy = state.negentropy,
        anomalies = state.anomalies().len(),
        capable = capable_agents(state),
        dead,
        "Run ended"
    );
}
