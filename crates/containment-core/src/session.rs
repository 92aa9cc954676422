//! Game session: the live world plus everything needed to advance it.
//!
//! A [`GameSession`] owns the authoritative [`WorldState`], the content
//! registry, the seeded spawn RNG and the playback tuning. The day cycle is
//! `plan_day -> commit -> advance day -> spawn`; [`GameSession::end_day`]
//! performs all four and refuses while movement transitions are still
//! playing.

use containment_settlement::{ContentRegistry, SpawnReport, spawn_scheduled};
use containment_types::{AgentId, AssignmentSlot};
use containment_world::{
    ApplySummary, MovementTransition, WorldError, WorldState, create_starting_world,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{info, warn};

use crate::config::{PlaybackConfig, SimulationConfig};
use crate::dispatch::{self, DispatchError, RosterChange};
use crate::movement;
use crate::plan::{self, DayResolutionPlan};

/// Errors returned by session operations. The live state is untouched.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The plan was built for a different day than the live state's.
    #[error("stale plan: built for day {plan_day}, live state is on day {current_day}")]
    StalePlan {
        /// Day the plan resolved.
        plan_day: u32,
        /// Day of the live state.
        current_day: u32,
    },

    /// Movement transitions are still playing.
    #[error("{pending} movement transition(s) still pending")]
    TransitionsPending {
        /// Current lock count.
        pending: u32,
    },

    /// The starting world could not be built.
    #[error("world error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

/// Everything produced by one [`GameSession::end_day`].
#[derive(Debug, Clone)]
pub struct DayOutcome {
    /// The resolved and committed plan.
    pub plan: DayResolutionPlan,
    /// What the patch overwrote.
    pub applied: ApplySummary,
    /// Anomalies spawned for the following day.
    pub spawn: SpawnReport,
}

/// Live game state plus content, RNG and tuning.
pub struct GameSession {
    state: WorldState,
    content: Box<dyn ContentRegistry>,
    rng: StdRng,
    playback: PlaybackConfig,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("day", &self.state.day)
            .field("anomalies", &self.state.anomalies().len())
            .field("transition_lock", &self.state.transition_lock())
            .finish_non_exhaustive()
    }
}

impl GameSession {
    /// Wrap an existing world.
    pub fn new(
        state: WorldState,
        content: Box<dyn ContentRegistry>,
        seed: u64,
        playback: PlaybackConfig,
    ) -> Self {
        Self {
            state,
            content,
            rng: StdRng::seed_from_u64(seed),
            playback,
        }
    }

    /// Start a new game from the starting world and spawn day one's
    /// anomalies.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::World`] if the starting world is malformed.
    pub fn start(
        config: &SimulationConfig,
        content: Box<dyn ContentRegistry>,
    ) -> Result<(Self, SpawnReport), SessionError> {
        let state = create_starting_world(content.balance().starting)?;
        let mut session = Self::new(state, content, config.world.seed, config.playback);
        let spawn = spawn_scheduled(&mut session.state, session.content.as_ref(), &mut session.rng);
        info!(
            name = %config.world.name,
            seed = config.world.seed,
            spawned = spawn.spawned,
            "Game session started"
        );
        Ok((session, spawn))
    }

    /// The live world.
    pub const fn state(&self) -> &WorldState {
        &self.state
    }

    /// The content registry.
    pub fn content(&self) -> &dyn ContentRegistry {
        self.content.as_ref()
    }

    /// Playback tuning.
    pub const fn playback(&self) -> &PlaybackConfig {
        &self.playback
    }

    /// Resolve the current day without mutating the live state.
    pub fn plan_day(&self) -> DayResolutionPlan {
        plan::build_plan(&self.state, self.content.as_ref(), &self.playback)
    }

    /// Apply a plan's patch to the live state.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TransitionsPending`] while any movement
    /// transition has not been consumed, and [`SessionError::StalePlan`] if
    /// the plan was built for another day.
    pub fn commit(&mut self, plan: &DayResolutionPlan) -> Result<ApplySummary, SessionError> {
        let pending = self.state.transition_lock();
        if pending > 0 {
            return Err(SessionError::TransitionsPending { pending });
        }
        if plan.day != self.state.day {
            return Err(SessionError::StalePlan {
                plan_day: plan.day,
                current_day: self.state.day,
            });
        }
        let applied = plan.patch.apply_to(&mut self.state);
        if applied.missing > 0 {
            warn!(day = plan.day, missing = applied.missing, "Patch referenced unknown entities");
        }
        Ok(applied)
    }

    /// Plan, commit, advance the day and spawn the next day's anomalies.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::TransitionsPending`] while any movement
    /// transition has not been consumed.
    pub fn end_day(&mut self) -> Result<DayOutcome, SessionError> {
        let pending = self.state.transition_lock();
        if pending > 0 {
            return Err(SessionError::TransitionsPending { pending });
        }

        let plan = self.plan_day();
        let applied = self.commit(&plan)?;

        self.state.day = self.state.day.saturating_add(1);
        let spawn = spawn_scheduled(&mut self.state, self.content.as_ref(), &mut self.rng);

        info!(
            day = plan.day,
            next_day = self.state.day,
            events = plan.events.len(),
            money = self.state.money,
            negentropy = self.state.negentropy,
            spawned = spawn.spawned,
            "Day ended"
        );
        Ok(DayOutcome {
            plan,
            applied,
            spawn,
        })
    }

    /// Replace one roster slot of an anomaly.
    ///
    /// # Errors
    ///
    /// See [`dispatch::set_roster`].
    pub fn set_roster(
        &mut self,
        anomaly_key: &str,
        slot: AssignmentSlot,
        agents: &[AgentId],
    ) -> Result<RosterChange, DispatchError> {
        dispatch::set_roster(&mut self.state, anomaly_key, slot, agents)
    }

    /// Land the oldest pending movement transition.
    pub fn consume_one_transition(&mut self) -> Option<MovementTransition> {
        movement::consume_one_transition(&mut self.state)
    }

    /// Land every pending movement transition.
    pub fn drain_transitions(&mut self) -> Vec<MovementTransition> {
        movement::drain_transitions(&mut self.state)
    }
}
