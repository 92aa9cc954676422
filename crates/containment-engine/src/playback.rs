//! Playback driver.
//!
//! The simulation never waits on presentation. [`ChannelObserver`] forwards
//! each landed movement transition and each committed day plan over an
//! unbounded channel; the driver task replays them at its own pace and
//! reports what it saw when the channel closes.

use std::time::Duration;

use containment_core::{DayObserver, DayOutcome, DayResolutionPlan, PlaybackConfig};
use containment_types::DayEvent;
use containment_world::{MovementTransition, WorldState};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Message from the simulation to the playback driver.
#[derive(Debug, Clone)]
pub enum PlaybackMessage {
    /// A movement transition landed.
    Transition(MovementTransition),
    /// A day was committed.
    Day(Box<DayResolutionPlan>),
}

/// Totals reported by the driver once the channel closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackStats {
    /// Days replayed.
    pub days: u32,
    /// Events replayed.
    pub events: u64,
    /// Movement transitions animated.
    pub transitions: u64,
    /// Day plans whose hash did not match their event log.
    pub hash_mismatches: u32,
}

/// Spawn the driver task and return the sending half of its channel.
pub fn spawn_driver(
    config: PlaybackConfig,
) -> (mpsc::UnboundedSender<PlaybackMessage>, JoinHandle<PlaybackStats>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let handle = tokio::spawn(drive(rx, config));
    (tx, handle)
}

async fn drive(
    mut rx: mpsc::UnboundedReceiver<PlaybackMessage>,
    config: PlaybackConfig,
) -> PlaybackStats {
    let mut stats = PlaybackStats::default();
    let pacing = Duration::from_millis(config.event_pacing_ms);

    while let Some(message) = rx.recv().await {
        match message {
            PlaybackMessage::Transition(token) => {
                stats.transitions = stats.transitions.saturating_add(1);
                debug!(
                    agent = %token.agent,
                    anomaly = %token.anomaly,
                    direction = ?token.direction,
                    "Playing movement"
                );
            }
            PlaybackMessage::Day(plan) => {
                if containment_core::hash_events(&plan.events) != plan.events_hash {
                    warn!(day = plan.day, "Event log does not match its hash");
                    stats.hash_mismatches = stats.hash_mismatches.saturating_add(1);
                }
                for event in &plan.events {
                    replay_event(event);
                    stats.events = stats.events.saturating_add(1);
                    if !pacing.is_zero() {
                        tokio::time::sleep(pacing).await;
                    }
                }
                stats.days = stats.days.saturating_add(1);
            }
        }
    }

    info!(
        days = stats.days,
        events = stats.events,
        transitions = stats.transitions,
        "Playback finished"
    );
    stats
}

fn replay_event(event: &DayEvent) {
    match event {
        DayEvent::AgentKilled { agent, anomaly, .. } => {
            info!(%agent, %anomaly, "Agent killed");
        }
        DayEvent::AgentInsane { agent, anomaly, .. } => {
            info!(%agent, %anomaly, "Agent lost their mind");
        }
        DayEvent::PhaseAdvanced { anomaly, from, to } => {
            info!(%anomaly, ?from, ?to, "Anomaly phase advanced");
        }
        DayEvent::CityPopulationLoss {
            city, loss, after, ..
        } => {
            info!(%city, loss, after, "City lost population");
        }
        DayEvent::EndOfDay { day } => {
            debug!(day, "End of day replayed");
        }
        other => debug!(kind = other.kind(), "Event replayed"),
    }
}

/// Day observer that forwards everything to the playback driver.
#[derive(Debug)]
pub struct ChannelObserver {
    tx: mpsc::UnboundedSender<PlaybackMessage>,
}

impl ChannelObserver {
    /// Wrap the driver's sender.
    pub const fn new(tx: mpsc::UnboundedSender<PlaybackMessage>) -> Self {
        Self { tx }
    }

    fn send(&self, message: PlaybackMessage) {
        if self.tx.send(message).is_err() {
            warn!("Playback driver is gone, message dropped");
        }
    }
}

impl DayObserver for ChannelObserver {
    fn on_transition(&mut self, transition: &MovementTransition) {
        self.send(PlaybackMessage::Transition(transition.clone()));
    }

    fn on_day(&mut self, outcome: &DayOutcome, state: &WorldState) {
        debug!(
            day = outcome.plan.day,
            hash = %outcome.plan.events_hash,
            money = state.money,
            "Forwarding day to playback"
        );
        self.send(PlaybackMessage::Day(Box::new(outcome.plan.clone())));
    }
}
