//! Headless engine binary for Containment.
//!
//! Wires configuration, content, logging and the playback driver together
//! and plays a run of days with the greedy roster policy.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `containment-config.yaml`
//! 2. Initialize structured logging (tracing)
//! 3. Load and validate `content/anomalies.yaml`
//! 4. Start a game session (starting world plus day-one spawns)
//! 5. Spawn the playback driver task
//! 6. Run days until the day limit or until no capable agent remains
//! 7. Close the playback channel and log the result

mod content_loader;
mod error;
mod playback;

use std::path::{Path, PathBuf};

use containment_core::{GameSession, GreedyPolicy, LoggingConfig, SimulationConfig, runner};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::playback::ChannelObserver;

/// Environment variable overriding the config file location.
const CONFIG_PATH_ENV: &str = "CONTAINMENT_CONFIG";

/// Environment variable overriding the content file location.
const CONTENT_PATH_ENV: &str = "CONTAINMENT_CONTENT";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the run itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration. Logging is not up yet, so this step is silent.
    let (config, config_found) = load_config()?;

    // 2. Initialize structured logging.
    init_tracing(&config.logging);
    info!("containment-engine starting");
    if !config_found {
        info!("Config file not found, using defaults");
    }
    info!(
        world_name = config.world.name,
        seed = config.world.seed,
        max_days = config.world.max_days,
        event_pacing_ms = config.playback.event_pacing_ms,
        "Configuration loaded"
    );

    // 3. Load content.
    let content_path = env_path(CONTENT_PATH_ENV, content_loader::DEFAULT_CONTENT_PATH);
    let content = content_loader::load_content(&content_path)?;

    // 4. Start the session.
    let (mut session, first_spawn) = GameSession::start(&config, Box::new(content))
        .map_err(EngineError::from)?;
    info!(
        cities = session.state().cities().len(),
        agents = session.state().agents().len(),
        anomalies = first_spawn.spawned,
        "Starting world created"
    );

    // 5. Playback driver.
    let (tx, playback_handle) = playback::spawn_driver(config.playback);
    let mut observer = ChannelObserver::new(tx);

    // 6. Run.
    let result = runner::run_days(
        &mut session,
        &mut GreedyPolicy::default(),
        &mut observer,
        config.world.max_days,
    )
    .map_err(EngineError::from)?;

    // 7. Shut down playback and log results.
    drop(observer);
    let stats = playback_handle.await.map_err(|e| EngineError::Playback {
        message: format!("{e}"),
    })?;

    runner::log_run_end(&result, session.state());
    info!(
        end_reason = ?result.end_reason,
        days_run = result.days_run,
        replayed_days = stats.days,
        replayed_events = stats.events,
        hash_mismatches = stats.hash_mismatches,
        "containment-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    if logging.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}

/// Path from an environment variable, or the default.
fn env_path(var: &str, default: &str) -> PathBuf {
    std::env::var_os(var).map_or_else(|| PathBuf::from(default), PathBuf::from)
}

/// Load the simulation configuration.
///
/// Looks for the config file relative to the current working directory
/// unless `CONTAINMENT_CONFIG` points elsewhere. The flag reports whether a
/// file was found.
fn load_config() -> Result<(SimulationConfig, bool), EngineError> {
    let config_path = env_path(CONFIG_PATH_ENV, "containment-config.yaml");
    load_config_from(&config_path)
}

fn load_config_from(path: &Path) -> Result<(SimulationConfig, bool), EngineError> {
    if path.exists() {
        let config = SimulationConfig::from_file(path)?;
        Ok((config, true))
    } else {
        Ok((SimulationConfig::default(), false))
    }
}
