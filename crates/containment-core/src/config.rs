//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `containment-config.yaml` at the
//! project root. Every field has a default, so an empty file (or no file)
//! yields a runnable configuration.

use std::path::Path;

use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `containment-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, run length).
    #[serde(default)]
    pub world: WorldConfig,

    /// Playback hints attached to the event log.
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable run name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducible spawning.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Stop after this many days. Zero means no limit.
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            max_days: default_max_days(),
        }
    }
}

/// Playback tuning carried in the event log.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PlaybackConfig {
    /// Camera zoom suggested by focus events.
    #[serde(default = "default_focus_zoom")]
    pub focus_zoom: f32,

    /// Seconds the camera lingers on each focused anomaly.
    #[serde(default = "default_focus_duration")]
    pub focus_duration: f32,

    /// Delay between replayed events in the playback driver.
    #[serde(default = "default_event_pacing_ms")]
    pub event_pacing_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            focus_zoom: default_focus_zoom(),
            focus_duration: default_focus_duration(),
            event_pacing_ms: default_event_pacing_ms(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Containment".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_max_days() -> u32 {
    30
}

const fn default_focus_zoom() -> f32 {
    1.15
}

const fn default_focus_duration() -> f32 {
    0.6
}

const fn default_event_pacing_ms() -> u64 {
    0
}

fn default_log_level() -> String {
    "info".to_owned()
}
