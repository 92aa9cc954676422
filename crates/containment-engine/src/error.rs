//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during engine startup and the run itself.

/// Top-level error for the engine binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: containment_core::ConfigError,
    },

    /// The content file could not be read or parsed.
    #[error("content file error: {message}")]
    ContentFile {
        /// Description of the failure, including the path.
        message: String,
    },

    /// The content table failed validation.
    #[error("content error: {source}")]
    Content {
        /// The underlying validation error.
        #[from]
        source: containment_settlement::ContentError,
    },

    /// The game session could not be created.
    #[error("session error: {source}")]
    Session {
        /// The underlying session error.
        #[from]
        source: containment_core::SessionError,
    },

    /// The multi-day run failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: containment_core::RunnerError,
    },

    /// The playback driver task failed.
    #[error("playback error: {message}")]
    Playback {
        /// Description of the playback failure.
        message: String,
    },
}
