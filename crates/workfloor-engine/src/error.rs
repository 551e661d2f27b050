//! Error types for the engine binary.
//!
//! [`EngineError`] is the top-level error type that wraps all possible
//! failure modes during startup and simulation execution.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading or office construction failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: workfloor_core::config::ConfigError,
    },

    /// The event-feed file could not be loaded.
    #[error("event feed error: {source}")]
    Feed {
        /// The underlying feed error.
        #[from]
        source: workfloor_core::feed::FeedError,
    },

    /// Simulation runner failed.
    #[error("runner error: {source}")]
    Runner {
        /// The underlying runner error.
        #[from]
        source: workfloor_core::runner::RunnerError,
    },
}
