//! Engine binary for the Workfloor office simulation.
//!
//! Loads configuration, builds the office, replays an event feed against
//! simulated time, and runs the tick loop until the feed is exhausted and
//! the office is quiet, or the tick limit is reached.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from the path given as the first argument, or
//!    `workfloor-config.yaml` (defaults when the file is missing)
//! 2. Initialize structured logging (tracing)
//! 3. Build the office state (desks, org chart, planner, courier, clock)
//! 4. Load the event feed named by `feed.path` / `WORKFLOOR_EVENTS`
//! 5. Run the simulation loop
//! 6. Log the result

mod error;
mod frame_callback;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use workfloor_core::config::{LoggingConfig, WorkfloorConfig};
use workfloor_core::feed::load_feed_file;
use workfloor_core::runner::{self, RunBounds};
use workfloor_core::source::{EventSource, NoEvents, ReplaySource};
use workfloor_core::tick::OfficeState;

use crate::error::EngineError;
use crate::frame_callback::FrameLogger;

/// Config file used when no path is given.
const DEFAULT_CONFIG_PATH: &str = "workfloor-config.yaml";

/// Entry point for the engine.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let (config, from_file) = load_config(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging);
    info!("workfloor-engine starting");
    if from_file {
        info!(path = %config_path.display(), "Config loaded");
    } else {
        info!(path = %config_path.display(), "Config file not found, using defaults");
    }

    // 3. Build the office.
    let start = config.simulation.start_time()?.unwrap_or_else(Utc::now);
    let mut state = OfficeState::from_config(&config, start)?;

    // 4. Event feed.
    let mut source: Box<dyn EventSource> = match config.feed.path.as_deref() {
        Some(path) => {
            let file = load_feed_file(Path::new(path))?;
            info!(
                path,
                events = file.events.len(),
                dispatches = file.dispatches.len(),
                "Replaying event feed"
            );
            Box::new(ReplaySource::new(file))
        }
        None => {
            info!("No event feed configured, office will stay idle");
            Box::new(NoEvents)
        }
    };

    // 5. Run the simulation.
    let mut callback = FrameLogger::new();
    let result = runner::run_simulation(
        &mut state,
        source.as_mut(),
        RunBounds::from_config(&config.simulation),
        &mut callback,
    )
    .await?;

    // 6. Log results.
    runner::log_simulation_end(&result);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        frames = callback.frames_emitted(),
        "workfloor-engine shutdown complete"
    );

    Ok(())
}

/// Load configuration from `path`, falling back to defaults if it is
/// missing. Returns whether the file was read.
fn load_config(path: &Path) -> Result<(WorkfloorConfig, bool), EngineError> {
    if path.exists() {
        Ok((WorkfloorConfig::from_file(path)?, true))
    } else {
        let mut config = WorkfloorConfig::default();
        config.feed.apply_env_overrides();
        Ok((config, false))
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `logging.level`.
fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    if logging.is_json() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .init();
    }
}
