//! Bounded simulation loop.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop:
//!
//! - **Input**: each tick pulls newly available feed events and the
//!   courier signal from an [`EventSource`].
//! - **Bounded simulation**: stop after `max_ticks`, or once the source is
//!   exhausted and the office has gone quiet.
//! - **Pacing**: optionally sleep the tick interval between ticks so the
//!   run plays back in real time.
//!
//! The runner wraps the single-tick [`run_tick`] function.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::time::Duration;

use tracing::{info, warn};

use crate::config::SimulationSection;
use crate::source::EventSource;
use crate::tick::{self, OfficeState, TickError, TickInput, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Why the simulation stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// The configured tick limit was reached.
    MaxTicksReached,
    /// The event source ran dry and nothing is moving.
    Quiescent,
}

/// Limits and pacing for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunBounds {
    /// Stop after this many ticks (0 = unbounded).
    pub max_ticks: u64,
    /// Stop once the source is exhausted and the office is quiet.
    pub stop_when_idle: bool,
    /// Sleep `tick_interval` between ticks.
    pub realtime: bool,
    /// Wall-clock pause between ticks when `realtime` is set.
    pub tick_interval: Duration,
}

impl RunBounds {
    /// Bounds from the `simulation` config section.
    pub fn from_config(section: &SimulationSection) -> Self {
        Self {
            max_ticks: section.max_ticks,
            stop_when_idle: section.stop_when_idle,
            realtime: section.realtime,
            tick_interval: Duration::from_millis(u64::from(section.tick_interval_ms)),
        }
    }
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
    /// Total collaborations started over the run.
    pub collaborations_started: usize,
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to push render snapshots to a frontend.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, state: &OfficeState);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &OfficeState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// With `max_ticks == 0` and `stop_when_idle == false` the loop only ends
/// on error.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails.
pub async fn run_simulation(
    state: &mut OfficeState,
    source: &mut dyn EventSource,
    bounds: RunBounds,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut total_ticks: u64 = 0;
    let mut collaborations_started: usize = 0;
    let dt_seconds = state.clock.step_seconds();

    info!(
        max_ticks = bounds.max_ticks,
        stop_when_idle = bounds.stop_when_idle,
        realtime = bounds.realtime,
        tick_interval_ms = u64::try_from(bounds.tick_interval.as_millis()).unwrap_or(u64::MAX),
        "Simulation starting"
    );

    loop {
        // --- Pull input ---
        let now = state.clock.now();
        let events = source.poll_events(now);
        if !events.is_empty() {
            tracing::debug!(count = events.len(), "Feed events arrived");
        }
        state.ingest(events);
        let input = TickInput {
            dt_seconds,
            active_destination: source.active_destination(now),
        };

        // --- Execute tick ---
        let summary = tick::run_tick(state, &input)?;
        total_ticks = total_ticks.saturating_add(1);
        collaborations_started =
            collaborations_started.saturating_add(summary.collaborations_started);

        // --- Notify callback ---
        callback.on_tick(&summary, state);

        // --- Check tick limit ---
        if bounds.max_ticks > 0 && total_ticks >= bounds.max_ticks {
            info!(
                tick = summary.tick,
                max_ticks = bounds.max_ticks,
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
                collaborations_started,
            });
        }

        // --- Check quiescence ---
        if bounds.stop_when_idle && source.is_exhausted() && summary.is_quiescent() {
            info!(tick = summary.tick, "Office is quiet and the feed is exhausted");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Quiescent,
                final_summary: Some(summary),
                total_ticks,
                collaborations_started,
            });
        }

        // --- Pace ---
        if bounds.realtime && !bounds.tick_interval.is_zero() {
            tokio::time::sleep(bounds.tick_interval).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        collaborations_started = result.collaborations_started,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            now = %summary.now,
            active_collaborations = summary.active_collaborations,
            moving = summary.movement.moving,
            courier = ?summary.courier_phase,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
