//! Simulation clock, tick cycle, and orchestration for the Workfloor office.
//!
//! This crate wires the pure logic crates into a running simulation. Each
//! tick advances the simulated clock, runs the collaboration detector when
//! its throttle allows, moves every walking agent, and steps the courier.
//!
//! # Modules
//!
//! - [`clock`] -- Simulated clock and the detector throttle.
//! - [`config`] -- Configuration loading from `workfloor-config.yaml` into
//!   strongly-typed structs.
//! - [`feed`] -- Rolling event feed and event-feed file loading.
//! - [`runner`] -- Bounded async simulation loop with per-tick callbacks.
//! - [`source`] -- Feed-event and courier-signal sources polled each tick.
//! - [`tick`] -- [`OfficeState`] and the single-tick [`run_tick`].
//!
//! [`OfficeState`]: tick::OfficeState
//! [`run_tick`]: tick::run_tick

pub mod clock;
pub mod config;
pub mod feed;
pub mod runner;
pub mod source;
pub mod tick;

pub use config::{ConfigError, WorkfloorConfig};
pub use runner::{
    NoOpCallback, RunBounds, RunnerError, SimulationEndReason, SimulationResult, TickCallback,
    log_simulation_end, run_simulation,
};
pub use source::{EventSource, NoEvents, ReplaySource};
pub use tick::{OfficeState, TickInput, TickSummary, run_tick};
