//! Agent behaviour for the Workfloor office simulation.
//!
//! Everything here is pure logic over in-memory state: no I/O, no clocks.
//! Callers pass the current time and elapsed seconds explicitly.
//!
//! # Modules
//!
//! - [`collaboration`] -- Mines the event feed for agent-to-agent mentions
//!   and maintains the capped, expiring set of active collaborations.
//! - [`config`] -- Tunables for detection, walking, and the courier.
//! - [`courier`] -- Single-agent delivery run triggered by an external
//!   destination signal.
//! - [`movement`] -- Per-agent desk-to-desk round trip state machine.

pub mod collaboration;
pub mod config;
pub mod courier;
pub mod movement;

// Re-export primary types at crate root for convenience.
pub use collaboration::{assign_roles, detect, infer_collaboration_type};
pub use config::{CourierConfig, DetectorConfig, MovementConfig};
pub use courier::Courier;
pub use movement::{AgentMovementState, MovementSystem, MovementTickSummary};
