//! Shared type definitions for the Workfloor office simulation.
//!
//! This crate is the single source of truth for the data exchanged between
//! the simulation crates and the rendering layer. Render-facing types are
//! exported to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- The [`AgentId`] slug wrapper
//! - [`geometry`] -- Ground-plane [`Position`] math
//! - [`enums`] -- Tiers, collaboration types, feed event types, phases
//! - [`structs`] -- Feed events, collaboration pairs, and render state

pub mod enums;
pub mod geometry;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{CargoPhase, CollaborationType, FeedEventType, MovementPhase, Tier};
pub use geometry::{GROUND_Y, Position};
pub use ids::AgentId;
pub use structs::{
    CollaborationLink, CollaborationPair, CourierRenderState, FeedEvent, RenderState,
};
