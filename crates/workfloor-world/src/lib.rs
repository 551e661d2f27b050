//! Static office configuration and floor geometry for the Workfloor simulation.
//!
//! This crate models the physical office: fixed desk positions per agent, the
//! organizational chart used for role tie-breaks, and the geometry that moves
//! agents between desks.
//!
//! # Modules
//!
//! - [`error`] -- Error types for office construction.
//! - [`layout`] -- [`DeskLayout`]: agent to home desk mapping.
//! - [`org_chart`] -- [`OrgChart`]: agent to tier mapping.
//! - [`path`] -- Route planning with single-desk detours, interpolation,
//!   and facing angles.
//! - [`starting_office`] -- Default eight-desk office.

pub mod error;
pub mod layout;
pub mod org_chart;
pub mod path;
pub mod starting_office;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use layout::DeskLayout;
pub use org_chart::OrgChart;
pub use path::{Path, PathPlanner, direct_path, facing_angle, position_at};
pub use starting_office::create_default_office;
