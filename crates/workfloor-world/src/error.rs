//! Error types for the `workfloor-world` crate.
//!
//! Only office construction can fail; the geometry itself normalizes
//! degenerate input instead of rejecting it.

use workfloor_types::AgentId;

/// Errors that can occur while building the office.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// An agent was given a second desk.
    #[error("duplicate desk for agent {0}")]
    DuplicateDesk(AgentId),

    /// A geometry parameter is out of range.
    #[error("invalid geometry: {reason}")]
    InvalidGeometry {
        /// Explanation of what is wrong.
        reason: String,
    },
}
