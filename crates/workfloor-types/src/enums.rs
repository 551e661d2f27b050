//! Enumeration types for the Workfloor simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Organizational tiers
// ---------------------------------------------------------------------------

/// Organizational tier of an agent.
///
/// Only used to decide who stays and who walks when two agents start a
/// collaboration. Unknown agents default to [`Tier::Worker`], the lowest
/// priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Tier {
    /// Top of the chart.
    Commander,
    /// Oversees directors.
    Supervisor,
    /// Leads a department.
    Director,
    /// Individual contributor.
    #[default]
    Worker,
}

impl Tier {
    /// Priority used for the stay/walk tie-break. Higher stays.
    pub const fn priority(self) -> u8 {
        match self {
            Self::Commander => 4,
            Self::Supervisor => 3,
            Self::Director => 2,
            Self::Worker => 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Collaboration types
// ---------------------------------------------------------------------------

/// Kind of interaction inferred from the message that started it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CollaborationType {
    /// Work is being handed to the other agent.
    Delegation,
    /// Data or files move between the agents.
    DataExchange,
    /// One agent reviews or verifies the other's work.
    Review,
    /// Anything else.
    Generic,
}

impl CollaborationType {
    /// Wire name of the collaboration type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delegation => "delegation",
            Self::DataExchange => "data_exchange",
            Self::Review => "review",
            Self::Generic => "generic",
        }
    }
}

impl core::fmt::Display for CollaborationType {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Event feed
// ---------------------------------------------------------------------------

/// Category of an entry in the external event feed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum FeedEventType {
    /// Free-form log message.
    #[default]
    Message,
    /// A task was picked up.
    TaskStarted,
    /// A task finished.
    TaskCompleted,
    /// Work was passed to another agent.
    Handoff,
    /// Periodic status line.
    Status,
}

// ---------------------------------------------------------------------------
// Movement phases
// ---------------------------------------------------------------------------

/// Phase of an agent's desk-to-desk round trip.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MovementPhase {
    /// Standing at the home desk.
    #[default]
    AtRest,
    /// Walking toward the counterpart's desk.
    WalkingToTarget,
    /// Standing at the counterpart's desk.
    Arrived,
    /// Walking back to the home desk.
    Returning,
}

impl MovementPhase {
    /// Whether the agent travels along a path during this phase.
    pub const fn is_moving(self) -> bool {
        matches!(self, Self::WalkingToTarget | Self::Returning)
    }
}

/// Phase of the courier's delivery run.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum CargoPhase {
    /// Waiting at home for a destination.
    #[default]
    Idle,
    /// Travelling to the destination.
    Departing,
    /// Dwelling at the destination.
    Delivering,
    /// Travelling back home.
    Returning,
}

impl CargoPhase {
    /// Whether the courier travels during this phase.
    pub const fn is_moving(self) -> bool {
        matches!(self, Self::Departing | Self::Returning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_priority_ordering() {
        assert!(Tier::Commander.priority() > Tier::Supervisor.priority());
        assert!(Tier::Supervisor.priority() > Tier::Director.priority());
        assert!(Tier::Director.priority() > Tier::Worker.priority());
        assert_eq!(Tier::default(), Tier::Worker);
    }

    #[test]
    fn collaboration_type_wire_names() {
        let json = serde_json::to_string(&CollaborationType::DataExchange).unwrap_or_default();
        assert_eq!(json, "\"data_exchange\"");
        assert_eq!(CollaborationType::Delegation.to_string(), "delegation");
    }

    #[test]
    fn moving_phases() {
        assert!(!MovementPhase::AtRest.is_moving());
        assert!(MovementPhase::WalkingToTarget.is_moving());
        assert!(!MovementPhase::Arrived.is_moving());
        assert!(MovementPhase::Returning.is_moving());
        assert!(!CargoPhase::Delivering.is_moving());
    }
}
