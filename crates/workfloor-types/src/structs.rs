//! Core structs exchanged between the simulation and its collaborators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{CargoPhase, CollaborationType, FeedEventType, MovementPhase};
use crate::geometry::Position;
use crate::ids::AgentId;

// ---------------------------------------------------------------------------
// Event feed
// ---------------------------------------------------------------------------

/// One record from the external event feed.
///
/// The timestamp is kept as the raw ISO-8601 string supplied by the feed;
/// the detector parses it and skips records it cannot read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct FeedEvent {
    /// When the event happened (RFC 3339).
    pub timestamp: String,
    /// The agent that authored the event.
    #[serde(alias = "agentId")]
    pub agent_id: AgentId,
    /// Free-text message.
    pub message: String,
    /// Category of the event.
    #[serde(rename = "type", default)]
    pub event_type: FeedEventType,
}

impl FeedEvent {
    /// Build a feed event stamped at `at`.
    pub fn at(
        at: DateTime<Utc>,
        agent_id: impl Into<AgentId>,
        message: impl Into<String>,
        event_type: FeedEventType,
    ) -> Self {
        Self {
            timestamp: at.to_rfc3339(),
            agent_id: agent_id.into(),
            message: message.into(),
            event_type,
        }
    }
}

// ---------------------------------------------------------------------------
// Collaborations
// ---------------------------------------------------------------------------

/// An active face-to-face interaction between two agents.
///
/// `agent_a` stays at its desk, `agent_b` walks over. The pair is dropped
/// once `expires_at` has passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CollaborationPair {
    /// The agent who stays.
    pub agent_a: AgentId,
    /// The agent who walks.
    pub agent_b: AgentId,
    /// Message that triggered the collaboration.
    pub message: String,
    /// When the collaboration was detected.
    pub started_at: DateTime<Utc>,
    /// When the collaboration ends.
    pub expires_at: DateTime<Utc>,
    /// Inferred interaction type.
    #[serde(rename = "type")]
    pub collaboration_type: CollaborationType,
}

impl CollaborationPair {
    /// Whether the pair involves both agents, in either role.
    pub fn involves_both(&self, first: &AgentId, second: &AgentId) -> bool {
        (self.agent_a == *first && self.agent_b == *second)
            || (self.agent_a == *second && self.agent_b == *first)
    }

    /// Whether the pair has run its course at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

// ---------------------------------------------------------------------------
// Render output
// ---------------------------------------------------------------------------

/// Per-agent state handed to the renderer once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RenderState {
    /// Whether the agent is travelling along a path.
    pub is_moving: bool,
    /// Interpolated position.
    pub current_position: Position,
    /// Fraction of the current path travelled, in `[0, 1]`.
    pub progress: f64,
    /// Heading in radians; 0 faces `+z`.
    pub facing_angle: f64,
    /// Gait accumulator for walk animation.
    pub walk_cycle_phase: f64,
    /// Movement phase.
    pub phase: MovementPhase,
}

/// Courier state handed to the renderer once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CourierRenderState {
    /// Delivery phase.
    pub phase: CargoPhase,
    /// Interpolated position.
    pub current_position: Position,
    /// Heading in radians; 0 faces `+z`.
    pub facing_angle: f64,
    /// Destination currently being serviced.
    pub destination: Option<String>,
}

/// A visual link between the two participants of a collaboration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CollaborationLink {
    /// The agent who stays.
    pub agent_a: AgentId,
    /// The agent who walks.
    pub agent_b: AgentId,
    /// Current position of `agent_a`.
    pub from: Position,
    /// Current position of `agent_b`.
    pub to: Position,
    /// Interaction type, for styling the link.
    pub collaboration_type: CollaborationType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeDelta;

    use super::*;

    fn pair(a: &str, b: &str, now: DateTime<Utc>) -> CollaborationPair {
        CollaborationPair {
            agent_a: AgentId::from(a),
            agent_b: AgentId::from(b),
            message: String::from("sync the dataset"),
            started_at: now,
            expires_at: now + TimeDelta::seconds(8),
            collaboration_type: CollaborationType::DataExchange,
        }
    }

    #[test]
    fn involves_both_in_either_order() {
        let now = Utc::now();
        let p = pair("analyst", "designer", now);
        assert!(p.involves_both(&AgentId::from("designer"), &AgentId::from("analyst")));
        assert!(!p.involves_both(&AgentId::from("designer"), &AgentId::from("reviewer")));
    }

    #[test]
    fn expiry_is_inclusive() {
        let now = Utc::now();
        let p = pair("analyst", "designer", now);
        assert!(!p.is_expired(now));
        assert!(p.is_expired(now + TimeDelta::seconds(8)));
    }

    #[test]
    fn feed_event_accepts_camel_case_author() {
        let json = r#"{
            "timestamp": "2026-01-05T10:00:00Z",
            "agentId": "trade-master",
            "message": "full-stack agent delegated",
            "type": "handoff"
        }"#;
        let event: FeedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.agent_id.as_str(), "trade-master");
        assert_eq!(event.event_type, FeedEventType::Handoff);
    }

    #[test]
    fn feed_event_type_defaults_to_message() {
        let json = r#"{"timestamp":"x","agent_id":"a","message":"m"}"#;
        let event: FeedEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, FeedEventType::Message);
    }
}
