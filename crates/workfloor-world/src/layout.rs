//! Desk layout: the fixed home position of every agent.
//!
//! The layout is static configuration. It is built once at startup and only
//! read afterwards. Iteration order is the agent identifier order, which
//! makes obstruction checks deterministic.

use std::collections::BTreeMap;

use workfloor_types::{AgentId, Position};

use crate::error::WorldError;

/// Mapping from agent to home desk position.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeskLayout {
    /// Home desk per agent, projected onto the ground plane.
    desks: BTreeMap<AgentId, Position>,
    /// Position reported for agents without a desk.
    default_position: Position,
}

impl DeskLayout {
    /// Create an empty layout whose fallback position is the origin.
    pub const fn new() -> Self {
        Self {
            desks: BTreeMap::new(),
            default_position: Position::ground(0.0, 0.0),
        }
    }

    /// Set the position reported for agents without a desk.
    #[must_use]
    pub fn with_default_position(mut self, position: Position) -> Self {
        self.default_position = position.on_ground();
        self
    }

    /// Assign a home desk to an agent.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::DuplicateDesk`] if the agent already has one.
    pub fn insert(&mut self, agent: AgentId, position: Position) -> Result<(), WorldError> {
        if self.desks.contains_key(&agent) {
            return Err(WorldError::DuplicateDesk(agent));
        }
        self.desks.insert(agent, position.on_ground());
        Ok(())
    }

    /// Home desk of an agent, if configured.
    pub fn desk_of(&self, agent: &str) -> Option<Position> {
        self.desks.get(agent).copied()
    }

    /// Home desk of an agent, or the fallback position for unknown agents.
    pub fn position_or_default(&self, agent: &str) -> Position {
        self.desk_of(agent).unwrap_or(self.default_position)
    }

    /// Fallback position for unknown agents.
    pub const fn default_position(&self) -> Position {
        self.default_position
    }

    /// Where an agent stands when leaving its own desk: slightly in front of
    /// it so it does not start inside the furniture.
    pub fn standing_spot(&self, agent: &str, forward: f64) -> Position {
        self.position_or_default(agent).offset(0.0, forward)
    }

    /// Where a visitor stands when meeting `host` at the host's desk.
    pub fn meeting_spot(&self, host: &str, offset: f64) -> Position {
        self.position_or_default(host).offset(0.0, offset)
    }

    /// Whether the agent has a desk.
    pub fn contains(&self, agent: &str) -> bool {
        self.desks.contains_key(agent)
    }

    /// All desks in identifier order.
    pub fn desks(&self) -> impl Iterator<Item = (&AgentId, &Position)> {
        self.desks.iter()
    }

    /// All agents with a desk, in identifier order.
    pub fn agents(&self) -> impl Iterator<Item = &AgentId> {
        self.desks.keys()
    }

    /// Number of desks.
    pub fn len(&self) -> usize {
        self.desks.len()
    }

    /// Whether the layout has no desks.
    pub fn is_empty(&self) -> bool {
        self.desks.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn layout() -> DeskLayout {
        let mut layout = DeskLayout::new();
        layout
            .insert(AgentId::from("trade-master"), Position::ground(-8.0, -6.0))
            .unwrap();
        layout
            .insert(AgentId::from("full-stack"), Position::new(0.0, 3.0, -4.0))
            .unwrap();
        layout
    }

    #[test]
    fn duplicate_desk_rejected() {
        let mut layout = layout();
        let result = layout.insert(AgentId::from("full-stack"), Position::ground(1.0, 1.0));
        assert!(matches!(result, Err(WorldError::DuplicateDesk(_))));
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn desks_are_projected_to_ground() {
        let desk = layout().desk_of("full-stack").unwrap();
        assert!(desk.approx_eq(Position::ground(0.0, -4.0), 1e-12));
    }

    #[test]
    fn unknown_agent_falls_back() {
        let layout = layout().with_default_position(Position::ground(2.0, 2.0));
        assert!(layout.desk_of("ghost").is_none());
        assert!(
            layout
                .position_or_default("ghost")
                .approx_eq(Position::ground(2.0, 2.0), 1e-12)
        );
    }

    #[test]
    fn standing_and_meeting_spots_are_in_front_of_desk() {
        let layout = layout();
        let stand = layout.standing_spot("trade-master", 0.8);
        let meet = layout.meeting_spot("trade-master", 1.5);
        assert!(stand.approx_eq(Position::ground(-8.0, -5.2), 1e-9));
        assert!(meet.approx_eq(Position::ground(-8.0, -4.5), 1e-9));
    }

    #[test]
    fn iteration_is_sorted() {
        let layout = layout();
        let agents: Vec<&str> = layout.agents().map(AgentId::as_str).collect();
        assert_eq!(agents, vec!["full-stack", "trade-master"]);
    }
}
