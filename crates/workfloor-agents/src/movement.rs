//! Desk-to-desk movement state machine.
//!
//! Every agent that shows up in a collaboration gets a movement record. The
//! walker of a collaboration leaves its desk, walks to a spot in front of
//! the stayer's desk, waits there while the collaboration lasts, and walks
//! back home afterwards.
//!
//! # Phases
//!
//! ```text
//! AtRest --(named as walker)--> WalkingToTarget --(progress = 1)--> Arrived
//!    ^                               |                                 |
//!    |                      (pair gone: cancel)               (pair gone)
//!    |                               v                                 |
//!    +------(progress = 1)------ Returning <---------------------------+
//! ```
//!
//! Transitions are evaluated once per tick, before positions are advanced.
//! A walker keeps its first target: a second collaboration naming an agent
//! that is already on a trip does not redirect it.

use std::collections::BTreeMap;

use tracing::{debug, info};
use workfloor_types::{AgentId, CollaborationPair, MovementPhase, Position, RenderState};
use workfloor_world::{DeskLayout, Path, PathPlanner, facing_angle, position_at};

use crate::config::MovementConfig;

/// Distances below this are treated as zero.
const EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Per-agent record
// ---------------------------------------------------------------------------

/// Movement record of a single agent.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentMovementState {
    /// Current phase.
    pub phase: MovementPhase,
    /// Fraction of the current path travelled, in `[0, 1]`.
    pub progress: f64,
    /// Interpolated position.
    pub current_position: Position,
    /// Heading in radians; 0 faces `+z`.
    pub facing_angle: f64,
    /// Gait accumulator, only read by the renderer.
    pub walk_cycle_phase: f64,
    /// The single outstanding path while walking or returning.
    pub path: Option<Path>,
    /// The agent being visited, while on a trip.
    pub target: Option<AgentId>,
}

impl AgentMovementState {
    /// A resting record at `home`.
    pub const fn at_desk(home: Position) -> Self {
        Self {
            phase: MovementPhase::AtRest,
            progress: 0.0,
            current_position: home,
            facing_angle: 0.0,
            walk_cycle_phase: 0.0,
            path: None,
            target: None,
        }
    }

    /// Snapshot for the renderer.
    pub const fn render_state(&self) -> RenderState {
        RenderState {
            is_moving: self.phase.is_moving(),
            current_position: self.current_position,
            progress: self.progress,
            facing_angle: self.facing_angle,
            walk_cycle_phase: self.walk_cycle_phase,
            phase: self.phase,
        }
    }

    fn start_path(&mut self, phase: MovementPhase, path: Path) {
        self.phase = phase;
        self.progress = 0.0;
        self.current_position = path.start();
        self.path = Some(path);
    }

    /// Advance along the current path by `dt` seconds.
    fn advance(&mut self, dt: f64, config: &MovementConfig) {
        if !self.phase.is_moving() {
            return;
        }
        let Some(path) = &self.path else {
            return;
        };

        let total = path.total_distance();
        self.progress = if total < EPSILON {
            1.0
        } else {
            (self.progress + dt * config.walk_speed / total).clamp(0.0, 1.0)
        };
        self.current_position = position_at(path, self.progress);

        // Face the point just ahead rather than the destination so the turn
        // follows the detour bend.
        let ahead = position_at(path, (self.progress + config.facing_lookahead).min(1.0));
        if self.current_position.distance_to(ahead) > EPSILON {
            self.facing_angle = facing_angle(self.current_position, ahead);
        }

        self.walk_cycle_phase += dt * config.gait_cadence;
    }
}

/// Counts of transitions taken during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementTickSummary {
    /// Agents that left their desk.
    pub departed: usize,
    /// Agents that reached their host.
    pub arrived: usize,
    /// Agents that started walking home.
    pub returning: usize,
    /// Agents that got back to their desk.
    pub rested: usize,
    /// Agents currently travelling after the tick.
    pub moving: usize,
}

// ---------------------------------------------------------------------------
// MovementSystem
// ---------------------------------------------------------------------------

/// Owns the movement record of every agent seen so far.
///
/// Records are created lazily the first time an agent appears in a
/// collaboration and live for the rest of the session.
#[derive(Debug, Clone, Default)]
pub struct MovementSystem {
    config: MovementConfig,
    agents: BTreeMap<AgentId, AgentMovementState>,
}

impl MovementSystem {
    /// Create an empty movement system.
    pub const fn new(config: MovementConfig) -> Self {
        Self {
            config,
            agents: BTreeMap::new(),
        }
    }

    /// Movement parameters in use.
    pub const fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Record of an agent, creating a resting one at its desk if needed.
    pub fn ensure_agent(
        &mut self,
        agent: &AgentId,
        layout: &DeskLayout,
    ) -> &mut AgentMovementState {
        self.agents.entry(agent.clone()).or_insert_with(|| {
            debug!(%agent, "Movement record created");
            AgentMovementState::at_desk(layout.position_or_default(agent.as_str()))
        })
    }

    /// Record of an agent, if it has one.
    pub fn state_of(&self, agent: &str) -> Option<&AgentMovementState> {
        self.agents.get(agent)
    }

    /// Current position of an agent, if it has a record.
    pub fn position_of(&self, agent: &str) -> Option<Position> {
        self.agents.get(agent).map(|s| s.current_position)
    }

    /// Render snapshot of every tracked agent.
    pub fn render_states(&self) -> BTreeMap<AgentId, RenderState> {
        self.agents
            .iter()
            .map(|(id, state)| (id.clone(), state.render_state()))
            .collect()
    }

    /// Number of tracked agents.
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Whether no agent is tracked yet.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Run one simulation tick.
    ///
    /// `pairs` is the current active collaboration set. Negative or
    /// non-finite `dt` is treated as zero.
    pub fn tick(
        &mut self,
        dt: f64,
        pairs: &[CollaborationPair],
        layout: &DeskLayout,
        planner: &PathPlanner,
    ) -> MovementTickSummary {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for pair in pairs {
            self.ensure_agent(&pair.agent_a, layout);
            self.ensure_agent(&pair.agent_b, layout);
        }

        // Walker -> host. The first pair naming a walker wins.
        let mut hosts: BTreeMap<&AgentId, &AgentId> = BTreeMap::new();
        for pair in pairs {
            hosts.entry(&pair.agent_b).or_insert(&pair.agent_a);
        }

        let mut summary = MovementTickSummary::default();
        for (agent, state) in &mut self.agents {
            let host = hosts.get(agent).copied();
            transition(agent, state, host, layout, planner, &self.config, &mut summary);
            state.advance(dt, &self.config);
            if state.phase.is_moving() {
                summary.moving = summary.moving.saturating_add(1);
            }
        }
        summary
    }
}

/// Apply at most one phase transition to `state`.
fn transition(
    agent: &AgentId,
    state: &mut AgentMovementState,
    host: Option<&AgentId>,
    layout: &DeskLayout,
    planner: &PathPlanner,
    config: &MovementConfig,
    summary: &mut MovementTickSummary,
) {
    match (state.phase, host) {
        (MovementPhase::AtRest, Some(host)) => {
            depart(agent, state, host, layout, planner, config);
            summary.departed = summary.departed.saturating_add(1);
        }
        (MovementPhase::WalkingToTarget | MovementPhase::Arrived, None) => {
            begin_return(agent, state, layout, planner);
            summary.returning = summary.returning.saturating_add(1);
        }
        (MovementPhase::WalkingToTarget, Some(_)) if state.progress >= 1.0 => {
            debug!(%agent, host = ?state.target, "Arrived at collaborator");
            state.phase = MovementPhase::Arrived;
            summary.arrived = summary.arrived.saturating_add(1);
        }
        (MovementPhase::Returning, _) if state.progress >= 1.0 => {
            state.phase = MovementPhase::AtRest;
            state.current_position = layout.position_or_default(agent.as_str());
            state.progress = 0.0;
            state.path = None;
            let visited = state.target.take();
            info!(%agent, ?visited, "Round trip complete");
            summary.rested = summary.rested.saturating_add(1);

            // A walker named by an active pair never rests; leave again.
            if let Some(host) = host {
                depart(agent, state, host, layout, planner, config);
                summary.departed = summary.departed.saturating_add(1);
            }
        }
        _ => {}
    }
}

/// Start the walk from the agent's desk to the spot in front of `host`.
fn depart(
    agent: &AgentId,
    state: &mut AgentMovementState,
    host: &AgentId,
    layout: &DeskLayout,
    planner: &PathPlanner,
    config: &MovementConfig,
) {
    let from = layout.standing_spot(agent.as_str(), config.desk_offset);
    let to = layout.meeting_spot(host.as_str(), config.meeting_offset);
    let path = planner.plan(from, to, layout, &[agent, host]);
    debug!(
        %agent,
        %host,
        distance = path.total_distance(),
        detour = path.has_detour(),
        "Walking to collaborator"
    );
    state.start_path(MovementPhase::WalkingToTarget, path);
    state.target = Some(host.clone());
}

/// Send the agent home from wherever it currently stands.
fn begin_return(
    agent: &AgentId,
    state: &mut AgentMovementState,
    layout: &DeskLayout,
    planner: &PathPlanner,
) {
    let home = layout.position_or_default(agent.as_str());
    let path = match &state.target {
        Some(host) => planner.plan(state.current_position, home, layout, &[agent, host]),
        None => planner.plan(state.current_position, home, layout, &[agent]),
    };
    debug!(
        %agent,
        from_phase = ?state.phase,
        distance = path.total_distance(),
        "Returning to desk"
    );
    state.start_path(MovementPhase::Returning, path);
}
