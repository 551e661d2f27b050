//! The office state and the single-tick cycle.
//!
//! [`run_tick`] performs one simulated frame:
//!
//! 1. Advance the clock by one step.
//! 2. Run the collaboration detector if the throttle allows.
//! 3. Step every agent's movement against the active collaborations.
//! 4. Step the courier against the active-destination signal.
//!
//! Everything except the clock is infallible.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use workfloor_agents::{Courier, DetectorConfig, MovementSystem, MovementTickSummary, detect};
use workfloor_types::{
    AgentId, CargoPhase, CollaborationLink, CollaborationPair, CourierRenderState, FeedEvent,
    Position, RenderState,
};
use workfloor_world::{DeskLayout, OrgChart, PathPlanner};

use crate::clock::{ClockError, DetectionThrottle, SimClock};
use crate::config::{ConfigError, WorkfloorConfig};
use crate::feed::EventFeed;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// The clock could not advance.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },
}

/// External input for one tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Elapsed time in seconds for movement and courier.
    pub dt_seconds: f64,
    /// Courier destination signal.
    pub active_destination: Option<String>,
}

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickSummary {
    /// Tick number that just ran.
    pub tick: u64,
    /// Simulated time after the tick.
    pub now: DateTime<Utc>,
    /// Whether the detector ran this tick.
    pub detector_ran: bool,
    /// Collaborations started this tick.
    pub collaborations_started: usize,
    /// Collaborations that expired this tick.
    pub collaborations_expired: usize,
    /// Active collaborations after the tick.
    pub active_collaborations: usize,
    /// Movement transitions.
    pub movement: MovementTickSummary,
    /// Courier phase after the tick, if there is a courier.
    pub courier_phase: Option<CargoPhase>,
    /// Courier phase entered this tick, if any.
    pub courier_transition: Option<CargoPhase>,
}

impl TickSummary {
    /// Whether nothing is walking, collaborating, or delivering.
    pub fn is_quiescent(&self) -> bool {
        self.active_collaborations == 0
            && self.movement.moving == 0
            && self.courier_phase.is_none_or(|phase| phase == CargoPhase::Idle)
    }
}

/// Complete simulation state of the office.
#[derive(Debug, Clone)]
pub struct OfficeState {
    /// Desk positions.
    pub layout: DeskLayout,
    /// Agent tiers; also the detector's roster.
    pub org: OrgChart,
    /// Route planner.
    pub planner: PathPlanner,
    /// Per-agent walking state.
    pub movement: MovementSystem,
    /// The courier, when enabled.
    pub courier: Option<Courier>,
    /// Rolling event feed.
    pub feed: EventFeed,
    /// Currently active collaborations.
    pub collaborations: Vec<CollaborationPair>,
    /// Detector tunables.
    pub detector: DetectorConfig,
    /// Detector throttle.
    pub throttle: DetectionThrottle,
    /// Simulated clock.
    pub clock: SimClock,
}

impl OfficeState {
    /// Build the office from configuration, starting the clock at `start`.
    ///
    /// Every desk agent gets a resting movement record so the renderer sees
    /// the whole office from the first frame.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the office cannot be built or the tick
    /// interval is invalid.
    pub fn from_config(
        config: &WorkfloorConfig,
        start: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let (layout, org, planner) = config.office.build()?;

        let mut movement = MovementSystem::new(config.movement_config());
        for agent in layout.agents() {
            movement.ensure_agent(agent, &layout);
        }

        let courier = config.courier.enabled.then(|| {
            let destinations = config
                .courier
                .destinations
                .iter()
                .map(|(name, point)| (name.clone(), Position::from(*point)))
                .collect();
            Courier::new(config.courier.home.into(), destinations, config.courier_config())
        });

        let clock = SimClock::new(start, config.simulation.tick_interval_ms).map_err(|e| {
            ConfigError::Invalid {
                reason: e.to_string(),
            }
        })?;

        info!(
            desks = layout.len(),
            roster = org.len(),
            courier = courier.is_some(),
            start = %start,
            "Office state initialized"
        );

        Ok(Self {
            layout,
            org,
            planner,
            movement,
            courier,
            feed: EventFeed::new(config.feed.capacity),
            collaborations: Vec::new(),
            detector: config.detector_config(),
            throttle: DetectionThrottle::new(config.detector.throttle_ms),
            clock,
        })
    }

    /// Append newly arrived feed events.
    pub fn ingest(&mut self, events: impl IntoIterator<Item = FeedEvent>) {
        self.feed.extend(events);
    }

    /// Render snapshot of every tracked agent.
    pub fn render_states(&self) -> BTreeMap<AgentId, RenderState> {
        self.movement.render_states()
    }

    /// Render snapshot of the courier, when enabled.
    pub fn courier_state(&self) -> Option<CourierRenderState> {
        self.courier.as_ref().map(Courier::render_state)
    }

    /// Visual links between the participants of every active collaboration.
    pub fn collaboration_links(&self) -> Vec<CollaborationLink> {
        self.collaborations
            .iter()
            .map(|pair| CollaborationLink {
                agent_a: pair.agent_a.clone(),
                agent_b: pair.agent_b.clone(),
                from: self.current_position(&pair.agent_a),
                to: self.current_position(&pair.agent_b),
                collaboration_type: pair.collaboration_type,
            })
            .collect()
    }

    fn current_position(&self, agent: &AgentId) -> Position {
        self.movement
            .position_of(agent.as_str())
            .unwrap_or_else(|| self.layout.position_or_default(agent.as_str()))
    }
}

/// Execute one tick.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the clock cannot advance. State is left
/// unchanged in that case.
pub fn run_tick(state: &mut OfficeState, input: &TickInput) -> Result<TickSummary, TickError> {
    let tick = state.clock.advance()?;
    let now = state.clock.now();

    let mut collaborations_started = 0;
    let mut collaborations_expired = 0;
    let detector_ran = state.throttle.should_run(now);
    if detector_ran {
        let before = state.collaborations.len();
        let retained = state
            .collaborations
            .iter()
            .filter(|pair| !pair.is_expired(now))
            .count();
        let next = detect(
            state.feed.as_slice(),
            &state.collaborations,
            &state.org,
            now,
            &state.detector,
        );
        collaborations_expired = before.saturating_sub(retained);
        collaborations_started = next.len().saturating_sub(retained);
        state.collaborations = next;
    }

    let movement = state.movement.tick(
        input.dt_seconds,
        &state.collaborations,
        &state.layout,
        &state.planner,
    );

    let courier_transition = state
        .courier
        .as_mut()
        .and_then(|courier| courier.tick(input.dt_seconds, input.active_destination.as_deref()));

    let summary = TickSummary {
        tick,
        now,
        detector_ran,
        collaborations_started,
        collaborations_expired,
        active_collaborations: state.collaborations.len(),
        movement,
        courier_phase: state.courier.as_ref().map(Courier::phase),
        courier_transition,
    };

    debug!(
        tick,
        detector_ran,
        started = collaborations_started,
        expired = collaborations_expired,
        active = summary.active_collaborations,
        moving = movement.moving,
        "Tick complete"
    );

    Ok(summary)
}
