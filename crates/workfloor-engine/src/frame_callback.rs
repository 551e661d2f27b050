//! Tick callback that emits render frames.
//!
//! A frame is the JSON snapshot a renderer would draw: every agent's render
//! state, the links between collaborating agents, and the courier. Frames
//! are logged at `debug` on ticks where something changed phase, so a
//! replay can be followed from the log alone.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};
use workfloor_core::runner::TickCallback;
use workfloor_core::tick::{OfficeState, TickSummary};
use workfloor_types::{AgentId, CollaborationLink, CourierRenderState, RenderState};

/// One renderable snapshot of the office.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// Tick that produced the frame.
    pub tick: u64,
    /// Simulated time of the frame.
    pub now: DateTime<Utc>,
    /// Render state per agent.
    pub agents: BTreeMap<AgentId, RenderState>,
    /// Active collaboration links.
    pub links: Vec<CollaborationLink>,
    /// Courier render state, when enabled.
    pub courier: Option<CourierRenderState>,
}

impl Frame {
    /// Capture the office after a tick.
    pub fn capture(summary: &TickSummary, state: &OfficeState) -> Self {
        Self {
            tick: summary.tick,
            now: summary.now,
            agents: state.render_states(),
            links: state.collaboration_links(),
            courier: state.courier_state(),
        }
    }
}

/// Logs a frame whenever a tick changed someone's phase.
#[derive(Debug, Default)]
pub struct FrameLogger {
    frames_emitted: u64,
}

impl FrameLogger {
    /// Create a logger that has emitted nothing yet.
    pub const fn new() -> Self {
        Self { frames_emitted: 0 }
    }

    /// Number of frames logged so far.
    pub const fn frames_emitted(&self) -> u64 {
        self.frames_emitted
    }
}

fn has_transition(summary: &TickSummary) -> bool {
    let m = &summary.movement;
    summary.collaborations_started > 0
        || summary.collaborations_expired > 0
        || m.departed > 0
        || m.arrived > 0
        || m.returning > 0
        || m.rested > 0
        || summary.courier_transition.is_some()
}

impl TickCallback for FrameLogger {
    fn on_tick(&mut self, summary: &TickSummary, state: &OfficeState) {
        if !has_transition(summary) {
            return;
        }
        match serde_json::to_string(&Frame::capture(summary, state)) {
            Ok(frame) => {
                self.frames_emitted = self.frames_emitted.saturating_add(1);
                debug!(tick = summary.tick, %frame, "Render frame");
            }
            Err(e) => warn!(tick = summary.tick, error = %e, "Failed to serialize frame"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use workfloor_core::config::WorkfloorConfig;
    use workfloor_core::tick::{TickInput, run_tick};
    use workfloor_types::{FeedEvent, FeedEventType};

    use super::*;

    fn office() -> OfficeState {
        let start = DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        OfficeState::from_config(&WorkfloorConfig::default(), start).unwrap()
    }

    #[test]
    fn quiet_tick_emits_nothing() {
        let mut state = office();
        let mut logger = FrameLogger::new();
        let summary = run_tick(&mut state, &TickInput::default()).unwrap();
        logger.on_tick(&summary, &state);
        assert_eq!(logger.frames_emitted(), 0);
    }

    #[test]
    fn departure_emits_a_frame() {
        let mut state = office();
        let now = state.clock.now();
        state.ingest([FeedEvent::at(
            now,
            "supervisor",
            "asking reviewer to audit the release",
            FeedEventType::Message,
        )]);
        let mut logger = FrameLogger::new();
        let summary = run_tick(&mut state, &TickInput::default()).unwrap();
        logger.on_tick(&summary, &state);
        assert_eq!(logger.frames_emitted(), 1);

        let frame = serde_json::to_value(Frame::capture(&summary, &state)).unwrap();
        assert_eq!(frame["tick"], 1);
        assert_eq!(frame["links"][0]["agent_a"], "supervisor");
        assert_eq!(frame["links"][0]["agent_b"], "reviewer");
        assert_eq!(frame["links"][0]["collaboration_type"], "review");
        assert_eq!(frame["agents"]["reviewer"]["phase"], "walking_to_target");
    }
}
