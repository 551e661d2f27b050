//! End-to-end scenarios across the office, detector, movement, and runner.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use chrono::{DateTime, TimeDelta, Utc};
use workfloor_agents::{DetectorConfig, detect};
use workfloor_core::feed::FeedFile;
use workfloor_core::{
    NoOpCallback, OfficeState, ReplaySource, RunBounds, SimulationEndReason, TickCallback,
    TickSummary, WorkfloorConfig, run_simulation,
};
use workfloor_types::{
    CargoPhase, CollaborationType, FeedEvent, FeedEventType, MovementPhase, Position,
};
use workfloor_world::{DeskLayout, OrgChart, PathPlanner, position_at};

fn start() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-03-01T09:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn two_desk_office() -> (DeskLayout, OrgChart) {
    let config = WorkfloorConfig::parse(
        r"
office:
  desks:
    - { agent: trade-master, x: -8, z: -6, tier: director }
    - { agent: full-stack, x: 0, z: -4 }
",
    )
    .unwrap();
    let (layout, org, _) = config.office.build().unwrap();
    (layout, org)
}

#[test]
fn desk_to_desk_route_is_direct() {
    let (layout, _) = two_desk_office();
    let a = layout.desk_of("trade-master").unwrap();
    let b = layout.desk_of("full-stack").unwrap();

    let path = PathPlanner::default().plan(a, b, &layout, &[]);
    let direct = a.distance_to(b);
    assert!((direct - 68.0_f64.sqrt()).abs() < 1e-9);
    // Neither endpoint desk blocks its own route.
    assert_eq!(path.points().len(), 2);
    assert!(!path.has_detour());
    assert!((path.total_distance() - direct).abs() < 1e-9);
    assert_eq!(path.start(), a);
    assert_eq!(path.end(), b);
    assert!(path.points().iter().all(|p| p.y == 0.0));
    assert_eq!(position_at(&path, -1.0), a);
    assert_eq!(position_at(&path, 2.0), b);
}

#[test]
fn delegation_mention_pairs_director_with_worker() {
    let (_, org) = two_desk_office();
    let now = start();
    let event = FeedEvent::at(
        now - TimeDelta::seconds(1),
        "trade-master",
        "full-stack agent delegated",
        FeedEventType::Message,
    );

    let pairs = detect(&[event], &[], &org, now, &DetectorConfig::default());
    assert_eq!(pairs.len(), 1);
    let pair = pairs.first().unwrap();
    assert_eq!(pair.agent_a.as_str(), "trade-master");
    assert_eq!(pair.agent_b.as_str(), "full-stack");
    assert_eq!(pair.collaboration_type, CollaborationType::Delegation);
    assert_eq!(serde_json::to_value(pair.collaboration_type).unwrap(), "delegation");
}

/// Records every phase change of the walker and the courier.
struct PhaseRecorder {
    phases: Vec<MovementPhase>,
    courier: Vec<CargoPhase>,
}

impl TickCallback for PhaseRecorder {
    fn on_tick(&mut self, _summary: &TickSummary, state: &OfficeState) {
        if let Some(walker) = state.movement.state_of("full-stack")
            && self.phases.last() != Some(&walker.phase)
        {
            self.phases.push(walker.phase);
        }
        if let Some(courier) = state.courier_state()
            && self.courier.last() != Some(&courier.phase)
        {
            self.courier.push(courier.phase);
        }
    }
}

#[tokio::test]
async fn replayed_feed_drives_full_round_trip() {
    let config = WorkfloorConfig::parse(
        r#"
simulation:
  start_time: "2025-03-01T09:00:00Z"
  max_ticks: 4000
courier:
  home: { x: 12, z: 8 }
  destinations:
    design: { x: 8, z: 4 }
"#,
    )
    .unwrap();
    let mut state =
        OfficeState::from_config(&config, config.simulation.start_time().unwrap().unwrap())
            .unwrap();

    let feed = FeedFile::parse(
        r#"{
            "events": [
                {"timestamp": "2025-03-01T09:00:01Z", "agentId": "trade-master",
                 "message": "Handing off the export to full-stack", "type": "handoff"}
            ],
            "dispatches": [
                {"timestamp": "2025-03-01T09:00:00Z", "destination": "design"},
                {"timestamp": "2025-03-01T09:00:03Z", "destination": null}
            ]
        }"#,
    )
    .unwrap();
    let mut source = ReplaySource::new(feed);
    let mut recorder = PhaseRecorder {
        phases: Vec::new(),
        courier: Vec::new(),
    };

    let result = run_simulation(
        &mut state,
        &mut source,
        RunBounds::from_config(&config.simulation),
        &mut recorder,
    )
    .await
    .unwrap();

    assert_eq!(result.end_reason, SimulationEndReason::Quiescent);
    assert_eq!(result.collaborations_started, 1);
    assert_eq!(
        recorder.phases,
        [
            MovementPhase::AtRest,
            MovementPhase::WalkingToTarget,
            MovementPhase::Arrived,
            MovementPhase::Returning,
            MovementPhase::AtRest,
        ]
    );
    assert_eq!(
        recorder.courier,
        [
            CargoPhase::Departing,
            CargoPhase::Delivering,
            CargoPhase::Returning,
            CargoPhase::Idle,
        ]
    );

    let walker = state.movement.state_of("full-stack").unwrap();
    assert_eq!(walker.current_position, Position::ground(0.0, -4.0));
    assert!(walker.target.is_none());
    assert!(state.collaborations.is_empty());
    assert_eq!(state.courier_state().unwrap().current_position, Position::ground(12.0, 8.0));
}

#[tokio::test]
async fn stale_feed_leaves_office_untouched() {
    let config = WorkfloorConfig::parse("courier: { enabled: false }").unwrap();
    let mut state = OfficeState::from_config(&config, start()).unwrap();
    let before = state.render_states();

    let mut source = ReplaySource::new(FeedFile {
        events: vec![FeedEvent::at(
            start() - TimeDelta::seconds(30),
            "trade-master",
            "review with full-stack",
            FeedEventType::Message,
        )],
        dispatches: Vec::new(),
    });
    let bounds = RunBounds {
        max_ticks: 100,
        stop_when_idle: true,
        realtime: false,
        tick_interval: std::time::Duration::from_millis(50),
    };

    let result = run_simulation(&mut state, &mut source, bounds, &mut NoOpCallback)
        .await
        .unwrap();
    assert_eq!(result.end_reason, SimulationEndReason::Quiescent);
    assert_eq!(result.collaborations_started, 0);
    assert_eq!(state.render_states(), before);
}
