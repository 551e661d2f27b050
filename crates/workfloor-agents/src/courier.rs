//! Courier delivery runs.
//!
//! The courier is a single designated agent that is driven by an external
//! "active destination" signal rather than by the collaboration detector.
//! It walks in a straight line to the destination, dwells there for a fixed
//! time, and walks home.
//!
//! ```text
//! Idle --(new destination)--> Departing --(arrived)--> Delivering
//!  ^                                                       |
//!  +------------(home)------------ Returning <--(dwell)----+
//! ```

use std::collections::BTreeMap;

use tracing::{debug, info, warn};
use workfloor_types::{CargoPhase, CourierRenderState, Position};
use workfloor_world::{Path, direct_path, facing_angle, position_at};

use crate::config::CourierConfig;

/// Distances below this are treated as zero.
const EPSILON: f64 = 1e-9;

/// The courier and its delivery state.
#[derive(Debug, Clone)]
pub struct Courier {
    config: CourierConfig,
    home: Position,
    destinations: BTreeMap<String, Position>,
    phase: CargoPhase,
    /// Destination currently being serviced; cleared when back home.
    serviced: Option<String>,
    path: Option<Path>,
    progress: f64,
    dwell_elapsed: f64,
    current_position: Position,
    facing_angle: f64,
}

impl Courier {
    /// Create an idle courier at `home` that knows the given destinations.
    pub fn new(
        home: Position,
        destinations: BTreeMap<String, Position>,
        config: CourierConfig,
    ) -> Self {
        let home = home.on_ground();
        Self {
            config,
            home,
            destinations: destinations
                .into_iter()
                .map(|(name, pos)| (name, pos.on_ground()))
                .collect(),
            phase: CargoPhase::Idle,
            serviced: None,
            path: None,
            progress: 0.0,
            dwell_elapsed: 0.0,
            current_position: home,
            facing_angle: 0.0,
        }
    }

    /// Current phase.
    pub const fn phase(&self) -> CargoPhase {
        self.phase
    }

    /// Destination currently being serviced.
    pub fn serviced(&self) -> Option<&str> {
        self.serviced.as_deref()
    }

    /// Current position.
    pub const fn position(&self) -> Position {
        self.current_position
    }

    /// Home position.
    pub const fn home(&self) -> Position {
        self.home
    }

    /// Snapshot for the renderer.
    pub fn render_state(&self) -> CourierRenderState {
        CourierRenderState {
            phase: self.phase,
            current_position: self.current_position,
            facing_angle: self.facing_angle,
            destination: self.serviced.clone(),
        }
    }

    /// Run one tick of `dt` seconds.
    ///
    /// Returns the phase entered during this tick, if any. A destination the
    /// courier does not know is ignored.
    pub fn tick(&mut self, dt: f64, active_destination: Option<&str>) -> Option<CargoPhase> {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        match self.phase {
            CargoPhase::Idle => {
                let name = active_destination?;
                if self.serviced.as_deref() == Some(name) {
                    return None;
                }
                let Some(target) = self.destinations.get(name).copied() else {
                    warn!(destination = name, "Unknown courier destination");
                    return None;
                };
                info!(destination = name, "Courier departing");
                self.serviced = Some(name.to_owned());
                self.start_leg(CargoPhase::Departing, target);
                Some(CargoPhase::Departing)
            }
            CargoPhase::Departing => {
                if self.advance(dt) {
                    debug!(destination = ?self.serviced, "Courier delivering");
                    self.phase = CargoPhase::Delivering;
                    self.dwell_elapsed = 0.0;
                    return Some(CargoPhase::Delivering);
                }
                None
            }
            CargoPhase::Delivering => {
                self.dwell_elapsed += dt;
                if self.dwell_elapsed >= self.config.dwell_seconds {
                    debug!(destination = ?self.serviced, "Courier returning");
                    self.start_leg(CargoPhase::Returning, self.home);
                    return Some(CargoPhase::Returning);
                }
                None
            }
            CargoPhase::Returning => {
                if self.advance(dt) {
                    info!(destination = ?self.serviced, "Courier back home");
                    self.phase = CargoPhase::Idle;
                    self.current_position = self.home;
                    self.path = None;
                    self.serviced = None;
                    return Some(CargoPhase::Idle);
                }
                None
            }
        }
    }

    fn start_leg(&mut self, phase: CargoPhase, to: Position) {
        let path = direct_path(self.current_position, to);
        if path.total_distance() > EPSILON {
            self.facing_angle = facing_angle(path.start(), path.end());
        }
        self.phase = phase;
        self.progress = 0.0;
        self.path = Some(path);
    }

    /// Move along the current leg. Returns `true` once the leg is complete.
    fn advance(&mut self, dt: f64) -> bool {
        let Some(path) = &self.path else {
            return true;
        };
        let total = path.total_distance();
        self.progress = if total < EPSILON {
            1.0
        } else {
            (self.progress + dt * self.config.speed / total).clamp(0.0, 1.0)
        };
        self.current_position = position_at(path, self.progress);
        self.progress >= 1.0
    }
}
