//! Tunables for collaboration detection, walking, and the courier.
//!
//! The defaults are the values the office renderer was tuned against. The
//! orchestration crate builds these from `workfloor-config.yaml` and passes
//! them into the logic here.

use chrono::TimeDelta;

/// Parameters of the collaboration detector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Maximum age of an event that can start a collaboration (default: 5000 ms).
    pub detection_window_ms: u32,

    /// Lifetime of a collaboration once detected (default: 8000 ms).
    pub collaboration_duration_ms: u32,

    /// Maximum number of simultaneously active collaborations (default: 3).
    pub max_concurrent: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            detection_window_ms: 5000,
            collaboration_duration_ms: 8000,
            max_concurrent: 3,
        }
    }
}

impl DetectorConfig {
    /// Detection window as a duration.
    pub fn detection_window(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.detection_window_ms))
    }

    /// Collaboration lifetime as a duration.
    pub fn collaboration_duration(&self) -> TimeDelta {
        TimeDelta::milliseconds(i64::from(self.collaboration_duration_ms))
    }
}

/// Parameters of the desk-to-desk walk.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementConfig {
    /// Walking speed in floor units per second (default: 3.0).
    pub walk_speed: f64,

    /// Gait accumulator rate in radians per second (default: 8.0).
    pub gait_cadence: f64,

    /// How far ahead along the path the facing angle is sampled, as a
    /// progress fraction (default: 0.05).
    pub facing_lookahead: f64,

    /// Distance in front of the home desk where a walk starts (default: 0.8).
    pub desk_offset: f64,

    /// Distance in front of the host's desk where the visitor stops
    /// (default: 1.5).
    pub meeting_offset: f64,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 3.0,
            gait_cadence: 8.0,
            facing_lookahead: 0.05,
            desk_offset: 0.8,
            meeting_offset: 1.5,
        }
    }
}

/// Parameters of the courier run.
#[derive(Debug, Clone, PartialEq)]
pub struct CourierConfig {
    /// Travel speed in floor units per second (default: 4.0).
    pub speed: f64,

    /// Seconds spent at the destination before heading home (default: 2.0).
    pub dwell_seconds: f64,
}

impl Default for CourierConfig {
    fn default() -> Self {
        Self {
            speed: 4.0,
            dwell_seconds: 2.0,
        }
    }
}
