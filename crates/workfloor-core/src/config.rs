//! Configuration loading and typed config structures for the Workfloor simulation.
//!
//! The canonical configuration lives in `workfloor-config.yaml` at the
//! project root. Every section and field is optional; missing values take
//! the defaults the renderer was tuned against. When no desks are listed,
//! the built-in default office is used.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use workfloor_agents::collaboration::parse_timestamp;
use workfloor_agents::{CourierConfig, DetectorConfig, MovementConfig};
use workfloor_types::{AgentId, Position, Tier};
use workfloor_world::{DeskLayout, OrgChart, PathPlanner, WorldError, create_default_office};

/// Environment variable overriding `feed.path`.
pub const EVENTS_PATH_ENV: &str = "WORKFLOOR_EVENTS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// The office described by the configuration could not be built.
    #[error("office error: {source}")]
    Office {
        /// The underlying world error.
        #[from]
        source: WorldError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `workfloor-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WorkfloorConfig {
    /// Desks, tiers, and floor geometry.
    #[serde(default)]
    pub office: OfficeConfig,

    /// Walking parameters.
    #[serde(default)]
    pub movement: MovementSection,

    /// Collaboration detector parameters.
    #[serde(default)]
    pub detector: DetectorSection,

    /// Courier parameters.
    #[serde(default)]
    pub courier: CourierSection,

    /// Event feed parameters.
    #[serde(default)]
    pub feed: FeedSection,

    /// Tick cadence and run bounds.
    #[serde(default)]
    pub simulation: SimulationSection,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WorkfloorConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// `WORKFLOOR_EVENTS` overrides `feed.path` when set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.feed.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("movement.walk_speed", self.movement.walk_speed)?;
        require_positive("courier.speed", self.courier.speed)?;
        require_non_negative("courier.dwell_seconds", self.courier.dwell_seconds)?;
        require_non_negative("movement.facing_lookahead", self.movement.facing_lookahead)?;
        if self.detector.detection_window_ms == 0 {
            return Err(invalid("detector.detection_window_ms must be at least 1"));
        }
        if self.detector.collaboration_duration_ms == 0 {
            return Err(invalid("detector.collaboration_duration_ms must be at least 1"));
        }
        if self.detector.max_concurrent == 0 {
            return Err(invalid("detector.max_concurrent must be at least 1"));
        }
        if self.feed.capacity == 0 {
            return Err(invalid("feed.capacity must be at least 1"));
        }
        if self.simulation.tick_interval_ms == 0 {
            return Err(invalid("simulation.tick_interval_ms must be at least 1"));
        }
        self.simulation.start_time()?;
        Ok(())
    }

    /// Detector tunables.
    pub const fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            detection_window_ms: self.detector.detection_window_ms,
            collaboration_duration_ms: self.detector.collaboration_duration_ms,
            max_concurrent: self.detector.max_concurrent,
        }
    }

    /// Walking tunables.
    pub const fn movement_config(&self) -> MovementConfig {
        MovementConfig {
            walk_speed: self.movement.walk_speed,
            gait_cadence: self.movement.gait_cadence,
            facing_lookahead: self.movement.facing_lookahead,
            desk_offset: self.movement.desk_offset,
            meeting_offset: self.movement.meeting_offset,
        }
    }

    /// Courier tunables.
    pub const fn courier_config(&self) -> CourierConfig {
        CourierConfig {
            speed: self.courier.speed,
            dwell_seconds: self.courier.dwell_seconds,
        }
    }
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid {
        reason: reason.to_owned(),
    }
}

fn require_positive(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{name} must be > 0, got {value}"),
        })
    }
}

fn require_non_negative(name: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            reason: format!("{name} must be >= 0, got {value}"),
        })
    }
}

// ---------------------------------------------------------------------------
// Office
// ---------------------------------------------------------------------------

/// A point on the office floor, as written in YAML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct FloorPoint {
    /// Horizontal coordinate.
    #[serde(default)]
    pub x: f64,
    /// Depth coordinate.
    #[serde(default)]
    pub z: f64,
}

impl From<FloorPoint> for Position {
    fn from(point: FloorPoint) -> Self {
        Self::ground(point.x, point.z)
    }
}

/// One configured desk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeskEntry {
    /// Agent sitting at the desk.
    pub agent: String,
    /// Horizontal coordinate.
    pub x: f64,
    /// Depth coordinate.
    pub z: f64,
    /// Organizational tier (default: worker).
    #[serde(default)]
    pub tier: Tier,
}

/// Desks, tiers, and floor geometry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OfficeConfig {
    /// Desk list. Empty means the built-in default office.
    #[serde(default)]
    pub desks: Vec<DeskEntry>,

    /// Extra tiers for agents that have no desk.
    #[serde(default)]
    pub tiers: BTreeMap<String, Tier>,

    /// Position reported for agents without a desk.
    #[serde(default)]
    pub default_position: FloorPoint,

    /// Distance from a route at which a desk forces a detour.
    #[serde(default = "default_collision_radius")]
    pub collision_radius: f64,

    /// Sideways offset of the detour waypoint.
    #[serde(default = "default_detour_distance")]
    pub detour_distance: f64,
}

impl Default for OfficeConfig {
    fn default() -> Self {
        Self {
            desks: Vec::new(),
            tiers: BTreeMap::new(),
            default_position: FloorPoint::default(),
            collision_radius: default_collision_radius(),
            detour_distance: default_detour_distance(),
        }
    }
}

impl OfficeConfig {
    /// Build the desk layout, org chart, and path planner.
    ///
    /// Every agent with a desk is registered in the org chart so the
    /// detector can find mentions of it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Office`] for duplicate desks or invalid
    /// planner geometry.
    pub fn build(&self) -> Result<(DeskLayout, OrgChart, PathPlanner), ConfigError> {
        let planner = PathPlanner::new(self.collision_radius, self.detour_distance)?;

        let (layout, mut org) = if self.desks.is_empty() {
            create_default_office()?
        } else {
            let mut layout = DeskLayout::new();
            let mut org = OrgChart::new();
            for desk in &self.desks {
                layout.insert(AgentId::new(desk.agent.as_str()), Position::ground(desk.x, desk.z))?;
                org.insert(AgentId::new(desk.agent.as_str()), desk.tier);
            }
            (layout, org)
        };

        for (agent, tier) in &self.tiers {
            org.insert(AgentId::new(agent.as_str()), *tier);
        }

        let layout = layout.with_default_position(self.default_position.into());
        Ok((layout, org, planner))
    }
}

// ---------------------------------------------------------------------------
// Logic sections
// ---------------------------------------------------------------------------

/// Walking parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MovementSection {
    /// Floor units per second.
    #[serde(default = "default_walk_speed")]
    pub walk_speed: f64,

    /// Gait accumulator rate in radians per second.
    #[serde(default = "default_gait_cadence")]
    pub gait_cadence: f64,

    /// Facing lookahead as a progress fraction.
    #[serde(default = "default_facing_lookahead")]
    pub facing_lookahead: f64,

    /// Distance in front of the home desk where walks start.
    #[serde(default = "default_desk_offset")]
    pub desk_offset: f64,

    /// Distance in front of the host's desk where visitors stop.
    #[serde(default = "default_meeting_offset")]
    pub meeting_offset: f64,
}

impl Default for MovementSection {
    fn default() -> Self {
        Self {
            walk_speed: default_walk_speed(),
            gait_cadence: default_gait_cadence(),
            facing_lookahead: default_facing_lookahead(),
            desk_offset: default_desk_offset(),
            meeting_offset: default_meeting_offset(),
        }
    }
}

/// Collaboration detector parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetectorSection {
    /// Maximum event age in milliseconds.
    #[serde(default = "default_detection_window_ms")]
    pub detection_window_ms: u32,

    /// Collaboration lifetime in milliseconds.
    #[serde(default = "default_collaboration_duration_ms")]
    pub collaboration_duration_ms: u32,

    /// Maximum simultaneously active collaborations.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Minimum simulated milliseconds between detector runs.
    #[serde(default = "default_throttle_ms")]
    pub throttle_ms: u32,
}

impl Default for DetectorSection {
    fn default() -> Self {
        Self {
            detection_window_ms: default_detection_window_ms(),
            collaboration_duration_ms: default_collaboration_duration_ms(),
            max_concurrent: default_max_concurrent(),
            throttle_ms: default_throttle_ms(),
        }
    }
}

/// Courier parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CourierSection {
    /// Whether the courier takes part in the simulation.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Courier home position.
    #[serde(default = "default_courier_home")]
    pub home: FloorPoint,

    /// Floor units per second.
    #[serde(default = "default_courier_speed")]
    pub speed: f64,

    /// Seconds spent at each destination.
    #[serde(default = "default_dwell_seconds")]
    pub dwell_seconds: f64,

    /// Named destinations the courier can be sent to.
    #[serde(default = "default_destinations")]
    pub destinations: BTreeMap<String, FloorPoint>,
}

impl Default for CourierSection {
    fn default() -> Self {
        Self {
            enabled: true,
            home: default_courier_home(),
            speed: default_courier_speed(),
            dwell_seconds: default_dwell_seconds(),
            destinations: default_destinations(),
        }
    }
}

/// Event feed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedSection {
    /// Maximum events kept in the rolling feed.
    #[serde(default = "default_feed_capacity")]
    pub capacity: usize,

    /// JSON file replayed as the event feed.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            capacity: default_feed_capacity(),
            path: None,
        }
    }
}

impl FeedSection {
    /// Apply the `WORKFLOOR_EVENTS` override.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var(EVENTS_PATH_ENV)
            && !path.is_empty()
        {
            self.path = Some(path);
        }
    }
}

/// Tick cadence and run bounds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationSection {
    /// Simulated milliseconds per tick (one rendered frame).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u32,

    /// Stop after this many ticks (0 = unbounded).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Sleep for the tick interval between ticks.
    #[serde(default)]
    pub realtime: bool,

    /// Stop once the feed is exhausted and the office is quiet.
    #[serde(default = "default_true")]
    pub stop_when_idle: bool,

    /// Simulated start time (RFC 3339). Defaults to the wall clock.
    #[serde(default)]
    pub start_time: Option<String>,
}

impl SimulationSection {
    /// Parsed `start_time`, if configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `start_time` is not RFC 3339.
    pub fn start_time(&self) -> Result<Option<DateTime<Utc>>, ConfigError> {
        self.start_time
            .as_deref()
            .map(|raw| {
                parse_timestamp(raw).ok_or_else(|| ConfigError::Invalid {
                    reason: format!("simulation.start_time is not RFC 3339: {raw}"),
                })
            })
            .transpose()
    }
}

impl Default for SimulationSection {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            max_ticks: default_max_ticks(),
            realtime: false,
            stop_when_idle: true,
            start_time: None,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `text` or `json`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Whether JSON output is requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_true() -> bool {
    true
}

const fn default_collision_radius() -> f64 {
    workfloor_world::path::DEFAULT_COLLISION_RADIUS
}

const fn default_detour_distance() -> f64 {
    workfloor_world::path::DEFAULT_DETOUR_DISTANCE
}

const fn default_walk_speed() -> f64 {
    3.0
}

const fn default_gait_cadence() -> f64 {
    8.0
}

const fn default_facing_lookahead() -> f64 {
    0.05
}

const fn default_desk_offset() -> f64 {
    0.8
}

const fn default_meeting_offset() -> f64 {
    1.5
}

const fn default_detection_window_ms() -> u32 {
    5000
}

const fn default_collaboration_duration_ms() -> u32 {
    8000
}

const fn default_max_concurrent() -> usize {
    3
}

const fn default_throttle_ms() -> u32 {
    500
}

const fn default_courier_home() -> FloorPoint {
    FloorPoint { x: 12.0, z: 8.0 }
}

const fn default_courier_speed() -> f64 {
    4.0
}

const fn default_dwell_seconds() -> f64 {
    2.0
}

fn default_destinations() -> BTreeMap<String, FloorPoint> {
    BTreeMap::from([
        (String::from("leadership"), FloorPoint { x: -4.0, z: -10.0 }),
        (String::from("engineering"), FloorPoint { x: 0.0, z: -2.0 }),
        (String::from("design"), FloorPoint { x: 8.0, z: 4.0 }),
    ])
}

const fn default_feed_capacity() -> usize {
    200
}

const fn default_tick_interval_ms() -> u32 {
    50
}

const fn default_max_ticks() -> u64 {
    2400
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("text")
}
