//! Route planning and interpolation on the office floor.
//!
//! Agents do not pathfind over a full obstacle map. A route is the straight
//! segment between two points unless some desk sits too close to it, in
//! which case a single waypoint is pushed sideways from the segment midpoint
//! and the route bends around it.
//!
//! # Algorithm
//!
//! 1. Take the direct segment from `from` to `to`.
//! 2. For every desk not listed in `ignore` and not standing on either
//!    endpoint, project it onto the segment. Desks whose projection falls
//!    outside the segment are skipped; for the rest, compare the
//!    perpendicular distance with the collision radius.
//! 3. The first desk (identifier order) inside the radius triggers a detour:
//!    `[from, midpoint + perpendicular * detour_distance, to]`.
//! 4. Otherwise the route is `[from, to]`.
//!
//! Several simultaneous obstructions are not avoided individually; only the
//! first one bends the route.

use workfloor_types::{AgentId, Position};

use crate::error::WorldError;
use crate::layout::DeskLayout;

/// Lengths below this are treated as zero.
const EPSILON: f64 = 1e-9;

/// Default distance from a segment at which a desk blocks it.
pub const DEFAULT_COLLISION_RADIUS: f64 = 1.2;

/// Default sideways offset of a detour waypoint.
pub const DEFAULT_DETOUR_DISTANCE: f64 = 2.0;

// ---------------------------------------------------------------------------
// Path
// ---------------------------------------------------------------------------

/// An ordered waypoint sequence with its travelled length.
///
/// The first point is the requested start, the last point the requested
/// end, and every point lies on the ground plane. `total_distance` is the
/// sum of the segment lengths, not the straight-line distance.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Path {
    points: Vec<Position>,
    total_distance: f64,
}

impl Path {
    fn through(points: Vec<Position>) -> Self {
        let total_distance = points
            .windows(2)
            .map(|pair| match pair {
                [a, b] => a.distance_to(*b),
                _ => 0.0,
            })
            .sum();
        Self {
            points,
            total_distance,
        }
    }

    /// Waypoints from start to end.
    pub fn points(&self) -> &[Position] {
        &self.points
    }

    /// First waypoint.
    pub fn start(&self) -> Position {
        self.points.first().copied().unwrap_or_default()
    }

    /// Last waypoint.
    pub fn end(&self) -> Position {
        self.points.last().copied().unwrap_or_default()
    }

    /// Sum of all segment lengths.
    pub const fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Whether a detour waypoint was inserted.
    pub fn has_detour(&self) -> bool {
        self.points.len() > 2
    }
}

/// Straight two-point path, without any obstruction check.
pub fn direct_path(from: Position, to: Position) -> Path {
    Path::through(vec![from.on_ground(), to.on_ground()])
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Plans routes between desks, detouring around at most one obstruction.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PathPlanner {
    /// Perpendicular distance below which a desk blocks a segment.
    pub collision_radius: f64,
    /// Sideways offset of the detour waypoint from the segment midpoint.
    pub detour_distance: f64,
}

impl Default for PathPlanner {
    fn default() -> Self {
        Self {
            collision_radius: DEFAULT_COLLISION_RADIUS,
            detour_distance: DEFAULT_DETOUR_DISTANCE,
        }
    }
}

impl PathPlanner {
    /// Create a planner with explicit parameters.
    ///
    /// # Errors
    ///
    /// Returns [`WorldError::InvalidGeometry`] if the collision radius is
    /// negative or not finite, or the detour distance is not positive.
    pub fn new(collision_radius: f64, detour_distance: f64) -> Result<Self, WorldError> {
        if !collision_radius.is_finite() || collision_radius < 0.0 {
            return Err(WorldError::InvalidGeometry {
                reason: format!("collision radius must be >= 0, got {collision_radius}"),
            });
        }
        if !detour_distance.is_finite() || detour_distance <= 0.0 {
            return Err(WorldError::InvalidGeometry {
                reason: format!("detour distance must be > 0, got {detour_distance}"),
            });
        }
        Ok(Self {
            collision_radius,
            detour_distance,
        })
    }

    /// Plan a route from `from` to `to`.
    ///
    /// Desks belonging to the agents in `ignore` (normally the walker and
    /// the agent being visited) never count as obstructions. The result is
    /// deterministic for identical inputs.
    pub fn plan(
        &self,
        from: Position,
        to: Position,
        layout: &DeskLayout,
        ignore: &[&AgentId],
    ) -> Path {
        let from = from.on_ground();
        let to = to.on_ground();

        let length = from.distance_to(to);
        if length < EPSILON {
            return direct_path(from, to);
        }

        if self.find_obstruction(from, to, layout, ignore).is_none() {
            return direct_path(from, to);
        }

        let dx = (to.x - from.x) / length;
        let dz = (to.z - from.z) / length;
        let waypoint = from
            .lerp(to, 0.5)
            .offset(-dz * self.detour_distance, dx * self.detour_distance);

        Path::through(vec![from, waypoint, to])
    }

    /// First desk (in identifier order) that blocks the segment.
    pub fn find_obstruction<'a>(
        &self,
        from: Position,
        to: Position,
        layout: &'a DeskLayout,
        ignore: &[&AgentId],
    ) -> Option<&'a AgentId> {
        layout
            .desks()
            .filter(|(agent, _)| !ignore.contains(agent))
            .filter(|(_, desk)| {
                desk.distance_to(from) >= EPSILON && desk.distance_to(to) >= EPSILON
            })
            .find(|(_, desk)| {
                distance_to_segment(**desk, from, to)
                    .is_some_and(|distance| distance < self.collision_radius)
            })
            .map(|(agent, _)| agent)
    }
}

/// Perpendicular distance from `point` to the segment `from`-`to`.
///
/// Returns `None` when the projection of `point` falls outside the segment
/// or the segment has no length.
pub fn distance_to_segment(point: Position, from: Position, to: Position) -> Option<f64> {
    let length = from.distance_to(to);
    if length < EPSILON {
        return None;
    }
    let dx = (to.x - from.x) / length;
    let dz = (to.z - from.z) / length;
    let px = point.x - from.x;
    let pz = point.z - from.z;

    let along = px.mul_add(dx, pz * dz);
    if !(0.0..=length).contains(&along) {
        return None;
    }
    Some(px.mul_add(dz, -(pz * dx)).abs())
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Position at `progress` (clamped to `[0, 1]`) along `path`.
///
/// Progress is measured in travelled distance, so a detour path is walked
/// at constant speed across both of its segments. `0` returns the first
/// point and `1` the last point verbatim.
pub fn position_at(path: &Path, progress: f64) -> Position {
    let progress = if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    };
    let start = path.start();
    let end = path.end();

    if progress <= 0.0 || path.total_distance < EPSILON {
        return start;
    }
    if progress >= 1.0 {
        return end;
    }

    if let [a, b] = path.points.as_slice() {
        return a.lerp(*b, progress);
    }

    let mut remaining = progress * path.total_distance;
    for pair in path.points.windows(2) {
        let [a, b] = pair else { continue };
        let segment = a.distance_to(*b);
        if remaining <= segment {
            let t = if segment < EPSILON {
                0.0
            } else {
                remaining / segment
            };
            return a.lerp(*b, t);
        }
        remaining -= segment;
    }
    end
}

/// Bearing from `from` to `to` in the ground plane.
///
/// Uses `atan2(dx, dz)`: moving along `+z` faces 0, along `+x` faces
/// `+PI/2`, along `-z` faces `PI`.
pub fn facing_angle(from: Position, to: Position) -> f64 {
    (to.x - from.x).atan2(to.z - from.z)
}
