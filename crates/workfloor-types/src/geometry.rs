//! Ground-plane positions.
//!
//! The office is a 2D simulation embedded in 3D space for the renderer:
//! every position lives on the plane `y = GROUND_Y`, and all distances and
//! bearings are computed in the `x`/`z` plane.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Vertical coordinate shared by every simulated position.
pub const GROUND_Y: f64 = 0.0;

/// A point on the office floor.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Position {
    /// Horizontal axis.
    pub x: f64,
    /// Vertical axis, always [`GROUND_Y`] inside the simulation.
    pub y: f64,
    /// Depth axis. Facing angle 0 points along `+z`.
    pub z: f64,
}

impl Position {
    /// Create a position from all three coordinates.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a position on the ground plane.
    pub const fn ground(x: f64, z: f64) -> Self {
        Self { x, y: GROUND_Y, z }
    }

    /// Project this position onto the ground plane.
    #[must_use]
    pub const fn on_ground(self) -> Self {
        Self::ground(self.x, self.z)
    }

    /// Translate by an in-plane offset.
    #[must_use]
    pub fn offset(self, dx: f64, dz: f64) -> Self {
        Self::ground(self.x + dx, self.z + dz)
    }

    /// In-plane distance to another position.
    pub fn distance_to(self, other: Self) -> f64 {
        (other.x - self.x).hypot(other.z - self.z)
    }

    /// Linear interpolation toward `other` by `t` (not clamped).
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self::ground(
            (other.x - self.x).mul_add(t, self.x),
            (other.z - self.z).mul_add(t, self.z),
        )
    }

    /// Whether two positions coincide within `epsilon` on every axis.
    pub fn approx_eq(self, other: Self, epsilon: f64) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

impl core::fmt::Display for Position {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2})", self.x, self.y, self.z)
    }
}
