//! Geometric primitives for planar and spherical layout.
//!
//! # Overview
//!
//! - [`Point`] - A 2D coordinate in a cluster's local (tangent) plane
//!
//! Directions on the unit sphere and world-space positions use
//! `glam::DVec3`.
//!
//! # Coordinate System
//!
//! Spatial coordinates are right-handed with the origin at the sphere's
//! center. World positions produced by the engine all lie at distance
//! `sphere_radius` from that origin.
//!
//! ```text
//!          +Y
//!           │
//!           │
//!           └────► +X
//!          ╱
//!        +Z
//! ```

use serde::{Deserialize, Serialize};

/// A 2D point in a planar layout.
///
/// # Examples
///
/// ```
/// # use constellation_core::geometry::Point;
/// let p1 = Point::new(3.0, 4.0);
/// let p2 = Point::new(1.0, 1.0);
///
/// assert_eq!(p1.hypot(), 5.0);
/// assert_eq!(p1.sub_point(p2), Point::new(2.0, 3.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f64,
    y: f64,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f64 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f64 {
        self.y
    }

    /// Checks if both x and y coordinates are zero
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the Euclidean distance from the origin
    pub fn hypot(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns `true` if both coordinates are finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}
