//! Ray casting infrastructure.
//!
//! A Ray struct and triangle intersection queries used by the visibility
//! precomputation and the sun-shadow test.

use crate::geom::triangle;
use crate::{Point, Vector};

/// A ray defined by an origin point and a direction vector.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// Origin point of the ray
    pub origin: Point,
    /// Direction vector (normalized, so `t` parameters are distances)
    pub direction: Vector,
}

impl Ray {
    /// Creates a new ray from origin point and direction vector.
    ///
    /// The direction vector is automatically normalized.
    pub fn new(origin: Point, direction: Vector) -> Option<Self> {
        let normalized = direction.normalize()?;
        Some(Self {
            origin,
            direction: normalized,
        })
    }

    /// Creates a ray from two points (origin to target).
    pub fn from_points(origin: Point, target: Point) -> Option<Self> {
        let direction = target - origin;
        Self::new(origin, direction)
    }

    /// Returns the point along the ray at parameter t.
    ///
    /// point = origin + t * direction
    pub fn point_at(&self, t: f64) -> Point {
        self.origin + self.direction * t
    }

    /// Intersection distance with a single triangle, if any.
    pub fn intersect_triangle(&self, v0: Point, v1: Point, v2: Point, eps: f64) -> Option<f64> {
        triangle::intersect(self.origin, self.direction, v0, v1, v2, eps)
    }
}
