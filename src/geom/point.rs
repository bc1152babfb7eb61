use crate::Vector;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Position in the body-fixed frame [m].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// True when the separation from `other` is below the geometric epsilon.
    pub fn is_close(&self, other: &Self) -> bool {
        (*self - *other).length() < EPS
    }

    /// Copy with every coordinate multiplied by `factor`.
    ///
    /// Shape models are often published in kilometers; the scaling happens
    /// once at load time so everything downstream works in meters.
    pub fn scale(&self, factor: f64) -> Self {
        Self::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Moving a point along a vector gives a point.
impl Add<Vector> for Point {
    type Output = Point;
    fn add(self, offset: Vector) -> Self {
        Self::new(self.x + offset.dx, self.y + offset.dy, self.z + offset.dz)
    }
}

/// The difference of two points is the vector leading from `other` to `self`.
impl Sub for Point {
    type Output = Vector;
    fn sub(self, other: Self) -> Vector {
        Vector::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_close_uses_distance() {
        let p = Point::new(5.0, 5.0, 5.0);
        assert!(p.is_close(&Point::new(5.0 + 1e-14, 5.0, 5.0)));
        assert!(!p.is_close(&Point::new(5.0 + 1e-6, 5.0, 5.0)));
    }

    #[test]
    fn test_scale_km_to_m() {
        let p = Point::new(0.5, -1.25, 2.0).scale(1000.0);
        assert!(p.is_close(&Point::new(500.0, -1250.0, 2000.0)));
    }

    #[test]
    fn test_offset_and_difference_are_inverse() {
        let p = Point::new(1.0, 2.0, 3.0);
        let v = Vector::new(-0.5, 4.0, 0.25);
        let q = p + v;
        assert!((q - p).is_close(&v));
    }
}
