use crate::Point;
use crate::geom::EPS;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Sub};

/// Displacement or direction in the body-fixed frame.
///
/// Sun directions and facet normals are carried as plain vectors; the
/// illumination and visibility tests expect them normalized, and
/// [`Vector::normalize`] reports degenerate input as None rather than
/// producing infinities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub dx: f64,
    pub dy: f64,
    pub dz: f64,
}

impl Vector {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self { dx, dy, dz }
    }

    pub fn dot(self, other: Self) -> f64 {
        self.dx * other.dx + self.dy * other.dy + self.dz * other.dz
    }

    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.dy * other.dz - self.dz * other.dy,
            self.dz * other.dx - self.dx * other.dz,
            self.dx * other.dy - self.dy * other.dx,
        )
    }

    pub fn length(&self) -> f64 {
        self.dot(*self).sqrt()
    }

    /// Unit vector in the same direction, or None when the length is below
    /// the geometric epsilon.
    pub fn normalize(&self) -> Option<Self> {
        let len = self.length();
        if len < EPS {
            return None;
        }
        Some(Self::new(self.dx / len, self.dy / len, self.dz / len))
    }

    /// True when the difference to `other` is shorter than the geometric
    /// epsilon.
    pub fn is_close(&self, other: &Self) -> bool {
        (*self - *other).length() < EPS
    }
}

/// Position vector of a point relative to the frame origin.
impl From<Point> for Vector {
    fn from(pt: Point) -> Self {
        Self::new(pt.x, pt.y, pt.z)
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3}, {:.3}]", self.dx, self.dy, self.dz)
    }
}

impl Add for Vector {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self::new(self.dx + other.dx, self.dy + other.dy, self.dz + other.dz)
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, other: Self) -> Self {
        Self::new(self.dx - other.dx, self.dy - other.dy, self.dz - other.dz)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;
    fn mul(self, factor: f64) -> Self {
        Self::new(self.dx * factor, self.dy * factor, self.dz * factor)
    }
}
