//! Transform (pose) primitive

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

// Internal
use super::Rotation;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A pose on the XY plane - a position plus a heading.
///
/// Transforms describe both robot poses and spline endpoint configurations.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Position in the plane in meters
    pub position_m: Vector2<f64>,

    /// Heading at the position
    pub rotation: Rotation,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Transform {
    /// Create a new transform from a position vector and a rotation.
    pub fn new(position_m: Vector2<f64>, rotation: Rotation) -> Self {
        Self {
            position_m,
            rotation,
        }
    }

    /// Create a new transform from raw position components and a heading.
    pub fn from_parts(x_m: f64, y_m: f64, heading_rad: f64) -> Self {
        Self::new(Vector2::new(x_m, y_m), Rotation::new(heading_rad))
    }

    /// The euclidean distance between the positions of this and `other`.
    ///
    /// The headings play no part in the distance.
    pub fn distance(&self, other: &Transform) -> f64 {
        (other.position_m - self.position_m).norm()
    }

    /// Rotate this transform about an arbitrary origin point.
    ///
    /// The position is rotated about `origin_m` and the heading is advanced by
    /// the same rotation.
    pub fn rotate_around(&self, origin_m: &Vector2<f64>, rotation: Rotation) -> Self {
        Self {
            position_m: rotation.rotate_vector(&(self.position_m - origin_m)) + origin_m,
            rotation: self.rotation + rotation,
        }
    }
}

impl Add for Transform {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            position_m: self.position_m + other.position_m,
            rotation: self.rotation + other.rotation,
        }
    }
}

impl Sub for Transform {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            position_m: self.position_m - other.position_m,
            rotation: self.rotation - other.rotation,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_distance() {
        let a = Transform::from_parts(0.0, 0.0, 0.0);
        let b = Transform::from_parts(3.0, 4.0, 1.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn test_rotate_around() {
        let t = Transform::from_parts(1.0, 0.0, 0.0);
        let rotated = t.rotate_around(&Vector2::new(0.0, 0.0), Rotation::new(FRAC_PI_2));

        assert!(rotated.position_m[0].abs() < 1e-12);
        assert!((rotated.position_m[1] - 1.0).abs() < 1e-12);
        assert!((rotated.rotation.radians - FRAC_PI_2).abs() < 1e-12);
    }
}
