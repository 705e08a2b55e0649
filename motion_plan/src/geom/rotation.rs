//! Rotation (heading angle) primitive

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rotation about the Z axis, i.e. a heading on the XY plane.
///
/// The angle is stored in radians and is deliberately not normalised into any
/// canonical range, so callers must not assume `[-pi, pi]`. Angle arithmetic
/// is plain addition/subtraction with no wraparound.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rotation {
    /// The angle to the +ve X axis in radians
    pub radians: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Rotation {
    /// Create a new rotation from an angle in radians.
    pub fn new(radians: f64) -> Self {
        Self { radians }
    }

    /// Create the rotation pointing along the given direction vector.
    ///
    /// A zero vector produces a zero rotation since `atan2(0, 0) == 0`.
    pub fn from_vector(vector: &Vector2<f64>) -> Self {
        Self {
            radians: vector[1].atan2(vector[0]),
        }
    }

    /// The sine of the angle
    pub fn sin(&self) -> f64 {
        self.radians.sin()
    }

    /// The cosine of the angle
    pub fn cos(&self) -> f64 {
        self.radians.cos()
    }

    /// The tangent of the angle
    pub fn tan(&self) -> f64 {
        self.radians.tan()
    }

    /// The sinc of the angle (sin(theta)/theta), defined as 0 at theta = 0.
    pub fn sinc(&self) -> f64 {
        if self.radians == 0.0 {
            0.0
        } else {
            self.sin() / self.radians
        }
    }

    /// Get the vector of the given magnitude pointing along this rotation.
    pub fn to_vector(&self, magnitude: f64) -> Vector2<f64> {
        Vector2::new(self.cos() * magnitude, self.sin() * magnitude)
    }

    /// Rotate the given vector by this rotation about the origin.
    pub fn rotate_vector(&self, vector: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            vector[0] * self.cos() - vector[1] * self.sin(),
            vector[0] * self.sin() + vector[1] * self.cos(),
        )
    }
}

impl Add for Rotation {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.radians + other.radians)
    }
}

impl AddAssign for Rotation {
    fn add_assign(&mut self, other: Self) {
        self.radians += other.radians;
    }
}

impl Sub for Rotation {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.radians - other.radians)
    }
}

impl SubAssign for Rotation {
    fn sub_assign(&mut self, other: Self) {
        self.radians -= other.radians;
    }
}

impl Neg for Rotation {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.radians)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_sinc_zero() {
        // sinc must not divide by zero at theta = 0
        assert_eq!(Rotation::new(0.0).sinc(), 0.0);

        let r = Rotation::new(1e-4);
        assert!((r.sinc() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_vector() {
        let r = Rotation::from_vector(&Vector2::new(0.0, 2.0));
        assert!((r.radians - FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_no_normalisation() {
        // Angle arithmetic must not wrap
        let r = Rotation::new(PI) + Rotation::new(PI);
        assert!((r.radians - 2.0 * PI).abs() < 1e-12);
    }

    #[test]
    fn test_rotate_vector() {
        let v = Rotation::new(FRAC_PI_2).rotate_vector(&Vector2::new(1.0, 0.0));
        assert!(v[0].abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
    }
}
