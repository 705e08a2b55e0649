//! # Differential drive kinematics
//!
//! Conversions between the chassis frame (linear and angular velocity) and
//! per-wheel speeds for a differential drive of a given track width.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use crate::geom::Rotation;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The instantaneous motion state of a differential drive chassis.
///
/// Linear velocity is taken at the chassis center, angular velocity is
/// positive counter-clockwise, and the wheel speeds follow from the track
/// width `L`: `left = omega * (r - L/2)`, `right = omega * (r + L/2)`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct DiffDriveState {
    /// Linear velocity of the chassis center in m/s
    pub linear_ms: f64,

    /// Angular velocity of the chassis in rad/s, +ve counter-clockwise
    pub angular_rads: f64,

    /// Left wheel ground speed in m/s
    pub left_ms: f64,

    /// Right wheel ground speed in m/s
    pub right_ms: f64,

    /// Track width (wheel to wheel separation) in meters
    pub track_width_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DiffDriveState {
    /// Build the state from chassis linear and angular velocities.
    ///
    /// A ~zero angular velocity is treated as driving straight, with both
    /// wheels at the linear velocity, rather than evaluating the infinite
    /// turn radius.
    pub fn from_linear_and_angular(linear_ms: f64, angular_rads: f64, track_width_m: f64) -> Self {
        if angular_rads.abs() <= std::f64::EPSILON {
            return Self {
                linear_ms,
                angular_rads: 0.0,
                left_ms: linear_ms,
                right_ms: linear_ms,
                track_width_m,
            };
        }

        let radius_m = linear_ms / angular_rads;

        Self {
            linear_ms,
            angular_rads,
            left_ms: angular_rads * (radius_m - track_width_m / 2.0),
            right_ms: angular_rads * (radius_m + track_width_m / 2.0),
            track_width_m,
        }
    }

    /// Build the state from a linear velocity and a signed turn radius.
    pub fn from_linear_and_radius(linear_ms: f64, radius_m: f64, track_width_m: f64) -> Self {
        Self::from_linear_and_angular(linear_ms, linear_ms / radius_m, track_width_m)
    }

    /// Build the state from a linear velocity and a signed curvature.
    pub fn from_linear_and_curvature(linear_ms: f64, curvature: f64, track_width_m: f64) -> Self {
        Self::from_linear_and_radius(linear_ms, 1.0 / curvature, track_width_m)
    }

    /// Build the state from an angular velocity and a signed turn radius.
    pub fn from_angular_and_radius(angular_rads: f64, radius_m: f64, track_width_m: f64) -> Self {
        Self::from_linear_and_angular(radius_m * angular_rads, angular_rads, track_width_m)
    }

    /// Build the state from an angular velocity and a signed curvature.
    pub fn from_angular_and_curvature(
        angular_rads: f64,
        curvature: f64,
        track_width_m: f64,
    ) -> Self {
        Self::from_angular_and_radius(angular_rads, 1.0 / curvature, track_width_m)
    }

    /// Build the state from the two wheel ground speeds.
    pub fn from_wheels(left_ms: f64, right_ms: f64, track_width_m: f64) -> Self {
        Self::from_linear_and_angular(
            (left_ms + right_ms) / 2.0,
            (right_ms - left_ms) / track_width_m,
            track_width_m,
        )
    }

    /// The chassis velocity vector for a given heading.
    pub fn get_velocity_vector(&self, heading: &Rotation) -> Vector2<f64> {
        heading.to_vector(self.linear_ms)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The linear velocity of a chassis turning at `angular_rads` about a radius.
pub fn calculate_linear(angular_rads: f64, radius_m: f64) -> f64 {
    radius_m * angular_rads
}

/// The angular velocity of a chassis moving at `linear_ms` about a radius.
pub fn calculate_angular(linear_ms: f64, radius_m: f64) -> f64 {
    linear_ms / radius_m
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wheel_round_trip() {
        let state = DiffDriveState::from_linear_and_angular(1.5, 0.8, 0.5);
        let back = DiffDriveState::from_wheels(state.left_ms, state.right_ms, 0.5);

        assert!((back.linear_ms - 1.5).abs() < 1e-9);
        assert!((back.angular_rads - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line() {
        // Zero angular velocity must not produce NaN wheel speeds
        let state = DiffDriveState::from_linear_and_angular(2.0, 0.0, 0.4);
        assert_eq!(state.left_ms, 2.0);
        assert_eq!(state.right_ms, 2.0);
    }

    #[test]
    fn test_turn_direction() {
        // +ve angular velocity is a left turn, so the right wheel is faster
        let state = DiffDriveState::from_linear_and_angular(1.0, 0.5, 0.5);
        assert!(state.right_ms > state.left_ms);
        assert!((state.right_ms - state.left_ms - 0.5 * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_point_turn() {
        // Zero linear velocity spins in place with opposing wheels
        let state = DiffDriveState::from_angular_and_radius(1.0, 0.0, 0.6);
        assert!((state.left_ms + 0.3).abs() < 1e-12);
        assert!((state.right_ms - 0.3).abs() < 1e-12);
    }
}
