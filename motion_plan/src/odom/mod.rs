//! # Odometry module
//!
//! Dead-reckons a pose estimate by integrating drive state over time. This
//! is the consumer of the trajectory generator's output in closed loop use:
//! the integrated pose feeds the steering law and, via
//! [`crate::traj::PathTrajectory::set_traveled_distance`], can drive the
//! trajectory's progress from measured motion instead of open loop
//! integration.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use crate::geom::{Rotation, Transform};
use crate::kin::DiffDriveState;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A differential drive odometry estimator.
///
/// Integrates either pure drive state (heading from the integrated angular
/// velocity) or drive state plus an external gyro heading. The gyro can be
/// calibrated so that an arbitrary gyro reading maps onto a desired heading.
#[derive(Debug, Clone)]
pub struct DiffDriveOdometry {
    /// Track width of the chassis in meters
    pub track_width_m: f64,

    /// The current pose estimate
    transform: Transform,

    /// Offset subtracted from gyro readings to get the heading
    calibrated_angle: Rotation,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl DiffDriveOdometry {
    /// Create a new estimator at the origin pose.
    pub fn new(track_width_m: f64) -> Self {
        Self {
            track_width_m,
            transform: Transform::default(),
            calibrated_angle: Rotation::default(),
        }
    }

    /// The current pose estimate.
    pub fn get_transform(&self) -> Transform {
        self.transform
    }

    /// Integrate one tick of drive state, taking the heading from the
    /// integrated angular velocity.
    ///
    /// The heading is advanced before the position so the translation uses
    /// the heading at the end of the tick.
    pub fn update(&mut self, state: &DiffDriveState, dt_s: f64) -> Transform {
        self.transform.rotation += Rotation::new(state.angular_rads * dt_s);
        self.transform.position_m +=
            state.get_velocity_vector(&self.transform.rotation) * dt_s;
        self.transform
    }

    /// Integrate one tick of drive state with the heading taken from an
    /// external gyro.
    pub fn update_with_gyro(
        &mut self,
        state: &DiffDriveState,
        gyro: Rotation,
        dt_s: f64,
    ) -> Transform {
        self.transform.rotation = gyro - self.calibrated_angle;
        self.transform.position_m +=
            state.get_velocity_vector(&self.transform.rotation) * dt_s;
        self.transform
    }

    /// Integrate one tick from raw wheel speeds.
    pub fn update_from_wheels(&mut self, left_ms: f64, right_ms: f64, dt_s: f64) -> Transform {
        let state = DiffDriveState::from_wheels(left_ms, right_ms, self.track_width_m);
        self.update(&state, dt_s)
    }

    /// Calibrate the gyro so that `current_angle` reads as `desired_angle`.
    pub fn calibrate_gyro(&mut self, current_angle: Rotation, desired_angle: Rotation) {
        self.calibrated_angle = current_angle - desired_angle;
        self.transform.rotation = desired_angle;
    }

    /// Reset the pose estimate, calibrating the gyro onto the new heading.
    pub fn set_transform(&mut self, transform: Transform, current_angle: Rotation) {
        self.transform.position_m = transform.position_m;
        self.calibrate_gyro(current_angle, transform.rotation);
    }

    /// Reset just the position estimate, leaving the heading untouched.
    pub fn set_position(&mut self, position_m: Vector2<f64>) {
        self.transform.position_m = position_m;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};
    use util::maths::get_ang_dist_2pi;

    #[test]
    fn test_straight_line_integration() {
        let mut odom = DiffDriveOdometry::new(0.5);
        let state = DiffDriveState::from_linear_and_angular(1.0, 0.0, 0.5);

        for _ in 0..100 {
            odom.update(&state, 0.01);
        }

        let transform = odom.get_transform();
        assert!((transform.position_m[0] - 1.0).abs() < 1e-9);
        assert!(transform.position_m[1].abs() < 1e-9);
        assert!(transform.rotation.radians.abs() < 1e-12);
    }

    #[test]
    fn test_constant_curvature_turn() {
        // Drive half a full turn at radius 1: the robot ends up translated
        // 2 m across the turning circle with its heading reversed
        let mut odom = DiffDriveOdometry::new(0.5);
        let state = DiffDriveState::from_linear_and_radius(1.0, 1.0, 0.5);

        let num_ticks = 10000;
        let dt_s = PI / num_ticks as f64;
        for _ in 0..num_ticks {
            odom.update(&state, dt_s);
        }

        let transform = odom.get_transform();
        assert!(transform.position_m[0].abs() < 1e-2);
        assert!((transform.position_m[1] - 2.0).abs() < 1e-2);
        assert!(get_ang_dist_2pi(transform.rotation.radians, PI).abs() < 1e-6);
    }

    #[test]
    fn test_gyro_calibration() {
        let mut odom = DiffDriveOdometry::new(0.5);

        // The gyro powers up reading 1.0 rad while the robot faces +Y
        odom.calibrate_gyro(Rotation::new(1.0), Rotation::new(FRAC_PI_2));
        assert!((odom.get_transform().rotation.radians - FRAC_PI_2).abs() < 1e-12);

        // Subsequent gyro readings are corrected by the same offset
        let state = DiffDriveState::from_linear_and_angular(1.0, 0.0, 0.5);
        odom.update_with_gyro(&state, Rotation::new(1.0), 1.0);

        let transform = odom.get_transform();
        assert!((transform.rotation.radians - FRAC_PI_2).abs() < 1e-12);
        assert!(transform.position_m[0].abs() < 1e-9);
        assert!((transform.position_m[1] - 1.0).abs() < 1e-9);
    }
}
