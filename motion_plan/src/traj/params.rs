//! Trajectory generation parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters bounding a single path traversal.
///
/// These are immutable for the lifetime of a [`super::PathTrajectory`] and
/// are validated when the trajectory is created.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryParams {
    /// Maximum forward acceleration in m/s^2
    pub max_acceleration_ms2: f64,

    /// Maximum deceleration (braking) in m/s^2
    pub max_deceleration_ms2: f64,

    /// Maximum forward velocity in m/s
    pub max_velocity_ms: f64,

    /// Maximum angular velocity in rad/s, limiting speed through turns
    pub max_angular_velocity_rads: f64,

    /// Velocity at the start of the path in m/s
    pub start_velocity_ms: f64,

    /// Velocity to arrive at the end of the path with in m/s
    pub end_velocity_ms: f64,

    /// Floor below which the curvature ceiling will not push the velocity,
    /// preventing the robot stalling in very tight turns. In m/s.
    pub min_velocity_ms: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors raised by trajectory configuration and creation.
#[derive(Debug, thiserror::Error)]
pub enum TrajectoryError {
    #[error("max_acceleration_ms2 must be positive, got {0}")]
    InvalidMaxAcceleration(f64),

    #[error("max_deceleration_ms2 must be positive, got {0}")]
    InvalidMaxDeceleration(f64),

    #[error("max_velocity_ms must be positive, got {0}")]
    InvalidMaxVelocity(f64),

    #[error("max_angular_velocity_rads must be positive, got {0}")]
    InvalidMaxAngularVelocity(f64),

    #[error("Boundary velocity {0} must be non-negative, got {1}")]
    NegativeBoundaryVelocity(&'static str, f64),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectoryParams {
    /// Check the parameters describe a physically followable profile.
    ///
    /// The limits must be strictly positive, and the boundary velocities
    /// non-negative. Velocities here are all forward speeds so negatives
    /// have no meaning.
    pub fn validate(&self) -> Result<(), TrajectoryError> {
        if !(self.max_acceleration_ms2 > 0.0) {
            return Err(TrajectoryError::InvalidMaxAcceleration(
                self.max_acceleration_ms2,
            ));
        }
        if !(self.max_deceleration_ms2 > 0.0) {
            return Err(TrajectoryError::InvalidMaxDeceleration(
                self.max_deceleration_ms2,
            ));
        }
        if !(self.max_velocity_ms > 0.0) {
            return Err(TrajectoryError::InvalidMaxVelocity(self.max_velocity_ms));
        }
        if !(self.max_angular_velocity_rads > 0.0) {
            return Err(TrajectoryError::InvalidMaxAngularVelocity(
                self.max_angular_velocity_rads,
            ));
        }
        if self.start_velocity_ms < 0.0 {
            return Err(TrajectoryError::NegativeBoundaryVelocity(
                "start_velocity_ms",
                self.start_velocity_ms,
            ));
        }
        if self.end_velocity_ms < 0.0 {
            return Err(TrajectoryError::NegativeBoundaryVelocity(
                "end_velocity_ms",
                self.end_velocity_ms,
            ));
        }
        if self.min_velocity_ms < 0.0 {
            return Err(TrajectoryError::NegativeBoundaryVelocity(
                "min_velocity_ms",
                self.min_velocity_ms,
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn valid_params() -> TrajectoryParams {
        TrajectoryParams {
            max_acceleration_ms2: 1.0,
            max_deceleration_ms2: 1.0,
            max_velocity_ms: 2.0,
            max_angular_velocity_rads: 4.0,
            start_velocity_ms: 0.0,
            end_velocity_ms: 0.0,
            min_velocity_ms: 0.0,
        }
    }

    #[test]
    fn test_valid_params_accepted() {
        assert!(valid_params().validate().is_ok());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let mut params = valid_params();
        params.max_acceleration_ms2 = 0.0;
        assert!(matches!(
            params.validate(),
            Err(TrajectoryError::InvalidMaxAcceleration(_))
        ));

        let mut params = valid_params();
        params.max_deceleration_ms2 = -2.0;
        assert!(matches!(
            params.validate(),
            Err(TrajectoryError::InvalidMaxDeceleration(_))
        ));

        let mut params = valid_params();
        params.max_velocity_ms = f64::NAN;
        assert!(matches!(
            params.validate(),
            Err(TrajectoryError::InvalidMaxVelocity(_))
        ));

        let mut params = valid_params();
        params.start_velocity_ms = -0.1;
        assert!(matches!(
            params.validate(),
            Err(TrajectoryError::NegativeBoundaryVelocity("start_velocity_ms", _))
        ));
    }
}
