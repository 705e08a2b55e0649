//! Pure pursuit steering law

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use crate::geom::{Circle, Line, Transform};
use crate::kin::DiffDriveState;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Steer the robot towards a lookahead point on the path.
///
/// Fits the circle tangent to the robot's current pose which passes through
/// the lookahead point, then drives along it at the demanded linear
/// velocity. The turn radius is signed by which side of the robot's heading
/// line the circle center falls on, +ve radius turning left.
///
/// Degenerate geometry (lookahead point dead ahead or behind) inherits the
/// sentinel circle fit and commands an effectively straight line.
pub fn pure_pursuit(
    robot: &Transform,
    lookahead_point_m: &Vector2<f64>,
    linear_velocity_ms: f64,
    track_width_m: f64,
) -> DiffDriveState {
    let circle = Circle::from_tangent(robot, lookahead_point_m);
    let side = Line::from_transform(robot).find_side(&circle.center_m);

    DiffDriveState::from_linear_and_radius(
        linear_velocity_ms,
        circle.radius_m * side,
        track_width_m,
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_turns_towards_point() {
        let robot = Transform::from_parts(0.0, 0.0, 0.0);

        // Point up and to the left: left turn, so +ve angular velocity and a
        // faster right wheel
        let state = pure_pursuit(&robot, &Vector2::new(0.0, 2.0), 1.0, 0.5);
        assert!(state.angular_rads > 0.0);
        assert!(state.right_ms > state.left_ms);

        // Mirrored point: right turn
        let state = pure_pursuit(&robot, &Vector2::new(0.0, -2.0), 1.0, 0.5);
        assert!(state.angular_rads < 0.0);
        assert!(state.left_ms > state.right_ms);
    }

    #[test]
    fn test_known_radius() {
        // Tangent at the origin along +X through (0, 2) is the radius 1
        // circle, so the angular velocity is linear/radius
        let robot = Transform::from_parts(0.0, 0.0, 0.0);
        let state = pure_pursuit(&robot, &Vector2::new(0.0, 2.0), 1.5, 0.5);

        assert!((state.angular_rads - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_point_dead_ahead_drives_straight() {
        let robot = Transform::from_parts(0.0, 0.0, 0.0);
        let state = pure_pursuit(&robot, &Vector2::new(5.0, 0.0), 1.0, 0.5);

        // The sentinel radius makes the turn imperceptible
        assert!(state.angular_rads.abs() < 1e-12);
        assert!((state.left_ms - 1.0).abs() < 1e-9);
        assert!((state.right_ms - 1.0).abs() < 1e-9);
    }
}
