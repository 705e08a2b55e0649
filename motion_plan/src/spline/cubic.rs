//! Cubic Hermite spline

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::{curvature_from_derivatives, Parametric};
use crate::geom::{Rotation, Transform};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A cubic Hermite spline between two endpoint poses.
///
/// The curve interpolates the endpoint positions exactly and leaves each
/// endpoint along its velocity vector. The polynomial coefficients are fully
/// determined by the construction parameters, there is no hidden state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CubicHermiteSpline {
    /// Start pose of the spline
    pub transform_0: Transform,

    /// End pose of the spline
    pub transform_1: Transform,

    /// Velocity (tangent) vector at the start pose
    pub velocity_0: Vector2<f64>,

    /// Velocity (tangent) vector at the end pose
    pub velocity_1: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CubicHermiteSpline {
    /// Create a new spline between two poses with default velocity vectors.
    ///
    /// The default tangent at each endpoint points along that endpoint's
    /// heading with magnitude equal to the distance between the endpoints,
    /// which gives a reasonable shape for waypoint following.
    pub fn new(transform_0: Transform, transform_1: Transform) -> Self {
        let distance_m = transform_0.distance(&transform_1);

        Self {
            transform_0,
            transform_1,
            velocity_0: transform_0.rotation.to_vector(distance_m),
            velocity_1: transform_1.rotation.to_vector(distance_m),
        }
    }

    /// Create a new spline between two poses with explicit velocity vectors.
    pub fn with_velocities(
        transform_0: Transform,
        transform_1: Transform,
        velocity_0: Vector2<f64>,
        velocity_1: Vector2<f64>,
    ) -> Self {
        Self {
            transform_0,
            transform_1,
            velocity_0,
            velocity_1,
        }
    }

    /// Blend the four Hermite basis coefficients with the endpoint vectors.
    fn compute_from_coefficients(&self, h: [f64; 4]) -> Vector2<f64> {
        h[0] * self.transform_0.position_m
            + h[1] * self.velocity_0
            + h[2] * self.velocity_1
            + h[3] * self.transform_1.position_m
    }
}

impl Parametric for CubicHermiteSpline {
    fn get_vector(&self, t: f64) -> Vector2<f64> {
        // Cubic Hermite basis functions
        // https://rose-hulman.edu/~finn/CCLI/Notes/day09.pdf#page=2
        self.compute_from_coefficients([
            1.0 - 3.0 * t * t + 2.0 * t * t * t,
            t - 2.0 * t * t + t * t * t,
            -(t * t) + t * t * t,
            3.0 * t * t - 2.0 * t * t * t,
        ])
    }

    fn get_rotation(&self, t: f64) -> Rotation {
        Rotation::from_vector(&self.get_derivative(t, 1))
    }

    fn get_curvature(&self, t: f64) -> f64 {
        curvature_from_derivatives(&self.get_derivative(t, 1), &self.get_derivative(t, 2))
    }

    fn get_derivative(&self, t: f64, n: u32) -> Vector2<f64> {
        match n {
            0 => self.get_vector(t),
            1 => self.compute_from_coefficients([
                6.0 * t * t - 6.0 * t,
                3.0 * t * t - 4.0 * t + 1.0,
                3.0 * t * t - 2.0 * t,
                -6.0 * t * t + 6.0 * t,
            ]),
            2 => self.compute_from_coefficients([
                12.0 * t - 6.0,
                6.0 * t - 4.0,
                6.0 * t - 2.0,
                6.0 - 12.0 * t,
            ]),
            // Orders above 2 are not supported by the cubic
            _ => Vector2::zeros(),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_endpoint_interpolation() {
        let spline = CubicHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(4.0, 3.0, 1.2),
        );

        let start = spline.get_vector(0.0);
        let end = spline.get_vector(1.0);

        // The basis functions vanish such that the endpoints are hit exactly
        assert_eq!(start[0], 0.0);
        assert_eq!(start[1], 0.0);
        assert_eq!(end[0], 4.0);
        assert_eq!(end[1], 3.0);
    }

    #[test]
    fn test_endpoint_headings() {
        let spline = CubicHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.3),
            Transform::from_parts(5.0, 1.0, -0.2),
        );

        assert!((spline.get_rotation(0.0).radians - 0.3).abs() < 1e-9);
        assert!((spline.get_rotation(1.0).radians + 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_straight_line_curvature_and_length() {
        let spline = CubicHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(10.0, 0.0, 0.0),
        );

        // A straight spline has zero curvature everywhere and exact length
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            assert!(spline.get_curvature(t).abs() < 1e-12);
        }
        assert!((spline.get_length() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_param_from_length_round_trip() {
        let spline = CubicHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(6.0, 2.0, 0.5),
        );

        let total_m = spline.get_length();
        assert!((spline.get_param_from_length(total_m) - 1.0).abs() < 1e-4);

        for i in 1..10 {
            let target_m = total_m * i as f64 / 10.0;
            let t = spline.get_param_from_length(target_m);
            assert!((spline.get_length_to(t) - target_m).abs() / total_m < 1e-4);
        }
    }

    #[test]
    fn test_degenerate_curvature_is_nan() {
        // Coincident endpoints with zero-magnitude velocities give a
        // stationary curve whose curvature is undefined
        let spline = CubicHermiteSpline::with_velocities(
            Transform::from_parts(1.0, 1.0, 0.0),
            Transform::from_parts(1.0, 1.0, 0.0),
            Vector2::zeros(),
            Vector2::zeros(),
        );

        assert!(spline.get_curvature(0.5).is_nan());
    }
}
