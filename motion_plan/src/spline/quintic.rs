//! Quintic Hermite spline

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

/// A quintic Hermite spline between two endpoint poses.
///
/// In addition to the cubic's endpoint velocities the quintic also
/// interpolates endpoint acceleration vectors, which gives enough freedom to
/// demand a specific curvature at each endpoint (see
/// [`QuinticHermiteSpline::with_curvatures`]). Consecutive splines built with
/// matching endpoint curvatures join without a curvature step, which is what
/// the trajectory generator needs to avoid spurious slow-downs at waypoint
/// boundaries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct QuinticHermiteSpline {
    /// Start pose of the spline
    pub transform_0: Transform,

    /// End pose of the spline
    pub transform_1: Transform,

    /// Velocity (tangent) vector at the start pose
    pub velocity_0: Vector2<f64>,

    /// Velocity (tangent) vector at the end pose
    pub velocity_1: Vector2<f64>,

    /// Acceleration vector at the start pose
    pub acceleration_0: Vector2<f64>,

    /// Acceleration vector at the end pose
    pub acceleration_1: Vector2<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl QuinticHermiteSpline {
    /// Create a new spline between two poses with default velocity vectors
    /// and zero accelerations.
    ///
    /// As for the cubic, the default tangent at each endpoint points along
    /// that endpoint's heading with magnitude equal to the inter-endpoint
    /// distance.
    pub fn new(transform_0: Transform, transform_1: Transform) -> Self {
        let distance_m = transform_0.distance(&transform_1);

        Self {
            transform_0,
            transform_1,
            velocity_0: transform_0.rotation.to_vector(distance_m),
            velocity_1: transform_1.rotation.to_vector(distance_m),
            acceleration_0: Vector2::zeros(),
            acceleration_1: Vector2::zeros(),
        }
    }

    /// Create a new spline between two poses with explicit velocity and
    /// acceleration vectors.
    pub fn with_vectors(
        transform_0: Transform,
        transform_1: Transform,
        velocity_0: Vector2<f64>,
        velocity_1: Vector2<f64>,
        acceleration_0: Vector2<f64>,
        acceleration_1: Vector2<f64>,
    ) -> Self {
        Self {
            transform_0,
            transform_1,
            velocity_0,
            velocity_1,
            acceleration_0,
            acceleration_1,
        }
    }

    /// Create a new spline demanding a specific curvature at each endpoint.
    ///
    /// The acceleration vectors are derived from the desired curvatures and
    /// directed along the endpoint normals (heading + 90 degrees). With the
    /// default velocity vectors this achieves the demanded curvature exactly
    /// at each endpoint: tangential acceleration has no effect on curvature,
    /// only the normal component bends the curve.
    pub fn with_curvatures(
        transform_0: Transform,
        transform_1: Transform,
        curvature_0: f64,
        curvature_1: f64,
    ) -> Self {
        let distance_m = transform_0.distance(&transform_1);
        let normal = Rotation::new(std::f64::consts::FRAC_PI_2);

        let mut spline = Self::new(transform_0, transform_1);
        spline.acceleration_0 = (transform_0.rotation + normal)
            .to_vector(acceleration_magnitude_from_curvature(curvature_0, distance_m));
        spline.acceleration_1 = (transform_1.rotation + normal)
            .to_vector(acceleration_magnitude_from_curvature(curvature_1, distance_m));
        spline
    }

    /// Blend the six Hermite basis coefficients with the endpoint vectors.
    fn compute_from_coefficients(&self, h: [f64; 6]) -> Vector2<f64> {
        h[0] * self.transform_0.position_m
            + h[1] * self.velocity_0
            + h[2] * self.acceleration_0
            + h[3] * self.acceleration_1
            + h[4] * self.velocity_1
            + h[5] * self.transform_1.position_m
    }
}

impl Parametric for QuinticHermiteSpline {
    fn get_vector(&self, t: f64) -> Vector2<f64> {
        // Quintic Hermite basis functions
        // https://rose-hulman.edu/~finn/CCLI/Notes/day09.pdf#page=4
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;
        let t5 = t4 * t;

        self.compute_from_coefficients([
            -6.0 * t5 + 15.0 * t4 - 10.0 * t3 + 1.0,
            -3.0 * t5 + 8.0 * t4 - 6.0 * t3 + t,
            -t5 / 2.0 + 3.0 * t4 / 2.0 - 3.0 * t3 / 2.0 + t2 / 2.0,
            t5 / 2.0 - t4 + t3 / 2.0,
            -3.0 * t5 + 7.0 * t4 - 4.0 * t3,
            6.0 * t5 - 15.0 * t4 + 10.0 * t3,
        ])
    }

    fn get_rotation(&self, t: f64) -> Rotation {
        Rotation::from_vector(&self.get_derivative(t, 1))
    }

    fn get_curvature(&self, t: f64) -> f64 {
        curvature_from_derivatives(&self.get_derivative(t, 1), &self.get_derivative(t, 2))
    }

    fn get_derivative(&self, t: f64, n: u32) -> Vector2<f64> {
        let t2 = t * t;
        let t3 = t2 * t;
        let t4 = t3 * t;

        match n {
            0 => self.get_vector(t),
            1 => self.compute_from_coefficients([
                -30.0 * t4 + 60.0 * t3 - 30.0 * t2,
                -15.0 * t4 + 32.0 * t3 - 18.0 * t2 + 1.0,
                -5.0 * t4 / 2.0 + 6.0 * t3 - 9.0 * t2 / 2.0 + t,
                5.0 * t4 / 2.0 - 4.0 * t3 + 3.0 * t2 / 2.0,
                -15.0 * t4 + 28.0 * t3 - 12.0 * t2,
                30.0 * t4 - 60.0 * t3 + 30.0 * t2,
            ]),
            2 => self.compute_from_coefficients([
                -120.0 * t3 + 180.0 * t2 - 60.0 * t,
                -60.0 * t3 + 96.0 * t2 - 36.0 * t,
                -10.0 * t3 + 18.0 * t2 - 9.0 * t + 1.0,
                t * (10.0 * t2 - 12.0 * t + 3.0),
                -60.0 * t3 + 84.0 * t2 - 24.0 * t,
                120.0 * t3 - 180.0 * t2 + 60.0 * t,
            ]),
            3 => self.compute_from_coefficients([
                -360.0 * t2 + 360.0 * t - 60.0,
                -180.0 * t2 + 192.0 * t - 36.0,
                -30.0 * t2 + 36.0 * t - 9.0,
                30.0 * t2 - 24.0 * t + 3.0,
                -180.0 * t2 + 168.0 * t - 24.0,
                360.0 * t2 - 360.0 * t + 60.0,
            ]),
            // Orders above 3 are not supported by the quintic
            _ => Vector2::zeros(),
        }
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The acceleration vector magnitude which achieves the given curvature at a
/// spline endpoint, for endpoints the given distance apart.
fn acceleration_magnitude_from_curvature(curvature: f64, distance_m: f64) -> f64 {
    curvature * distance_m.powi(2)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_endpoint_interpolation() {
        let spline = QuinticHermiteSpline::new(
            Transform::from_parts(-1.0, 2.0, 0.1),
            Transform::from_parts(7.0, -3.0, -0.4),
        );

        let start = spline.get_vector(0.0);
        let end = spline.get_vector(1.0);

        assert_eq!(start[0], -1.0);
        assert_eq!(start[1], 2.0);
        assert_eq!(end[0], 7.0);
        assert_eq!(end[1], -3.0);
    }

    #[test]
    fn test_endpoint_headings() {
        let spline = QuinticHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.7),
            Transform::from_parts(3.0, 4.0, -0.1),
        );

        assert!((spline.get_rotation(0.0).radians - 0.7).abs() < 1e-9);
        assert!((spline.get_rotation(1.0).radians + 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_endpoint_curvatures() {
        let spline = QuinticHermiteSpline::with_curvatures(
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(8.0, 0.0, 0.0),
            0.0,
            2.0,
        );

        assert!(spline.get_curvature(0.0).abs() < 1e-9);
        assert!((spline.get_curvature(1.0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_curvature_sign_convention() {
        // A spline curving up and to the left must have positive curvature at
        // the apex, a right hand turn negative
        let left = QuinticHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(5.0, 5.0, std::f64::consts::FRAC_PI_2),
        );
        assert!(left.get_curvature(0.5) > 0.0);

        let right = QuinticHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(5.0, -5.0, -std::f64::consts::FRAC_PI_2),
        );
        assert!(right.get_curvature(0.5) < 0.0);
    }

    #[test]
    fn test_third_derivative_nonzero() {
        let spline = QuinticHermiteSpline::new(
            Transform::from_parts(0.0, 0.0, 0.5),
            Transform::from_parts(4.0, 4.0, 0.0),
        );

        assert!(spline.get_derivative(0.5, 3).norm() > 0.0);
        assert_eq!(spline.get_derivative(0.5, 4), Vector2::zeros());
    }
}
