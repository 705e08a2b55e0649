//! # Parametric spline module
//!
//! This module defines the [`Parametric`] capability - a curve on the
//! parameter `t` in `[0, 1]` which can report position, heading, curvature
//! and derivatives - together with the two concrete Hermite spline kinds and
//! the composite [`Path`].
//!
//! The arc length engine lives on the trait as provided methods: curve length
//! is computed with fixed 11-point Gauss-Legendre quadrature and inverted
//! (length to parameter) with a fixed number of Newton-Raphson iterations.
//! Both trade a small bounded error for a constant amount of work per call,
//! which keeps the per-tick cost of the trajectory generator flat.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod cubic;
pub mod path;
pub mod quintic;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use cubic::CubicHermiteSpline;
pub use path::{Path, PathError, Segment};
pub use quintic::QuinticHermiteSpline;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;

// Internal
use crate::geom::{Rotation, Transform};
use util::maths::lin_map;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// 11-point Gauss-Legendre quadrature (node, weight) pairs on [-1, 1].
const GAUSS_LEGENDRE_11: [[f64; 2]; 11] = [
    [0.0000000000000000, 0.2729250867779006],
    [-0.2695431559523450, 0.2628045445102467],
    [0.2695431559523450, 0.2628045445102467],
    [-0.5190961292068118, 0.2331937645919905],
    [0.5190961292068118, 0.2331937645919905],
    [-0.7301520055740494, 0.1862902109277343],
    [0.7301520055740494, 0.1862902109277343],
    [-0.8870625997680953, 0.1255803694649046],
    [0.8870625997680953, 0.1255803694649046],
    [-0.9782286581460570, 0.0556685671161737],
    [0.9782286581460570, 0.0556685671161737],
];

/// Number of Newton-Raphson refinement steps used when inverting length to
/// parameter. Hermite splines are smooth and single valued in arc length over
/// [0, 1] so a fixed count converges well below the quadrature error.
const NEWTON_RAPHSON_ITERATIONS: usize = 5;

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A curve parameterised on `t` in `[0, 1]`.
///
/// Values of `t` outside `[0, 1]` are permitted and evaluate the polynomial
/// beyond its endpoints, i.e. linear-ish extrapolation. See
/// [`Path::get_parametric`] for how composites resolve out of range
/// parameters.
pub trait Parametric {
    /// The position along the curve at `t`.
    fn get_vector(&self, t: f64) -> Vector2<f64>;

    /// The heading along the curve at `t`, i.e. the direction of the first
    /// derivative.
    fn get_rotation(&self, t: f64) -> Rotation;

    /// The curvature at `t` (signed, +ve curving left).
    ///
    /// Curvature is undefined (NaN) where both first derivative components
    /// vanish simultaneously. Consumers must tolerate this and treat it as
    /// straight line geometry.
    fn get_curvature(&self, t: f64) -> f64;

    /// The `n`-th derivative of the curve with respect to `t`.
    ///
    /// Order 0 is the position itself. Orders above the polynomial degree
    /// return the zero vector.
    fn get_derivative(&self, t: f64, n: u32) -> Vector2<f64>;

    /// The pose (position and heading) along the curve at `t`.
    fn get_transform(&self, t: f64) -> Transform {
        Transform::new(self.get_vector(t), self.get_rotation(t))
    }

    /// The total length of the curve over `t` in `[0, 1]`.
    fn get_length(&self) -> f64 {
        self.get_length_between(0.0, 1.0)
    }

    /// The length of the curve from `t = 0` up to `end_t`.
    fn get_length_to(&self, end_t: f64) -> f64 {
        self.get_length_between(0.0, end_t)
    }

    /// The length of the curve between two parameter values, by 11-point
    /// Gauss-Legendre quadrature of the tangent magnitude.
    fn get_length_between(&self, start_t: f64, end_t: f64) -> f64 {
        let half_interval = (end_t - start_t) / 2.0;

        let mut length_m = 0.0;
        for coeff in GAUSS_LEGENDRE_11.iter() {
            let t = lin_map((-1.0, 1.0), (start_t, end_t), coeff[0]);
            length_m += self.get_derivative(t, 1).norm() * coeff[1];
        }

        length_m * half_interval
    }

    /// The parameter at which the given length along the curve is reached.
    fn get_param_from_length(&self, length_m: f64) -> f64 {
        self.get_param_from_length_with_total(length_m, self.get_length())
    }

    /// As [`Parametric::get_param_from_length`] but with a precomputed total
    /// curve length, avoiding the quadrature to recompute it.
    ///
    /// The initial guess assumes constant speed along the parameter
    /// (`t = length/total`), then Newton-Raphson refines it. Each step is
    /// clamped into [-1, 1] to prevent divergence, and steps with a ~zero
    /// tangent magnitude are skipped to avoid dividing by zero.
    fn get_param_from_length_with_total(&self, length_m: f64, total_length_m: f64) -> f64 {
        let mut t = length_m / total_length_m;

        for _ in 0..NEWTON_RAPHSON_ITERATIONS {
            let tangent_magnitude = self.get_derivative(t, 1).norm();
            if tangent_magnitude > 0.0 {
                t -= (self.get_length_to(t) - length_m) / tangent_magnitude;
                t = t.clamp(-1.0, 1.0);
            }
        }

        t
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// The standard signed curvature from first and second parametric
/// derivatives: `(x'y'' - x''y') / (x'^2 + y'^2)^1.5`.
///
/// Returns NaN when both first derivative components are zero. This is the
/// documented degenerate-geometry contract, not an error.
pub fn curvature_from_derivatives(first: &Vector2<f64>, second: &Vector2<f64>) -> f64 {
    (first[0] * second[1] - second[0] * first[1])
        / (first[0].powi(2) + first[1].powi(2)).powf(1.5)
}
