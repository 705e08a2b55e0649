//! Circle primitive and tangent-circle fitting

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::{Transform, DEGENERATE_SENTINEL_M};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A circle on the XY plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Circle {
    /// Center of the circle
    pub center_m: Vector2<f64>,

    /// Radius of the circle in meters
    pub radius_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Circle {
    /// Create a new circle from a center point and radius.
    pub fn new(center_m: Vector2<f64>, radius_m: f64) -> Self {
        Self { center_m, radius_m }
    }

    /// The curvature (inverse radius) of this circle.
    pub fn get_curvature(&self) -> f64 {
        1.0 / self.radius_m
    }

    /// Fit the circle which is tangent to `tangent` and passes through
    /// `point_m`.
    ///
    /// Degenerate geometry (the point collinear with the tangent heading, or
    /// coincident with the tangent position) has no finite fit. Those cases
    /// return the sentinel circle with center and radius
    /// [`DEGENERATE_SENTINEL_M`], which steers as a straight line rather than
    /// failing.
    pub fn from_tangent(tangent: &Transform, point_m: &Vector2<f64>) -> Self {
        let a = tangent.position_m[0];
        let b = tangent.position_m[1];
        let c = point_m[0];
        let d = point_m[1];
        let tan = tangent.rotation.tan();

        // Center found by intersecting the perpendicular at the tangent point
        // with the perpendicular bisector of tangent-to-point
        let center_x = ((b + d) * (d - b) * tan - (a + c) * (a - c) * tan
            - 2.0 * (d - b) * tan * b
            - 2.0 * (d - b) * a)
            / (2.0 * (tan * (c - a) + b - d));
        let center_y = (b + d) / 2.0
            - (c - a) / (d - b)
                * (center_x - (a + c) * (tan * (c - a) + b - d) / (2.0 * (tan * (c - a) + b - d)));

        let mut center_m = Vector2::new(center_x, center_y);
        let mut radius_m = (center_m - tangent.position_m).norm();

        if radius_m.is_nan() || radius_m.is_infinite() {
            center_m = Vector2::new(DEGENERATE_SENTINEL_M, DEGENERATE_SENTINEL_M);
            radius_m = DEGENERATE_SENTINEL_M;
        }

        Self { center_m, radius_m }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_from_tangent() {
        // Tangent along +X at the origin, passing through (0, 2): the unique
        // fit is the radius 1 circle centered at (0, 1)
        let tangent = Transform::from_parts(0.0, 0.0, 0.0);
        let circle = Circle::from_tangent(&tangent, &Vector2::new(0.0, 2.0));

        assert!((circle.radius_m - 1.0).abs() < 1e-6);
        assert!(circle.center_m[0].abs() < 1e-6);
        assert!((circle.center_m[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_fit_is_sentinel() {
        // A point dead ahead on the tangent line has no finite circle
        let tangent = Transform::from_parts(0.0, 0.0, 0.0);
        let circle = Circle::from_tangent(&tangent, &Vector2::new(5.0, 0.0));

        assert_eq!(circle.radius_m, DEGENERATE_SENTINEL_M);

        // The curvature of the sentinel is effectively zero - straight line
        assert!(circle.get_curvature().abs() < 1e-15);
    }
}
