//! Infinite 2D line primitive

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::{Rotation, Transform, DEGENERATE_SENTINEL_M};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A 2D line in slope/intercept form, extending infinitely in both directions.
///
/// Vertical lines cannot be represented exactly in this form, so infinite
/// slopes are replaced by the [`DEGENERATE_SENTINEL_M`] sentinel.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Line {
    /// First defining point of the line
    first_point_m: Vector2<f64>,

    /// Second defining point of the line
    second_point_m: Vector2<f64>,

    /// The slope (dy/dx) of the line
    pub slope: f64,

    /// The y axis intercept (the c in y = mx + c)
    pub y_intercept_m: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Line {
    /// Construct a line from a slope and y intercept.
    pub fn from_slope_intercept(slope: f64, y_intercept_m: f64) -> Self {
        Self {
            first_point_m: Vector2::new(0.0, y_intercept_m),
            second_point_m: Vector2::new(1.0, y_intercept_m + slope),
            slope,
            y_intercept_m,
        }
    }

    /// Construct the line passing through the transform's position along its
    /// heading.
    pub fn from_transform(transform: &Transform) -> Self {
        Self::from_points(
            transform.position_m,
            transform.position_m + transform.rotation.to_vector(1.0),
        )
    }

    /// Construct a line through two points.
    ///
    /// A vertical line (infinite slope) is snapped to the degenerate
    /// sentinel slope.
    pub fn from_points(first_point_m: Vector2<f64>, second_point_m: Vector2<f64>) -> Self {
        let mut slope =
            (first_point_m[1] - second_point_m[1]) / (first_point_m[0] - second_point_m[0]);
        if slope.is_infinite() {
            slope = DEGENERATE_SENTINEL_M;
        }

        Self {
            first_point_m,
            second_point_m,
            slope,
            y_intercept_m: first_point_m[1] - slope * first_point_m[0],
        }
    }

    /// Find the intersection point between this line and `other`.
    ///
    /// If the two lines are parallel `None` is returned.
    pub fn get_intersection(&self, other: &Line) -> Option<Vector2<f64>> {
        if self.slope == other.slope {
            return None;
        }

        let x = (other.y_intercept_m - self.y_intercept_m) / (self.slope - other.slope);
        Some(Vector2::new(x, self.slope * x + self.y_intercept_m))
    }

    /// Find the closest point on this line to the given reference point.
    pub fn get_closest_point(&self, reference_m: &Vector2<f64>) -> Vector2<f64> {
        // The closest point is the intersection with the perpendicular line
        // through the reference. The unwrap here is safe as a line is never
        // parallel to its own perpendicular, even with sentinel slopes.
        self.get_intersection(&self.get_perpendicular_line(reference_m))
            .unwrap()
    }

    /// Get the perpendicular line to this line passing through the given
    /// point.
    pub fn get_perpendicular_line(&self, point_m: &Vector2<f64>) -> Line {
        let perp_slope = -1.0 / self.slope;

        if perp_slope.is_infinite() {
            Line::from_points(*point_m, point_m + Vector2::new(0.0, 1.0))
        } else {
            Line::from_points(*point_m, point_m + Vector2::new(1.0, perp_slope))
        }
    }

    /// The rotation of this line relative to the +ve X axis.
    pub fn get_rotation(&self) -> Rotation {
        let mut rad = self.slope.atan2(1.0);
        if rad.is_nan() {
            rad = 0.0;
        }
        Rotation::new(rad)
    }

    /// Find which side of the line a point is on.
    ///
    /// Returns +1 for the left side and -1 for the right side, following the
    /// right hand rule along the first-to-second point direction.
    pub fn find_side(&self, point_m: &Vector2<f64>) -> f64 {
        let d = (point_m[0] - self.first_point_m[0])
            * (self.second_point_m[1] - self.first_point_m[1])
            - (point_m[1] - self.first_point_m[1])
                * (self.second_point_m[0] - self.first_point_m[0]);
        -d.signum()
    }

    /// Determine whether `point` lies on this line to within `tolerance`.
    pub fn is_collinear(&self, point_m: &Vector2<f64>, tolerance: f64) -> bool {
        let collinear = (point_m[1] - self.first_point_m[1])
            * (self.second_point_m[0] - point_m[0])
            - (self.second_point_m[1] - point_m[1]) * (point_m[0] - self.first_point_m[0]);
        collinear.abs() < tolerance
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
