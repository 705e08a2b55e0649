//! # Path
//!
//! A path chains an ordered sequence of spline segments into one logical
//! curve spanning `t` in `[0, 1]`, delegating every [`Parametric`] query to
//! the segment owning the resolved sub-parameter.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

// Internal
use super::{CubicHermiteSpline, Parametric, QuinticHermiteSpline};
use crate::geom::{Rotation, Transform};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// One segment of a [`Path`].
///
/// A closed set of spline kinds rather than a trait object, so paths stay
/// allocation free to evaluate and trivially `Send + Sync`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum Segment {
    Cubic(CubicHermiteSpline),
    Quintic(QuinticHermiteSpline),
}

/// An ordered, non-empty sequence of spline segments forming one curve.
///
/// The whole path spans `t` in `[0, 1]`: parameter `t` resolves to segment
/// `floor(t * N)` with sub-parameter `t * N - floor(t * N)`. Out of range
/// parameters resolve to the first/last segment with the raw `t` as the local
/// parameter, giving linear-ish extrapolation beyond the path ends rather
/// than clamping.
///
/// Paths are immutable once built and may be shared between threads, e.g.
/// one path driving both a live trajectory and an offline visualiser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<Segment>,
}

// -----------------------------------------------------------------------------------------------
// ENUMS
// -----------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PathError {
    /// A path must contain at least one segment.
    #[error("Attempted to create a path with no segments")]
    NoSegments,

    /// Waypoint construction needs at least a start and an end pose.
    #[error("A path requires at least 2 waypoints, got {0}")]
    TooFewWaypoints(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Parametric for Segment {
    fn get_vector(&self, t: f64) -> Vector2<f64> {
        match self {
            Segment::Cubic(s) => s.get_vector(t),
            Segment::Quintic(s) => s.get_vector(t),
        }
    }

    fn get_rotation(&self, t: f64) -> Rotation {
        match self {
            Segment::Cubic(s) => s.get_rotation(t),
            Segment::Quintic(s) => s.get_rotation(t),
        }
    }

    fn get_curvature(&self, t: f64) -> f64 {
        match self {
            Segment::Cubic(s) => s.get_curvature(t),
            Segment::Quintic(s) => s.get_curvature(t),
        }
    }

    fn get_derivative(&self, t: f64, n: u32) -> Vector2<f64> {
        match self {
            Segment::Cubic(s) => s.get_derivative(t, n),
            Segment::Quintic(s) => s.get_derivative(t, n),
        }
    }
}

impl Path {
    /// Create a new path from a sequence of segments.
    pub fn new(segments: Vec<Segment>) -> Result<Self, PathError> {
        if segments.is_empty() {
            return Err(PathError::NoSegments);
        }

        Ok(Self { segments })
    }

    /// Build a path of cubic Hermite splines through the given waypoints,
    /// one segment per consecutive waypoint pair.
    pub fn cubic_hermite(waypoints: &[Transform]) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()));
        }

        Self::new(
            waypoints
                .windows(2)
                .map(|w| Segment::Cubic(CubicHermiteSpline::new(w[0], w[1])))
                .collect(),
        )
    }

    /// Build a path of quintic Hermite splines through the given waypoints,
    /// one segment per consecutive waypoint pair.
    pub fn quintic_hermite(waypoints: &[Transform]) -> Result<Self, PathError> {
        if waypoints.len() < 2 {
            return Err(PathError::TooFewWaypoints(waypoints.len()));
        }

        Self::new(
            waypoints
                .windows(2)
                .map(|w| Segment::Quintic(QuinticHermiteSpline::new(w[0], w[1])))
                .collect(),
        )
    }

    /// Get the number of segments in the path
    pub fn get_num_segments(&self) -> usize {
        self.segments.len()
    }

    /// Resolve a path parameter onto `(segment, local parameter, index)`.
    ///
    /// Parameters below 0 resolve to the first segment and above 1 to the
    /// last, in both cases keeping the raw `t` as the local parameter so the
    /// endpoint segments extrapolate.
    pub fn get_parametric(&self, t: f64) -> (&Segment, f64, usize) {
        let num = self.segments.len();

        if t < 0.0 {
            (&self.segments[0], t, 0)
        } else if t > 1.0 {
            (&self.segments[num - 1], t, num - 1)
        } else {
            let scaled = t * num as f64;
            // The right edge of the last segment is inclusive
            let i = (scaled.floor() as usize).min(num - 1);
            (&self.segments[i], scaled - i as f64, i)
        }
    }

    /// Map a segment-local parameter back to the path's absolute parameter.
    fn to_absolute_param(&self, t: f64, index: usize) -> f64 {
        (t + index as f64) / self.segments.len() as f64
    }
}

impl Parametric for Path {
    fn get_vector(&self, t: f64) -> Vector2<f64> {
        let (segment, local_t, _) = self.get_parametric(t);
        segment.get_vector(local_t)
    }

    fn get_rotation(&self, t: f64) -> Rotation {
        let (segment, local_t, _) = self.get_parametric(t);
        segment.get_rotation(local_t)
    }

    fn get_curvature(&self, t: f64) -> f64 {
        let (segment, local_t, _) = self.get_parametric(t);
        segment.get_curvature(local_t)
    }

    fn get_derivative(&self, t: f64, n: u32) -> Vector2<f64> {
        let (segment, local_t, _) = self.get_parametric(t);
        segment.get_derivative(local_t, n)
    }

    fn get_transform(&self, t: f64) -> Transform {
        let (segment, local_t, _) = self.get_parametric(t);
        segment.get_transform(local_t)
    }

    /// Composite length: whole lengths for the interior segments plus the
    /// fractional lengths of the two partially covered end segments.
    fn get_length_between(&self, start_t: f64, end_t: f64) -> f64 {
        let (start_seg, start_local, start_index) = self.get_parametric(start_t);
        let (end_seg, end_local, end_index) = self.get_parametric(end_t);

        // Whole interior segments between the two covered ends
        let mut length_m = 0.0;
        for i in (start_index + 1)..end_index {
            length_m += self.segments[i].get_length();
        }

        if start_index == end_index {
            length_m + start_seg.get_length_between(start_local, end_local)
        } else {
            length_m
                + start_seg.get_length_between(start_local, 1.0)
                + end_seg.get_length_to(end_local)
        }
    }

    /// Composite inversion: locate the segment whose cumulative length
    /// bracket contains the target, invert within it, and remap to the
    /// path's absolute parameter.
    fn get_param_from_length_with_total(&self, length_m: f64, _total_length_m: f64) -> f64 {
        if length_m < 0.0 {
            return 0.0;
        }

        let mut cumulative_m = 0.0;
        for (i, segment) in self.segments.iter().enumerate() {
            let segment_length_m = segment.get_length();
            cumulative_m += segment_length_m;

            if cumulative_m > length_m || i == self.segments.len() - 1 {
                return self.to_absolute_param(
                    segment.get_param_from_length(length_m - (cumulative_m - segment_length_m)),
                    i,
                );
            }
        }

        0.0
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
