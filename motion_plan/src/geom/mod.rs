//! # Geometry module
//!
//! This module defines the geometric primitives used throughout the motion
//! planning library. Positions and direction vectors are plain
//! [`nalgebra::Vector2<f64>`] values, headings are [`Rotation`]s and poses are
//! [`Transform`]s. [`Line`] and [`Circle`] support the steering law.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod circle;
pub mod line;
pub mod rotation;
pub mod transform;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use circle::Circle;
pub use line::Line;
pub use rotation::Rotation;
pub use transform::Transform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Sentinel value standing in for an infinite length in degenerate geometry.
///
/// Parallel lines and collinear tangent fits have no finite intersection or
/// radius. Rather than erroring these cases produce a line/circle at this
/// very large but finite value, which downstream consumers treat as "straight
/// ahead".
pub const DEGENERATE_SENTINEL_M: f64 = 2.0e16;
