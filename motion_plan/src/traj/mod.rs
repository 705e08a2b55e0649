//! # Trajectory generation module
//!
//! Turns a geometric [`crate::spline::Path`] into a time-feasible motion,
//! tick by tick. Each call to [`PathTrajectory::next`] produces the next
//! linear and angular velocity demand respecting the acceleration,
//! deceleration, top speed and turning rate limits in
//! [`TrajectoryParams`].
//!
//! A naive trapezoidal profile only looks at the curvature under the robot
//! right now, so it would start braking too late for a sharp turn ahead. The
//! generator therefore maintains a preview buffer: every tick it samples the
//! curvature speed ceiling one stopping-distance ahead and records it as a
//! future bound. The binding entry of that buffer caps the commanded
//! velocity early enough that the limit can be met when the turn arrives.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod params;
pub mod trajectory;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use params::{TrajectoryError, TrajectoryParams};
pub use trajectory::{PathTrajectory, TrajectoryState, DEFAULT_FINISH_THRESHOLD_M};
