//! # Motion planning library
//!
//! This library implements the motion planning core for the rover's
//! differential drive: geometric primitives, Hermite spline paths, and the
//! curvature-constrained trajectory generator which turns a path into a
//! feasible velocity profile, tick by tick.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Steering laws - converts a target point and velocity into drive commands
pub mod ctrl;

/// Geometric primitives - vectors, rotations, transforms, lines and circles
pub mod geom;

/// Differential drive kinematics - linear/angular to per-wheel conversions
pub mod kin;

/// Odometry - integrates drive state into a pose estimate
pub mod odom;

/// Parametric splines - Hermite splines, paths and the arc length engine
pub mod spline;

/// Trajectory generation - curvature constrained velocity profiles
pub mod traj;
