//! # Steering control module
//!
//! Steering laws converting a target point on the path into drive demands.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod pure_pursuit;

// ---------------------------------------------------------------------------
// EXPORTS
// ---------------------------------------------------------------------------

pub use pure_pursuit::pure_pursuit;
