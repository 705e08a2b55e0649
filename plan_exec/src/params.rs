//! Parameters for the profile generation executable

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;

// Internal
use motion_plan::traj::TrajectoryParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the profile generation executable
#[derive(Debug, Clone, Deserialize)]
pub struct Params {
    /// Which spline kind to build the path from
    pub spline_kind: SplineKind,

    /// Control loop tick period in seconds
    pub tick_period_s: f64,

    /// Track width of the target chassis in meters
    pub track_width_m: f64,

    /// Steering lookahead distance in meters
    pub lookahead_m: f64,

    /// Number of points to sample when saving the path for plotting
    pub num_path_samples: usize,

    /// The limits to generate the trajectory under
    pub traj: TrajectoryParams,

    /// The waypoints defining the path, in order
    pub waypoints: Vec<Waypoint>,
}

/// A single waypoint on the demanded path
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Waypoint {
    /// X position of the waypoint in meters
    pub x_m: f64,

    /// Y position of the waypoint in meters
    pub y_m: f64,

    /// Heading at the waypoint in radians
    pub heading_rad: f64,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// The spline kind used to join the waypoints
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplineKind {
    Cubic,
    Quintic,
}
