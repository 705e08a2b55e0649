//! # Profile Generation Executable
//!
//! This executable runs the motion planning core offline: it builds a spline
//! path through the waypoints given in the parameter file, generates the
//! velocity profile over it, and simulates the resulting motion with the
//! odometry estimator and pure pursuit steering law.
//!
//! Outputs are written into the session directory:
//! - `arch/profile.csv` - one record per control tick (velocities, wheel
//!   speeds, steering demands and simulated pose), for offline plotting
//! - `path.json` - the sampled path geometry

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Parameters for the profile generation executable.
mod params;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;

// Internal
use motion_plan::{
    ctrl::pure_pursuit,
    geom::Transform,
    odom::DiffDriveOdometry,
    spline::{Parametric, Path},
    traj::{PathTrajectory, DEFAULT_FINISH_THRESHOLD_M},
};
use params::{Params, SplineKind};
use util::{
    archive::Archiver,
    logger::{logger_init, LevelFilter},
    maths::norm,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Limit on the number of ticks before a run is abandoned, guarding against
/// parameter sets which never converge on the path end.
const MAX_NUM_TICKS: usize = 100_000;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// One archived record per control tick.
#[derive(Serialize)]
struct TickRecord {
    time_s: f64,
    distance_m: f64,
    velocity_ms: f64,
    angular_velocity_rads: f64,
    left_wheel_ms: f64,
    right_wheel_ms: f64,
    pursuit_left_ms: f64,
    pursuit_right_ms: f64,
    x_m: f64,
    y_m: f64,
    heading_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<()> {
    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("plan_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Profile Generation Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let params: Params =
        util::params::load("plan_exec.toml").wrap_err("Could not load plan_exec params")?;

    info!("Parameters loaded: {} waypoints", params.waypoints.len());

    // ---- BUILD PATH ----

    let waypoints: Vec<Transform> = params
        .waypoints
        .iter()
        .map(|w| Transform::from_parts(w.x_m, w.y_m, w.heading_rad))
        .collect();

    let path = match params.spline_kind {
        SplineKind::Cubic => Path::cubic_hermite(&waypoints),
        SplineKind::Quintic => Path::quintic_hermite(&waypoints),
    }
    .wrap_err("Failed to build the path")?;
    let path = Arc::new(path);

    info!(
        "Path built: {} segments, {:.3} m long",
        path.get_num_segments(),
        path.get_length()
    );

    // Sample the path geometry and save it for plotting
    let path_samples: Vec<Transform> = (0..=params.num_path_samples)
        .map(|i| path.get_transform(i as f64 / params.num_path_samples as f64))
        .collect();
    session.save("path.json", path_samples);

    // ---- GENERATE PROFILE ----

    let mut traj = PathTrajectory::new(Arc::clone(&path), params.traj)
        .wrap_err("Failed to create the trajectory")?;

    let mut archiver = Archiver::from_path(&session, "profile.csv")
        .map_err(|e| eyre!("Failed to create the profile archive: {}", e))?;

    let mut odom = DiffDriveOdometry::new(params.track_width_m);

    let mut time_s = 0.0;
    let mut num_ticks = 0;
    let mut peak_velocity_ms = 0f64;

    while !traj.is_finished(DEFAULT_FINISH_THRESHOLD_M) {
        if num_ticks >= MAX_NUM_TICKS {
            warn!(
                "Profile didn't complete within {} ticks, abandoning",
                MAX_NUM_TICKS
            );
            break;
        }

        // Advance the profile and convert to wheel speeds
        let state = traj.next(params.tick_period_s);
        let drive = state.to_diff_drive(params.track_width_m);

        // Simulate the motion with the odometry estimator
        let pose = odom.update(&drive, params.tick_period_s);

        // Steering demand towards the lookahead point, as the real control
        // loop would issue it
        let lookahead = traj.get_transform(params.lookahead_m);
        let pursuit = pure_pursuit(
            &pose,
            &lookahead.position_m,
            state.linear_velocity_ms,
            params.track_width_m,
        );

        if let Err(e) = archiver.serialise(TickRecord {
            time_s,
            distance_m: traj.get_traveled_distance(),
            velocity_ms: state.linear_velocity_ms,
            angular_velocity_rads: state.angular_velocity_rads,
            left_wheel_ms: drive.left_ms,
            right_wheel_ms: drive.right_ms,
            pursuit_left_ms: pursuit.left_ms,
            pursuit_right_ms: pursuit.right_ms,
            x_m: pose.position_m[0],
            y_m: pose.position_m[1],
            heading_rad: pose.rotation.radians,
        }) {
            warn!("Failed to archive tick {}: {}", num_ticks, e);
        }

        time_s += params.tick_period_s;
        num_ticks += 1;
        peak_velocity_ms = peak_velocity_ms.max(state.linear_velocity_ms);
    }

    // ---- SUMMARY ----

    let final_pose = odom.get_transform();
    let last_waypoint = waypoints.last().unwrap();
    let position_error_m = norm(
        &[final_pose.position_m[0], final_pose.position_m[1]],
        &[last_waypoint.position_m[0], last_waypoint.position_m[1]],
    )
    .unwrap_or(std::f64::NAN);

    info!("Profile complete:");
    info!("    {} ticks over {:.2} s", num_ticks, time_s);
    info!(
        "    {:.3} of {:.3} m traveled",
        traj.get_traveled_distance(),
        traj.get_total_length()
    );
    info!("    Peak velocity: {:.3} m/s", peak_velocity_ms);
    info!(
        "    Simulated final position error: {:.3} m",
        position_error_m
    );

    session.exit();

    Ok(())
}
