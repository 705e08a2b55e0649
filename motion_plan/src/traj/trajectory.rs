//! Curvature constrained trajectory generator

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// Internal
use super::{TrajectoryError, TrajectoryParams};
use crate::geom::Transform;
use crate::kin::DiffDriveState;
use crate::spline::{Parametric, Path};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Default remaining-distance threshold under which a traversal is complete.
pub const DEFAULT_FINISH_THRESHOLD_M: f64 = 0.0127;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The kinematic state demanded for one control tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrajectoryState {
    /// Demanded forward velocity in m/s
    pub linear_velocity_ms: f64,

    /// Demanded angular velocity in rad/s, +ve counter-clockwise
    pub angular_velocity_rads: f64,
}

/// A curvature speed bound previewed at a point ahead of the robot.
///
/// Reads "if you are still moving when you reach `distance_m`, you must be at
/// or below `velocity_ms`".
#[derive(Debug, Clone, Copy)]
struct PreviewedVelocity {
    /// The speed bound at the previewed point in m/s
    velocity_ms: f64,

    /// Distance along the path at which the bound applies in meters
    distance_m: f64,
}

/// Generates a feasible velocity profile along a path, one tick at a time.
///
/// The trajectory owns its progress state and a read-only handle to the
/// path; the path itself is never mutated and may be shared with other
/// consumers. Create one instance per traversal attempt, call
/// [`PathTrajectory::next`] once per control loop tick and drop the instance
/// when [`PathTrajectory::is_finished`] reports completion.
pub struct PathTrajectory {
    /// The path to follow, shared and read-only
    path: Arc<Path>,

    /// Limits for this traversal
    params: TrajectoryParams,

    /// Total length of the path, cached at construction
    total_length_m: f64,

    /// Distance traveled along the path so far
    traveled_distance_m: f64,

    /// The velocity returned by the previous tick
    previous_velocity_ms: f64,

    /// Previewed future speed bounds, pruned as they are passed
    previewed_velocities: Vec<PreviewedVelocity>,

    /// If true `next` integrates the traveled distance itself, otherwise the
    /// caller supplies it via `set_traveled_distance`
    auto_update_distance: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl TrajectoryState {
    /// Convert this demand into per-wheel speeds for a differential drive.
    pub fn to_diff_drive(&self, track_width_m: f64) -> DiffDriveState {
        DiffDriveState::from_linear_and_angular(
            self.linear_velocity_ms,
            self.angular_velocity_rads,
            track_width_m,
        )
    }
}

impl PathTrajectory {
    /// Create a new trajectory over the given path.
    ///
    /// The parameters are validated here so that an unfollowable
    /// configuration is rejected before the first tick.
    pub fn new(path: Arc<Path>, params: TrajectoryParams) -> Result<Self, TrajectoryError> {
        params.validate()?;

        let total_length_m = path.get_length();

        debug!(
            "New trajectory over {} segment path, total length {:.3} m",
            path.get_num_segments(),
            total_length_m
        );

        Ok(Self {
            path,
            params,
            total_length_m,
            traveled_distance_m: 0.0,
            previous_velocity_ms: params.start_velocity_ms,
            previewed_velocities: Vec::new(),
            auto_update_distance: true,
        })
    }

    /// Compute the kinematic state for the next tick, `dt_s` seconds after
    /// the previous one.
    ///
    /// The returned velocity is the tightest of:
    ///  1. the acceleration-limited step up from the previous velocity,
    ///  2. the velocity from which the end of the path is still reachable at
    ///     `end_velocity_ms` under the deceleration limit,
    ///  3. the flat `max_velocity_ms` ceiling,
    ///  4. the binding previewed curvature bound ahead of the robot, and
    ///  5. the curvature ceiling at the current point, snapped to exactly
    ///     when within one deceleration step, which stops the output
    ///     chattering as the binding constraint hands over from "future" to
    ///     "current".
    pub fn next(&mut self, dt_s: f64) -> TrajectoryState {
        let distance_to_end_m = self.total_length_m - self.traveled_distance_m;

        // Trapezoidal accelerate/cruise/brake envelope
        let max_velocity_to_end_ms = velocity_from_braking_distance(
            self.params.end_velocity_ms,
            distance_to_end_m,
            self.params.max_deceleration_ms2,
        );
        let mut velocity_ms = (self.previous_velocity_ms
            + self.params.max_acceleration_ms2 * dt_s)
            .min(max_velocity_to_end_ms)
            .min(self.params.max_velocity_ms);

        // Preview one stopping distance ahead - the distance needed to brake
        // from the previous velocity to rest
        let preview_distance_m = braking_distance(
            self.previous_velocity_ms,
            0.0,
            self.params.max_deceleration_ms2,
        );

        // Curvature ceiling at the current point
        let curvature = self
            .path
            .get_curvature(self.param_at_distance(self.traveled_distance_m));
        let slowdown_velocity_ms = self.slowdown_velocity(curvature);

        // Prune passed bounds, then record the ceiling at the preview point
        let preview_at_m = self.traveled_distance_m + preview_distance_m;
        let previewed_ms = self.preview_velocity(preview_at_m);
        let traveled_m = self.traveled_distance_m;
        self.previewed_velocities
            .retain(|p| p.distance_m > traveled_m);
        self.previewed_velocities.push(PreviewedVelocity {
            velocity_ms: previewed_ms,
            distance_m: preview_at_m,
        });

        // The binding future bound: the lowest velocity we must be at now to
        // still be able to brake down to a previewed bound by its distance
        let min_velocity_to_slowdown_ms = self.min_previewed_velocity();
        if min_velocity_to_slowdown_ms < self.previous_velocity_ms {
            velocity_ms = velocity_ms.min(min_velocity_to_slowdown_ms);
        }

        // Snap onto the current-point ceiling when within one deceleration
        // step of it
        if (velocity_ms - slowdown_velocity_ms).abs() < self.params.max_deceleration_ms2 {
            velocity_ms = velocity_ms.min(slowdown_velocity_ms);
        }

        self.previous_velocity_ms = velocity_ms;
        if self.auto_update_distance {
            self.traveled_distance_m += velocity_ms * dt_s;
        }

        trace!(
            "Trajectory tick: d = {:.3} m, v = {:.3} m/s, curv = {:.3} 1/m",
            self.traveled_distance_m,
            velocity_ms,
            curvature
        );

        TrajectoryState {
            linear_velocity_ms: velocity_ms,
            // NaN curvature means degenerate geometry - treat as straight
            angular_velocity_rads: if curvature.is_nan() {
                0.0
            } else {
                velocity_ms * curvature
            },
        }
    }

    /// The pose on the path at the current position plus a lookahead
    /// distance.
    ///
    /// Beyond the end of the path the pose is extrapolated linearly along
    /// the final heading, which keeps steering laws fed with a sane target
    /// while the robot closes out the last few centimeters.
    pub fn get_transform(&self, lookahead_m: f64) -> Transform {
        let length_m = self.traveled_distance_m + lookahead_m;

        if length_m > self.total_length_m {
            let extra_m = length_m - self.total_length_m;
            let last = self.path.get_transform(1.0);

            Transform::new(
                last.position_m + last.rotation.to_vector(extra_m),
                last.rotation,
            )
        } else {
            self.path.get_transform(self.param_at_distance(length_m))
        }
    }

    /// True once the remaining distance magnitude is below the threshold.
    ///
    /// The trajectory itself has no terminal state, it will keep reporting
    /// ~zero remaining distance if ticked past completion.
    pub fn is_finished(&self, threshold_m: f64) -> bool {
        self.get_remaining_distance().abs() < threshold_m
    }

    /// The total length of the path in meters
    pub fn get_total_length(&self) -> f64 {
        self.total_length_m
    }

    /// The distance traveled along the path so far in meters
    pub fn get_traveled_distance(&self) -> f64 {
        self.traveled_distance_m
    }

    /// The distance left to travel in meters
    pub fn get_remaining_distance(&self) -> f64 {
        self.total_length_m - self.traveled_distance_m
    }

    /// Supply an externally measured traveled distance, e.g. from odometry.
    ///
    /// Calling this switches the trajectory over to externally driven
    /// distance for the rest of its life - `next` will no longer integrate
    /// the distance itself.
    pub fn set_traveled_distance(&mut self, distance_m: f64) {
        self.auto_update_distance = false;
        self.traveled_distance_m = distance_m;
    }

    /// Resolve a distance along the path to a path parameter.
    fn param_at_distance(&self, distance_m: f64) -> f64 {
        self.path
            .get_param_from_length_with_total(distance_m, self.total_length_m)
    }

    /// The curvature speed ceiling previewed at a distance along the path.
    fn preview_velocity(&self, distance_m: f64) -> f64 {
        self.slowdown_velocity(self.path.get_curvature(self.param_at_distance(distance_m)))
    }

    /// The speed ceiling imposed by a curvature: the velocity at which the
    /// turn rate through that curvature hits the angular velocity limit,
    /// floored at the minimum velocity.
    fn slowdown_velocity(&self, curvature: f64) -> f64 {
        // NaN curvature (degenerate geometry) is treated as straight line -
        // no ceiling at all
        if curvature.is_nan() {
            return f64::INFINITY;
        }

        (self.params.max_angular_velocity_rads / curvature)
            .abs()
            .max(self.params.min_velocity_ms)
    }

    /// The lowest velocity we may be at now such that every previewed bound
    /// remains reachable under the deceleration limit.
    fn min_previewed_velocity(&self) -> f64 {
        self.previewed_velocities
            .iter()
            .map(|p| {
                velocity_from_braking_distance(
                    p.velocity_ms,
                    p.distance_m - self.traveled_distance_m,
                    self.params.max_deceleration_ms2,
                )
            })
            .fold(f64::INFINITY, f64::min)
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// The highest velocity from which `end_velocity_ms` is reachable within
/// `distance_m` under `deceleration_ms2` (v^2 = v_end^2 + 2ad). Zero once the
/// distance is used up.
fn velocity_from_braking_distance(
    end_velocity_ms: f64,
    distance_m: f64,
    deceleration_ms2: f64,
) -> f64 {
    if distance_m > 0.0 {
        (end_velocity_ms * end_velocity_ms + 2.0 * deceleration_ms2 * distance_m).sqrt()
    } else {
        0.0
    }
}

/// The distance needed to brake from one velocity down to another.
fn braking_distance(current_ms: f64, target_ms: f64, deceleration_ms2: f64) -> f64 {
    (current_ms - target_ms).powi(2) / (2.0 * deceleration_ms2)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::geom::Transform;
    use crate::spline::{Path, QuinticHermiteSpline, Segment};
    use std::f64::consts::FRAC_PI_2;

    const DT_S: f64 = 0.01;

    fn straight_params() -> TrajectoryParams {
        TrajectoryParams {
            max_acceleration_ms2: 1.0,
            max_deceleration_ms2: 1.0,
            max_velocity_ms: 2.0,
            max_angular_velocity_rads: 10.0,
            start_velocity_ms: 0.0,
            end_velocity_ms: 0.0,
            min_velocity_ms: 0.0,
        }
    }

    fn straight_path() -> Arc<Path> {
        Arc::new(
            Path::cubic_hermite(&[
                Transform::from_parts(0.0, 0.0, 0.0),
                Transform::from_parts(10.0, 0.0, 0.0),
            ])
            .unwrap(),
        )
    }

    #[test]
    fn test_invalid_params_rejected() {
        let mut params = straight_params();
        params.max_deceleration_ms2 = 0.0;
        assert!(PathTrajectory::new(straight_path(), params).is_err());
    }

    /// A 10 m straight line profile must accelerate at the limit to the
    /// velocity ceiling, cruise, and brake to rest at the end, with no
    /// angular velocity anywhere.
    #[test]
    fn test_straight_line_profile() {
        let mut traj = PathTrajectory::new(straight_path(), straight_params()).unwrap();

        let mut peak_velocity_ms: f64 = 0.0;
        let mut previous_velocity_ms = 0.0;
        let mut previous_distance_m = 0.0;
        let mut num_ticks = 0;

        while !traj.is_finished(DEFAULT_FINISH_THRESHOLD_M) {
            let state = traj.next(DT_S);
            num_ticks += 1;
            assert!(num_ticks < 10000, "profile failed to complete");

            // Feasibility: the velocity never exceeds the ceiling and never
            // changes faster than the accel/decel limits allow. The epsilon
            // absorbs the discretisation of the braking curve, which
            // overshoots the limit by ~dt/2v at low speed
            assert!(state.linear_velocity_ms <= 2.0 + 1e-9);
            assert!(
                (state.linear_velocity_ms - previous_velocity_ms).abs() / DT_S <= 1.0 + 0.05,
                "accel limit violated at tick {}",
                num_ticks
            );

            // A straight line demands no turning
            assert!(state.angular_velocity_rads.abs() < 1e-9);

            // Progress is monotonic
            assert!(traj.get_traveled_distance() >= previous_distance_m);

            peak_velocity_ms = peak_velocity_ms.max(state.linear_velocity_ms);
            previous_velocity_ms = state.linear_velocity_ms;
            previous_distance_m = traj.get_traveled_distance();
        }

        // Reached the cruise ceiling, and stopped at the end of the path
        assert!(peak_velocity_ms > 1.99);
        assert!(previous_velocity_ms < 0.2);
        assert!((traj.get_traveled_distance() - 10.0).abs() < 0.02);
    }

    /// A path with a radius 0.5 left turn starting at distance ~8: the
    /// preview buffer must have slowed the robot to roughly the 0.5 m/s
    /// curvature ceiling by the time the turn arrives, even though straight
    /// line kinematics would allow full speed there.
    #[test]
    fn test_sharp_turn_previewed() {
        // Straight run-in, a short curvature ramp to 2, the radius 0.5
        // quarter turn, a ramp back to 0 and a straight run-out. Endpoint
        // curvatures are matched at every joint
        let path = Arc::new(
            Path::new(vec![
                Segment::Quintic(QuinticHermiteSpline::with_curvatures(
                    Transform::from_parts(0.0, 0.0, 0.0),
                    Transform::from_parts(7.0, 0.0, 0.0),
                    0.0,
                    0.0,
                )),
                Segment::Quintic(QuinticHermiteSpline::with_curvatures(
                    Transform::from_parts(7.0, 0.0, 0.0),
                    Transform::from_parts(8.0, 0.0, 0.0),
                    0.0,
                    2.0,
                )),
                Segment::Quintic(QuinticHermiteSpline::with_curvatures(
                    Transform::from_parts(8.0, 0.0, 0.0),
                    Transform::from_parts(8.5, 0.5, FRAC_PI_2),
                    2.0,
                    2.0,
                )),
                Segment::Quintic(QuinticHermiteSpline::with_curvatures(
                    Transform::from_parts(8.5, 0.5, FRAC_PI_2),
                    Transform::from_parts(8.5, 1.5, FRAC_PI_2),
                    2.0,
                    0.0,
                )),
                Segment::Quintic(QuinticHermiteSpline::with_curvatures(
                    Transform::from_parts(8.5, 1.5, FRAC_PI_2),
                    Transform::from_parts(8.5, 4.5, FRAC_PI_2),
                    0.0,
                    0.0,
                )),
            ])
            .unwrap(),
        );

        let params = TrajectoryParams {
            max_acceleration_ms2: 2.0,
            max_deceleration_ms2: 2.0,
            max_velocity_ms: 3.0,
            max_angular_velocity_rads: 1.0,
            start_velocity_ms: 0.0,
            end_velocity_ms: 0.0,
            min_velocity_ms: 0.1,
        };
        let mut traj = PathTrajectory::new(path, params).unwrap();

        let mut peak_velocity_ms: f64 = 0.0;
        let mut entry_velocity_ms: f64 = 0.0;
        let mut turn_velocity_ms: f64 = 0.0;
        let mut num_ticks = 0;

        while !traj.is_finished(DEFAULT_FINISH_THRESHOLD_M) {
            let state = traj.next(DT_S);
            num_ticks += 1;
            assert!(num_ticks < 20000, "profile failed to complete");

            assert!(!state.linear_velocity_ms.is_nan());
            peak_velocity_ms = peak_velocity_ms.max(state.linear_velocity_ms);

            // Record the fastest the robot moved right at the turn entry,
            // where the curvature is ~2, and across the whole turn
            let distance_m = traj.get_traveled_distance();
            if distance_m > 8.0 && distance_m < 8.1 {
                entry_velocity_ms = entry_velocity_ms.max(state.linear_velocity_ms);
            }
            if distance_m > 8.0 && distance_m < 8.6 {
                turn_velocity_ms = turn_velocity_ms.max(state.linear_velocity_ms);
            }
        }

        // Full speed was available on the run-in, but the turn entry was
        // taken at roughly the curvature ceiling |max_angular / curvature| =
        // 1/2 (the quintic's interior curvature wobbles around the demanded
        // 2, hence the tolerance)
        assert!(peak_velocity_ms > 2.0);
        assert!(
            entry_velocity_ms <= 0.6,
            "turn entered at {} m/s",
            entry_velocity_ms
        );
        assert!(entry_velocity_ms > 0.0);
        assert!(
            turn_velocity_ms <= 0.7,
            "turn taken at {} m/s",
            turn_velocity_ms
        );
    }

    #[test]
    fn test_transform_lookahead_and_extrapolation() {
        let traj = PathTrajectory::new(straight_path(), straight_params()).unwrap();

        // On the path
        let transform = traj.get_transform(5.0);
        assert!((transform.position_m[0] - 5.0).abs() < 1e-3);
        assert!(transform.position_m[1].abs() < 1e-9);

        // Beyond the end: linear extrapolation along the final heading
        let transform = traj.get_transform(12.0);
        assert!((transform.position_m[0] - 12.0).abs() < 1e-3);
        assert!(transform.position_m[1].abs() < 1e-9);
    }

    #[test]
    fn test_externally_driven_distance() {
        let mut traj = PathTrajectory::new(straight_path(), straight_params()).unwrap();

        traj.set_traveled_distance(4.0);
        let before_m = traj.get_traveled_distance();
        traj.next(DT_S);

        // The trajectory must no longer integrate distance itself
        assert_eq!(traj.get_traveled_distance(), before_m);
        assert!((traj.get_remaining_distance() - 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_path_emits_finite_state() {
        // A stationary path (coincident endpoints) has NaN curvature
        // everywhere - the trajectory must emit zeros, not NaN
        let path = Arc::new(
            Path::cubic_hermite(&[
                Transform::from_parts(1.0, 1.0, 0.0),
                Transform::from_parts(1.0, 1.0, 0.0),
            ])
            .unwrap(),
        );
        let mut traj = PathTrajectory::new(path, straight_params()).unwrap();

        let state = traj.next(DT_S);
        assert!(!state.linear_velocity_ms.is_nan());
        assert_eq!(state.angular_velocity_rads, 0.0);
    }

    #[test]
    fn test_wheel_speed_conversion() {
        let state = TrajectoryState {
            linear_velocity_ms: 1.0,
            angular_velocity_rads: 0.5,
        };
        let drive = state.to_diff_drive(0.5);

        assert!((drive.left_ms - (1.0 - 0.5 * 0.25)).abs() < 1e-9);
        assert!((drive.right_ms - (1.0 + 0.5 * 0.25)).abs() < 1e-9);
    }
}
