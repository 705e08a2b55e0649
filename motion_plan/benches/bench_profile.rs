//! # Trajectory Generation Benchmark

use criterion::{criterion_group, criterion_main, Criterion};
use std::sync::Arc;

use motion_plan::{
    geom::Transform,
    spline::{Parametric, Path},
    traj::{PathTrajectory, TrajectoryParams},
};

fn profile_benchmark(c: &mut Criterion) {
    // ---- Build a representative S-bend path ----

    let path = Arc::new(
        Path::quintic_hermite(&[
            Transform::from_parts(0.0, 0.0, 0.0),
            Transform::from_parts(4.0, 0.0, 0.0),
            Transform::from_parts(6.0, 1.5, 0.8),
            Transform::from_parts(8.0, 3.0, 0.0),
        ])
        .unwrap(),
    );

    let params = TrajectoryParams {
        max_acceleration_ms2: 1.0,
        max_deceleration_ms2: 1.5,
        max_velocity_ms: 2.0,
        max_angular_velocity_rads: 2.0,
        start_velocity_ms: 0.0,
        end_velocity_ms: 0.0,
        min_velocity_ms: 0.05,
    };

    // The per-tick cost of the generator, dominated by the arc length
    // inversions
    c.bench_function("trajectory tick", |b| {
        let mut traj = PathTrajectory::new(Arc::clone(&path), params).unwrap();
        b.iter(|| traj.next(0.01));
    });

    c.bench_function("param from length", |b| {
        b.iter(|| path.get_param_from_length(5.0));
    });

    c.bench_function("path length", |b| {
        b.iter(|| path.get_length());
    });
}

criterion_group!(benches, profile_benchmark);
criterion_main!(benches);
