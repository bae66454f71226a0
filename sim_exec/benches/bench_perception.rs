//! # Perception Benchmark

use criterion::{criterion_group, criterion_main, Criterion};
use image::{Rgb, RgbImage};

use sim_lib::{
    cam_pov::{self, PerspectiveProjector},
    lane_det::{self, LaneDetector},
    pipeline::Pipeline,
    pursuit_ctrl,
    vehicle::{self, StartPose},
};

fn perception_benchmark(c: &mut Criterion) {
    // ---- Build a dummy straight road scene ----

    let mut scene = RgbImage::from_pixel(2000, 600, Rgb([60, 60, 60]));
    for x in 0..2000 {
        for y in (240..=250).chain(350..=360) {
            scene.put_pixel(x, y, Rgb([0, 200, 0]));
        }
    }

    let projector = PerspectiveProjector::new(cam_pov::Params::default());
    let detector = LaneDetector::new(lane_det::Params::default());

    let forward = projector.project(&scene, 200.0, 300.0, 0.0);

    c.bench_function("PerspectiveProjector::project", |b| {
        b.iter(|| projector.project(&scene, 200.0, 300.0, 0.0))
    });

    c.bench_function("LaneDetector::detect", |b| {
        b.iter(|| detector.detect(&forward))
    });

    c.bench_function("LaneDetector::detect_with_overlay", |b| {
        b.iter(|| detector.detect_with_overlay(&forward))
    });

    // Full tick, restarting from the same pose each time
    let pipeline = Pipeline::new(
        vehicle::Params::default(),
        cam_pov::Params::default(),
        lane_det::Params::default(),
        pursuit_ctrl::Params::default(),
    );
    let vehicle = pipeline.spawn(StartPose {
        x: 200.0,
        y: 300.0,
        heading_deg: 0.0,
    });

    c.bench_function("Pipeline::tick", |b| {
        b.iter(|| pipeline.tick(&scene, vehicle.clone(), false))
    });
}

criterion_group!(benches, perception_benchmark);
criterion_main!(benches);
