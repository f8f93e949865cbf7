//! Performance benchmarks for the per-frame overlay path

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};
use virtual_tryon::{
    asset::OverlayAsset,
    canvas::Canvas,
    compositor::OverlayCompositor,
    constants::{
        landmark_index::{LEFT_EAR, LEFT_EYE_INNER, NOSE_TIP, RIGHT_EAR, RIGHT_EYE_INNER},
        MIN_FACE_MESH_LANDMARKS,
    },
    landmarks::{FrameDimensions, Landmark, LandmarkSet},
    placement::{compute_placement, UserAdjustment},
    pose_estimation::PoseEstimator,
};

fn jittered_face() -> LandmarkSet {
    let jitter = || (rand::random::<f32>() - 0.5) * 0.01;
    let mut points: Vec<Landmark> = (0..MIN_FACE_MESH_LANDMARKS)
        .map(|_| Landmark::with_depth(0.5 + jitter(), 0.5 + jitter(), jitter()))
        .collect();
    points[NOSE_TIP] = Landmark::with_depth(0.51 + jitter(), 0.5, 0.03);
    points[LEFT_EAR] = Landmark::new(0.3 + jitter(), 0.45);
    points[RIGHT_EAR] = Landmark::new(0.7 + jitter(), 0.45);
    points[LEFT_EYE_INNER] = Landmark::new(0.34 + jitter(), 0.42 + jitter());
    points[RIGHT_EYE_INNER] = Landmark::new(0.53 + jitter(), 0.42 + jitter());
    LandmarkSet::new(points)
}

fn benchmark_pose_estimation(c: &mut Criterion) {
    let mut group = c.benchmark_group("pose_estimation");
    let dims = FrameDimensions::new(640, 480);
    let estimator = PoseEstimator::new();
    let face = jittered_face();

    group.bench_function("estimate_rotation", |b| {
        b.iter(|| black_box(estimator.estimate_rotation(black_box(&face), dims)));
    });

    let rotation = estimator.estimate_rotation(&face, dims);
    group.bench_function("compute_placement", |b| {
        b.iter(|| {
            let placement = compute_placement(&face, dims, &rotation, UserAdjustment::default(), 0.4, 2.2)
                .expect("placement failed");
            black_box(placement);
        });
    });

    group.finish();
}

fn benchmark_composite(c: &mut Criterion) {
    let mut group = c.benchmark_group("composite");
    let dims = FrameDimensions::new(640, 480);
    let frame = RgbaImage::from_pixel(dims.width, dims.height, Rgba([90, 90, 90, 255]));
    let face = jittered_face();

    for (name, asset) in [
        ("placeholder", OverlayAsset::placeholder()),
        (
            "opaque_1000x400",
            OverlayAsset::from_image(RgbaImage::from_pixel(1000, 400, Rgba([10, 10, 10, 255])))
                .expect("asset failed"),
        ),
    ] {
        let mut compositor = OverlayCompositor::new(asset);
        let mut canvas = Canvas::new(dims);

        for alpha in [100, 50] {
            group.bench_with_input(BenchmarkId::new(name, alpha), &alpha, |b, &alpha| {
                let adjustment = UserAdjustment::new(100, alpha);
                b.iter(|| black_box(compositor.composite(&mut canvas, &frame, Some(&face), adjustment)));
            });
        }
    }

    group.bench_function("no_face_640x480", |b| {
        let mut compositor = OverlayCompositor::new(OverlayAsset::placeholder());
        let mut canvas = Canvas::new(dims);
        b.iter(|| black_box(compositor.composite(&mut canvas, &frame, None, UserAdjustment::default())));
    });

    group.finish();
}

criterion_group!(benches, benchmark_pose_estimation, benchmark_composite);
criterion_main!(benches);
