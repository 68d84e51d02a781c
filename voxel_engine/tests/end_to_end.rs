//! End-to-end pipeline scenarios, one per the canonical cases spec.md
//! §8 calls out: single-voxel framing, back-face culling on a cube,
//! adjacency culling on a voxel row, rotation round-tripping, adaptive
//! throttle convergence, and animation periodicity.

use std::time::{Duration, Instant};

use voxel_engine::camera::{build_camera, PerspectiveScaleRef, ViewParameters};
use voxel_engine::color::Rgba8;
use voxel_engine::config::EngineConfig;
use voxel_engine::model::{Voxel, VoxelModel};
use voxel_engine::render::{render_frame, CancelToken, RenderOutcome};
use voxel_engine::scheduler::{PreviewScheduler, RequestSource};
use voxel_engine::animation::{frame_rotation, AnimationAxis, AnimationRequest};

fn red(x: i32, y: i32, z: i32) -> Voxel {
    Voxel::new(x, y, z, Rgba8::new(200, 40, 40, 255))
}

#[test]
fn single_voxel_orthographic_render_draws_something_onto_a_background() {
    let model = VoxelModel::new(vec![red(0, 0, 0)]).unwrap();
    let config = EngineConfig {
        view: ViewParameters { orthographic: true, scale_ref: PerspectiveScaleRef::Middle, ..Default::default() },
        width: 64,
        height: 64,
        background: Rgba8::new(0, 0, 0, 0),
        ..EngineConfig::default()
    };

    let outcome = render_frame(&model, &config, &CancelToken::new());
    let image = match outcome {
        RenderOutcome::Rendered { image, metrics, .. } => {
            assert!(metrics.faces_drawn > 0);
            image
        }
        RenderOutcome::Cancelled => panic!("expected a render"),
    };

    let covered = image.pixels().filter(|p| p.0[3] > 0).count();
    assert!(covered > 0, "expected at least one covered pixel");
    assert!(covered < (image.width() * image.height()) as usize, "voxel should not fill the whole frame");
}

#[test]
fn two_cubed_cube_culls_the_fully_interior_shared_faces() {
    // A 2x2x2 block: every voxel has at least one occupied neighbor
    // along each shared face, so adjacency culling must remove those
    // faces from every voxel's drawn set relative to a lone voxel.
    let mut voxels = Vec::new();
    for x in 0..2 {
        for y in 0..2 {
            for z in 0..2 {
                voxels.push(red(x, y, z));
            }
        }
    }
    let model = VoxelModel::new(voxels).unwrap();
    let config = EngineConfig::default();
    let outcome = render_frame(&model, &config, &CancelToken::new());
    match outcome {
        RenderOutcome::Rendered { metrics, .. } => {
            // Spec.md §8 scenario 2: a 2x2x2 cube draws exactly 12 faces
            // once back-face and adjacency culling are both applied.
            assert_eq!(metrics.faces_drawn, 12);
        }
        RenderOutcome::Cancelled => panic!("expected a render"),
    }
}

#[test]
fn row_of_three_hides_only_the_two_internal_faces() {
    // Spec.md §8 scenario 3: a 3x1x1 row culls exactly 2 faces to
    // adjacency (the two faces where the middle voxel meets its
    // neighbors), verified through the real metrics pipeline rather
    // than by inspecting `hidden_faces` directly.
    let model = VoxelModel::new(vec![red(0, 0, 0), red(1, 0, 0), red(2, 0, 0)]).unwrap();
    let config = EngineConfig {
        view: ViewParameters { orthographic: true, ..Default::default() },
        ..EngineConfig::default()
    };
    let outcome = render_frame(&model, &config, &CancelToken::new());
    match outcome {
        RenderOutcome::Rendered { metrics, .. } => {
            assert_eq!(metrics.faces_culled_adj, 2);
        }
        RenderOutcome::Cancelled => panic!("expected a render"),
    }
}

#[test]
fn apply_relative_yaw_round_trips_through_camera_build() {
    use voxel_math::RotationMatrix;
    let start = RotationMatrix::from_euler_degrees(315.0, 324.0, 29.0);
    let forward = start.apply_relative(0.0, 5.0, 0.0);
    let back = forward.apply_relative(0.0, -5.0, 0.0);

    let (sx, sy, sz) = start.to_euler_degrees();
    let (ex, ey, ez) = back.to_euler_degrees();
    assert!((sx - ex).abs() < 1e-3);
    assert!((sy - ey).abs() < 1e-3);
    assert!((sz - ez).abs() < 1e-3);
}

#[test]
fn scheduler_throttle_converges_toward_observed_render_latency() {
    let mut scheduler: PreviewScheduler<u32> = PreviewScheduler::new(20, 1000, 6);
    let simulated_latency = Duration::from_millis(150);
    for i in 0..6 {
        scheduler.enqueue(RequestSource::Interactive, i);
        scheduler.try_dispatch(Instant::now());
        scheduler.record_latency(simulated_latency);
    }
    let interval = scheduler.throttle_interval();
    assert!(interval >= Duration::from_millis(20));
    assert!((interval.as_millis() as i64 - 150).abs() <= 5);
}

#[test]
fn yaw_turntable_animation_is_periodic_over_a_full_span() {
    let request = AnimationRequest {
        axis: AnimationAxis::Yaw,
        base_x_deg: 0.0,
        base_y_deg: 0.0,
        base_z_deg: 0.0,
        start_angle_deg: 0.0,
        total_steps: 4,
        span_deg: 360.0,
    };
    let frame0 = frame_rotation(&request, 0);
    let frame4 = frame_rotation(&request, 4);
    assert!((frame0.rotation_y_deg - frame4.rotation_y_deg).abs() < 1e-3);

    let steps: Vec<f32> = (0..4).map(|i| frame_rotation(&request, i).rotation_y_deg).collect();
    assert_eq!(steps, vec![0.0, 90.0, 180.0, 270.0]);
}
