//! Demo CLI: builds a small synthetic voxel model, renders a single
//! still frame and a turntable animation, and writes the results to
//! `demos/` as PNGs.

use std::path::Path;

use voxel_engine::animation::{generate_frames, AnimationAxis, AnimationRequest};
use voxel_engine::camera::ViewParameters;
use voxel_engine::color::Rgba8;
use voxel_engine::config::EngineConfig;
use voxel_engine::model::{Voxel, VoxelModel};
use voxel_engine::render::{render_frame, CancelToken, RenderOutcome};
use voxel_engine::shading::ShaderConfig;

fn build_demo_model() -> VoxelModel {
    let mut voxels = Vec::new();
    for x in -2..=2 {
        for y in -2..=2 {
            for z in -2..=2 {
                if x * x + y * y + z * z <= 4 {
                    let t = ((x + 2) as f32) / 4.0;
                    let color = Rgba8::new(
                        (60.0 + t * 180.0) as u8,
                        (120.0 + (1.0 - t) * 100.0) as u8,
                        200,
                        255,
                    );
                    voxels.push(Voxel::new(x, y, z, color));
                }
            }
        }
    }
    VoxelModel::new(voxels).expect("demo model has no duplicate positions")
}

fn write_png(image: &image::RgbaImage, path: &Path) {
    if let Err(err) = image.save(path) {
        log::error!("failed writing {}: {err}", path.display());
    } else {
        log::info!("wrote {}", path.display());
    }
}

fn main() {
    env_logger::init();

    let out_dir = Path::new("demos");
    if let Err(err) = std::fs::create_dir_all(out_dir) {
        log::error!("failed creating {}: {err}", out_dir.display());
        return;
    }

    let model = build_demo_model();
    log::info!("demo model has {} voxels", model.voxels().len());

    let still_config = EngineConfig {
        view: ViewParameters {
            rotation_x_deg: 20.0,
            rotation_y_deg: 35.0,
            rotation_z_deg: 0.0,
            ..Default::default()
        },
        shaders: vec![ShaderConfig::new("dynamic")],
        width: 256,
        height: 256,
        supersample: 2,
        background: Rgba8::new(18, 18, 24, 255),
        ..EngineConfig::default()
    };

    match render_frame(&model, &still_config, &CancelToken::new()) {
        RenderOutcome::Rendered { image, metrics, timings } => {
            log::info!(
                "still frame: {} voxels, {} faces drawn in {:?}",
                metrics.voxels,
                metrics.faces_drawn,
                timings.total()
            );
            write_png(&image, &out_dir.join("still.png"));
        }
        RenderOutcome::Cancelled => log::warn!("still frame render was cancelled"),
    }

    let animation_request = AnimationRequest {
        axis: AnimationAxis::Yaw,
        base_x_deg: 20.0,
        base_y_deg: 0.0,
        base_z_deg: 0.0,
        start_angle_deg: 0.0,
        total_steps: 12,
        span_deg: 360.0,
    };
    for frame in generate_frames(&animation_request) {
        let config = EngineConfig {
            view: ViewParameters {
                rotation_x_deg: frame.rotation_x_deg,
                rotation_y_deg: frame.rotation_y_deg,
                rotation_z_deg: frame.rotation_z_deg,
                ..Default::default()
            },
            shaders: vec![ShaderConfig::new("dynamic")],
            width: 128,
            height: 128,
            background: Rgba8::new(18, 18, 24, 255),
            ..EngineConfig::default()
        };
        match render_frame(&model, &config, &CancelToken::new()) {
            RenderOutcome::Rendered { image, .. } => {
                write_png(&image, &out_dir.join(format!("turntable_{:02}.png", frame.index)));
            }
            RenderOutcome::Cancelled => log::warn!("turntable frame {} was cancelled", frame.index),
        }
    }
}
