//! Top-level render pipeline orchestration. Spec.md §5, §7.
//!
//! Wires together camera -> visibility -> shading -> rasterize ->
//! postprocess. An empty model is not an error (spec.md §7): it
//! renders straight to a background-only image. Cancellation is
//! cooperative, checked between pipeline stages, mirroring the
//! explicit-ownership worker design in [scheduler].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use image::RgbaImage;
use log::debug;

use crate::camera::{build_camera, ViewParameters};
use crate::config::EngineConfig;
use crate::metrics::{Metrics, Timings};
use crate::model::VoxelModel;
use crate::postprocess::{apply_outline, downsample};
use crate::shading::{LightingCache, ShaderPipeline, ShaderRegistry};
use crate::visibility::compute_visibility;

/// A cheaply-cloned cooperative cancellation flag. The render pipeline
/// checks it between stages and bails out with `RenderOutcome::Cancelled`
/// rather than an error — a cancelled render is an expected outcome of
/// a superseded preview request, not a failure.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        CancelToken(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub enum RenderOutcome {
    Rendered { image: RgbaImage, metrics: Metrics, timings: Timings },
    Cancelled,
}

impl RenderOutcome {
    pub fn image(&self) -> Option<&RgbaImage> {
        match self {
            RenderOutcome::Rendered { image, .. } => Some(image),
            RenderOutcome::Cancelled => None,
        }
    }
}

/// Renders one frame of `model` under `config`'s view/shading/
/// post-processing settings.
pub fn render_frame(model: &VoxelModel, config: &EngineConfig, cancel: &CancelToken) -> RenderOutcome {
    let config = config.clone().clamped();
    let mut metrics = Metrics::default();
    let mut timings = Timings::default();

    let render_w = config.width * config.supersample;
    let render_h = config.height * config.supersample;
    let mut image = RgbaImage::new(render_w, render_h);

    if model.is_empty() {
        debug!("render_frame: empty model, emitting background-only image");
        for px in image.pixels_mut() {
            *px = config.background.into();
        }
        return finish(image, &config, metrics, timings);
    }

    if cancel.is_cancelled() {
        return RenderOutcome::Cancelled;
    }

    let camera = build_camera(model, &view_from_config(&config), render_w as f32, render_h as f32);

    let vis_start = std::time::Instant::now();
    let visible = compute_visibility(model, &camera, config.voxel_size, &mut metrics);
    timings.visibility += vis_start.elapsed();

    if cancel.is_cancelled() {
        return RenderOutcome::Cancelled;
    }

    let registry = ShaderRegistry::new();
    let pipeline = ShaderPipeline::build(&registry, &config.shaders);
    let model_radius = model.bounds().map(|b| b.max_dimension() * 0.5).unwrap_or(1.0);
    let lighting = LightingCache::from_shader_configs(camera.rotation, model_radius, &config.shaders);

    if cancel.is_cancelled() {
        return RenderOutcome::Cancelled;
    }

    crate::raster::rasterize(&visible, &camera, &pipeline, &lighting, config.background, &mut image, &mut timings, &mut metrics);

    if cancel.is_cancelled() {
        return RenderOutcome::Cancelled;
    }

    finish(image, &config, metrics, timings)
}

fn finish(mut image: RgbaImage, config: &EngineConfig, metrics: Metrics, mut timings: Timings) -> RenderOutcome {
    let post_start = std::time::Instant::now();
    apply_outline(&mut image, &config.outline);
    let image = if config.supersample > 1 {
        downsample(&image, config.supersample, config.downsample)
    } else {
        image
    };
    timings.postprocess += post_start.elapsed();
    RenderOutcome::Rendered { image, metrics, timings }
}

fn view_from_config(config: &EngineConfig) -> ViewParameters {
    config.view
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use crate::model::Voxel;

    #[test]
    fn empty_model_renders_a_background_only_image() {
        let model = VoxelModel::new(vec![]).unwrap();
        let config = EngineConfig { background: Rgba8::new(10, 20, 30, 255), ..EngineConfig::default() };
        let outcome = render_frame(&model, &config, &CancelToken::new());
        match outcome {
            RenderOutcome::Rendered { image, .. } => {
                let p: Rgba8 = (*image.get_pixel(0, 0)).into();
                assert_eq!(p, Rgba8::new(10, 20, 30, 255));
            }
            RenderOutcome::Cancelled => panic!("expected a render"),
        }
    }

    #[test]
    fn pre_cancelled_token_short_circuits_a_nonempty_model() {
        let model = VoxelModel::new(vec![Voxel::new(0, 0, 0, Rgba8::new(255, 0, 0, 255))]).unwrap();
        let cancel = CancelToken::new();
        cancel.cancel();
        let outcome = render_frame(&model, &EngineConfig::default(), &cancel);
        assert!(matches!(outcome, RenderOutcome::Cancelled));
    }

    #[test]
    fn single_voxel_produces_nonzero_visible_faces() {
        let model = VoxelModel::new(vec![Voxel::new(0, 0, 0, Rgba8::new(255, 0, 0, 255))]).unwrap();
        let outcome = render_frame(&model, &EngineConfig::default(), &CancelToken::new());
        match outcome {
            RenderOutcome::Rendered { metrics, .. } => assert!(metrics.faces_drawn > 0),
            RenderOutcome::Cancelled => panic!("expected a render"),
        }
    }
}
