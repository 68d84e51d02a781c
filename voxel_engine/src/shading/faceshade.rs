//! Per-axis flat shade preset: each of the six face directions gets a
//! fixed brightness multiplier, independent of camera or light angle —
//! cheap and stable for orthographic voxel-art previews. Spec.md §4.5.

use std::collections::HashMap;

use super::{FaceInput, FaceOutput, LightingCache, ParamValue, ShaderCategory, ShaderModule, ViewContext};
use crate::model::FaceKind;

fn default_shade(face: FaceKind) -> f32 {
    match face {
        FaceKind::Top => 1.0,
        FaceKind::Front | FaceKind::Back => 0.85,
        FaceKind::Left | FaceKind::Right => 0.7,
        FaceKind::Bottom => 0.55,
    }
}

pub struct FaceShadeShader;

impl ShaderModule for FaceShadeShader {
    fn id(&self) -> &'static str {
        "faceshade"
    }

    fn category(&self) -> ShaderCategory {
        ShaderCategory::Lighting
    }

    fn shade(
        &self,
        input: FaceInput<'_>,
        _view: &ViewContext,
        _lighting: &LightingCache,
        params: &HashMap<String, ParamValue>,
    ) -> FaceOutput {
        let key = match input.face {
            FaceKind::Top => "top",
            FaceKind::Bottom => "bottom",
            FaceKind::Front => "front",
            FaceKind::Back => "back",
            FaceKind::Left => "left",
            FaceKind::Right => "right",
        };
        let shade = params.get(key).and_then(ParamValue::as_float).unwrap_or_else(|| default_shade(input.face));
        FaceOutput { color: input.base_color.scale_rgb(shade).clamped() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;
    use crate::model::Voxel;
    use voxel_math::{RotationMatrix, Vector3};

    #[test]
    fn top_face_is_never_darker_than_bottom() {
        let voxel = Voxel::new(0, 0, 0, crate::color::Rgba8::TRANSPARENT);
        let color = Color::new(1.0, 1.0, 1.0, 1.0);
        let view = ViewContext { rotation: RotationMatrix::identity(), view_dir_world: Vector3::new(0.0, 0.0, -1.0), model_center: Vector3::ZERO };
        let lighting = LightingCache::default();

        let top = FaceInput { voxel: &voxel, face: FaceKind::Top, base_color: color, world_normal: FaceKind::Top.normal() };
        let bottom = FaceInput { voxel: &voxel, face: FaceKind::Bottom, base_color: color, world_normal: FaceKind::Bottom.normal() };

        let top_out = FaceShadeShader.shade(top, &view, &lighting, &HashMap::new());
        let bottom_out = FaceShadeShader.shade(bottom, &view, &lighting, &HashMap::new());
        assert!(top_out.color.r >= bottom_out.color.r);
    }
}
