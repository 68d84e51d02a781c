//! Three-color isometric preset: every face maps to one of a top/left/
//! right color triad, the classic isometric-sprite look. Spec.md
//! §4.5. The spec names only three colors for six faces; the
//! remaining three (front, back, bottom) are folded onto the nearest
//! of the three visible-in-isometric-view directions: front/back onto
//! right/left respectively (both are "side" faces in an isometric
//! view) and bottom onto left.

use std::collections::HashMap;

use super::{FaceInput, FaceOutput, LightingCache, ParamValue, ShaderCategory, ShaderModule, ViewContext};
use crate::color::Color;
use crate::model::FaceKind;

const DEFAULT_TOP: Color = Color::new(1.0, 1.0, 1.0, 1.0);
const DEFAULT_LEFT: Color = Color::new(0.65, 0.65, 0.65, 1.0);
const DEFAULT_RIGHT: Color = Color::new(0.8, 0.8, 0.8, 1.0);

pub struct IsoShader;

impl ShaderModule for IsoShader {
    fn id(&self) -> &'static str {
        "iso"
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
        let tint = match input.face {
            FaceKind::Top => params.get("top").and_then(ParamValue::as_color).unwrap_or(DEFAULT_TOP),
            FaceKind::Left | FaceKind::Back | FaceKind::Bottom => {
                params.get("left").and_then(ParamValue::as_color).unwrap_or(DEFAULT_LEFT)
            }
            FaceKind::Right | FaceKind::Front => {
                params.get("right").and_then(ParamValue::as_color).unwrap_or(DEFAULT_RIGHT)
            }
        };
        FaceOutput { color: input.base_color.mul_rgb(tint).clamped() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Voxel;
    use voxel_math::{RotationMatrix, Vector3};

    #[test]
    fn six_faces_collapse_to_three_distinct_tints() {
        let voxel = Voxel::new(0, 0, 0, crate::color::Rgba8::TRANSPARENT);
        let color = Color::new(1.0, 1.0, 1.0, 1.0);
        let view = ViewContext { rotation: RotationMatrix::identity(), view_dir_world: Vector3::new(0.0, 0.0, -1.0), model_center: Vector3::ZERO };
        let lighting = LightingCache::default();

        let shade = |face: FaceKind| {
            let input = FaceInput { voxel: &voxel, face, base_color: color, world_normal: face.normal() };
            IsoShader.shade(input, &view, &lighting, &HashMap::new()).color
        };

        let top = shade(FaceKind::Top);
        let left = shade(FaceKind::Left);
        let right = shade(FaceKind::Right);
        assert_eq!(shade(FaceKind::Back), left);
        assert_eq!(shade(FaceKind::Bottom), left);
        assert_eq!(shade(FaceKind::Front), right);
        assert_ne!(top, left);
        assert_ne!(left, right);
    }
}
