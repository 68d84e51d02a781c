//! Directional Lambert shader with a cone-falloff spotlight and an
//! optional rim term. Spec.md §4.5's "dynamic" preset: `color = base *
//! (ambient + diffuse * lightColor)`, `diffuse = ndotl^exponent *
//! radialFactor * shadowFactor`.
//!
//! Grounded on `math_lib_3d/src/renderer.rs`'s
//! `directional_light_vector`/`ambient_light_color` fields and Lambert
//! intensity, extended with the `LightingCache` cone geometry and a
//! params table instead of hardcoded constants.

use std::collections::HashMap;

use voxel_math::Vector3;

use super::{FaceInput, FaceOutput, LightingCache, ParamValue, ShaderCategory, ShaderModule, ViewContext};
use crate::color::Color;

const DEFAULT_RIM_STRENGTH: f32 = 0.2;

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0).max(1e-6)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// 1 inside `coreRadius`, 0 outside `baseRadius`, an inverted smoothstep
/// between: `pos_rel` is the voxel center relative to the model's
/// bounds center, in the same (model) space as `lighting.light_model`.
fn radial_factor(pos_rel: Vector3, lighting: &LightingCache) -> f32 {
    let axis_len = lighting.light_model.magnitude();
    if axis_len < 1e-6 {
        return 1.0;
    }
    let axis = lighting.light_model * (1.0 / axis_len);
    let along = pos_rel.dot(axis);
    let perp = (pos_rel - axis * along).magnitude();
    if perp <= lighting.core_radius {
        1.0
    } else if perp >= lighting.base_radius {
        0.0
    } else {
        1.0 - smoothstep(lighting.core_radius, lighting.base_radius, perp)
    }
}

pub struct DynamicShader;

impl ShaderModule for DynamicShader {
    fn id(&self) -> &'static str {
        "dynamic"
    }

    fn category(&self) -> ShaderCategory {
        ShaderCategory::Lighting
    }

    fn shade(
        &self,
        input: FaceInput<'_>,
        view: &ViewContext,
        lighting: &LightingCache,
        params: &HashMap<String, ParamValue>,
    ) -> FaceOutput {
        // No self-shadowing: the visibility pass doesn't carry a
        // raycast against the model, so shadowFactor is fixed at 1.0.
        let shadow_factor = 1.0;
        let n_dot_l = input.world_normal.dot(lighting.cam_light).max(0.0);
        let pos_rel = input.voxel.center() - view.model_center;
        let diffuse = n_dot_l.powf(lighting.exponent) * radial_factor(pos_rel, lighting) * shadow_factor;

        let ambient_color = Color::new(lighting.ambient, lighting.ambient, lighting.ambient, 1.0);
        let mut color = input.base_color.mul_rgb(ambient_color.add_rgb(lighting.light_color.scale_rgb(diffuse)));

        if params.get("rim").and_then(ParamValue::as_bool).unwrap_or(false) {
            let rim_strength = params.get("rim_strength").and_then(ParamValue::as_float).unwrap_or(DEFAULT_RIM_STRENGTH);
            let view_dir = view.view_dir_world * -1.0;
            let n_dot_v = input.world_normal.dot(view_dir);
            let rim = rim_strength * smoothstep(0.55, 0.95, 1.0 - n_dot_v);
            color = color.add_rgb(lighting.light_color.scale_rgb(rim));
        }

        FaceOutput { color: color.clamped() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FaceKind, Voxel};
    use voxel_math::RotationMatrix;

    fn lighting_from(cam_light: Vector3) -> LightingCache {
        LightingCache::build(RotationMatrix::identity(), 0.0, 0.0, 0.25, 0.85, 0.6, Color::new(1.0, 1.0, 1.0, 1.0), 10.0)
            .with_cam_light(cam_light)
    }

    #[test]
    fn face_toward_light_is_brighter_than_face_away() {
        let voxel = Voxel::new(0, 0, 0, crate::color::Rgba8::TRANSPARENT);
        let color = Color::new(0.5, 0.5, 0.5, 1.0);
        let lighting = lighting_from(Vector3::new(0.0, 1.0, 0.0));
        let view = ViewContext { rotation: RotationMatrix::identity(), view_dir_world: Vector3::new(0.0, 0.0, -1.0), model_center: Vector3::ZERO };

        let toward = FaceInput { voxel: &voxel, face: FaceKind::Top, base_color: color, world_normal: Vector3::new(0.0, 1.0, 0.0) };
        let away = FaceInput { voxel: &voxel, face: FaceKind::Bottom, base_color: color, world_normal: Vector3::new(0.0, -1.0, 0.0) };

        let lit_toward = DynamicShader.shade(toward, &view, &lighting, &HashMap::new());
        let lit_away = DynamicShader.shade(away, &view, &lighting, &HashMap::new());
        assert!(lit_toward.color.r > lit_away.color.r);
    }

    #[test]
    fn voxels_outside_the_light_cone_get_no_diffuse_contribution() {
        let voxel_center = Voxel::new(0, 0, 0, crate::color::Rgba8::TRANSPARENT);
        let voxel_far = Voxel::new(50, 0, 0, crate::color::Rgba8::TRANSPARENT);
        let color = Color::new(0.5, 0.5, 0.5, 1.0);
        let lighting = lighting_from(Vector3::new(0.0, 1.0, 0.0));
        let view = ViewContext { rotation: RotationMatrix::identity(), view_dir_world: Vector3::new(0.0, 0.0, -1.0), model_center: Vector3::ZERO };

        let near = FaceInput { voxel: &voxel_center, face: FaceKind::Top, base_color: color, world_normal: Vector3::new(0.0, 1.0, 0.0) };
        let far = FaceInput { voxel: &voxel_far, face: FaceKind::Top, base_color: color, world_normal: Vector3::new(0.0, 1.0, 0.0) };

        let lit_near = DynamicShader.shade(near, &view, &lighting, &HashMap::new());
        let lit_far = DynamicShader.shade(far, &view, &lighting, &HashMap::new());
        assert!(lit_near.color.r > lit_far.color.r);
    }

    #[test]
    fn rim_light_brightens_grazing_faces_when_enabled() {
        let voxel = Voxel::new(0, 0, 0, crate::color::Rgba8::TRANSPARENT);
        let color = Color::new(0.3, 0.3, 0.3, 1.0);
        let lighting = lighting_from(Vector3::new(0.0, 1.0, 0.0));
        let view = ViewContext { rotation: RotationMatrix::identity(), view_dir_world: Vector3::new(0.0, 0.0, -1.0), model_center: Vector3::ZERO };
        let grazing = FaceInput { voxel: &voxel, face: FaceKind::Right, base_color: color, world_normal: Vector3::new(1.0, 0.0, 0.0) };

        let mut params = HashMap::new();
        let no_rim = DynamicShader.shade(grazing, &view, &lighting, &params);
        params.insert("rim".to_string(), ParamValue::Bool(true));
        let with_rim = DynamicShader.shade(grazing, &view, &lighting, &params);
        assert!(with_rim.color.r >= no_rim.color.r);
    }
}
