//! Fixed-function "basic" light: a view-dependent brightness curve with
//! no light direction of its own, spec.md's default shader
//! (`[basicLight]`). Grounded on `math_lib_3d/src/renderer.rs`'s
//! "no-light" fallback path, extended with the `si`/`li` falloff curve
//! spec.md §4.5 names.

use std::collections::HashMap;

use super::{FaceInput, FaceOutput, LightingCache, ParamValue, ShaderCategory, ShaderModule, ViewContext};

const DEFAULT_SI: f32 = 0.5;
const DEFAULT_LI: f32 = 0.25;

pub struct BasicShader;

impl ShaderModule for BasicShader {
    fn id(&self) -> &'static str {
        "basic"
    }

    fn category(&self) -> ShaderCategory {
        ShaderCategory::Lighting
    }

    fn shade(
        &self,
        input: FaceInput<'_>,
        view: &ViewContext,
        _lighting: &LightingCache,
        params: &HashMap<String, ParamValue>,
    ) -> FaceOutput {
        let si = params.get("si").and_then(ParamValue::as_float).unwrap_or(DEFAULT_SI).clamp(0.0, 1.0);
        let li = params.get("li").and_then(ParamValue::as_float).unwrap_or(DEFAULT_LI).clamp(0.0, 1.0);

        let floor = 0.05 + 0.9 * li;
        let view_dir = view.view_dir_world * -1.0;
        let n_dot_v = input.world_normal.dot(view_dir).max(0.0);
        let exponent = 1.0 + 6.0 * (1.0 - si).powi(2);
        let b = floor + (1.0 - floor) * n_dot_v.powf(exponent);

        FaceOutput { color: input.base_color.scale_rgb(b).clamped() }
    }
}
