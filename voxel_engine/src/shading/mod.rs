//! Pluggable shading stack: a `ShaderModule` trait, a registry keyed by
//! stable string id, and the shared per-frame context every shader
//! reads from. Spec.md §4.5.
//!
//! Grounded on `math_lib_3d/src/renderer.rs`'s `Renderer` fields
//! (`directional_light_vector`, `ambient_light_color`,
//! `directional_light_color`) from the teacher crate, generalized into
//! a trait-object pipeline the way `rerun-io-rerun`'s component-registry
//! pattern (string-keyed, `Box<dyn Trait>` table) structures an open
//! set of plugins.

mod basic;
mod dynamic;
mod faceshade;
mod iso;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use voxel_math::{RotationMatrix, Vector3};

use crate::color::Color;
use crate::model::{FaceKind, Voxel};

pub use basic::BasicShader;
pub use dynamic::DynamicShader;
pub use faceshade::FaceShadeShader;
pub use iso::IsoShader;

/// Which stage a shader runs in. Lighting shaders compute the base lit
/// color; fx shaders run afterward and may further modify it (spec.md
/// §4.5: "lighting category before fx category").
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShaderCategory {
    Lighting,
    Fx,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum ParamValue {
    Float(f32),
    Bool(bool),
    Color(Color),
}

impl ParamValue {
    pub fn as_float(&self) -> Option<f32> {
        match self {
            ParamValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ParamValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            ParamValue::Color(v) => Some(*v),
            _ => None,
        }
    }
}

/// Named, per-shader-instance configuration (spec.md's `ShaderConfig`):
/// which shader id to instantiate plus its parameter overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShaderConfig {
    pub shader_id: String,
    pub params: HashMap<String, ParamValue>,
}

impl ShaderConfig {
    pub fn new(shader_id: impl Into<String>) -> Self {
        ShaderConfig { shader_id: shader_id.into(), params: HashMap::new() }
    }

    pub fn with_param(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.params.insert(key.into(), value);
        self
    }
}

/// Scene-wide state computed once per frame and shared by every shader
/// invocation, so per-face shading never redoes camera/light work.
#[derive(Clone, Copy, Debug)]
pub struct ViewContext {
    pub rotation: RotationMatrix,
    pub view_dir_world: Vector3,
    /// Model-space bounds center, shared so shaders needing a voxel's
    /// position relative to the model (e.g. the `dynamic` shader's
    /// light cone) don't each have to thread it through separately.
    pub model_center: Vector3,
}

/// Per-frame lighting state every lighting shader reads from
/// (spec.md's `LightingCache`): the light direction in both camera and
/// model space, the derived ambient/exponent/cone-geometry constants,
/// and the light color.
#[derive(Clone, Copy, Debug)]
pub struct LightingCache {
    /// `-camLight`: points away from the light, kept for shaders that
    /// only need "which way is the light coming from" in world/camera
    /// space.
    pub light_dir_world: Vector3,
    /// `camLight`: direction toward the light, in camera space.
    pub cam_light: Vector3,
    /// `lightModel = Rᵀ·camLight`: direction toward the light in model
    /// space, doubling as the light cone's axis.
    pub light_model: Vector3,
    pub ambient: f32,
    pub exponent: f32,
    pub light_color: Color,
    pub base_radius: f32,
    pub core_radius: f32,
    pub rim_dist_from_center: f32,
}

impl LightingCache {
    /// Builds the cache from the light's yaw/pitch (degrees, spec.md
    /// §4.5's `camLight` formula), normalized ambient/diffuse/diameter
    /// fractions in `[0,1]`, the light color, the current model
    /// rotation, and the model radius `S` the cone geometry is scaled
    /// against.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        rotation: RotationMatrix,
        yaw_deg: f32,
        pitch_deg: f32,
        ambient: f32,
        diffuse: f32,
        diameter: f32,
        light_color: Color,
        model_radius: f32,
    ) -> Self {
        let yaw = yaw_deg.to_radians();
        let pitch = pitch_deg.to_radians();
        let cam_light = Vector3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos()).normalized();
        let light_model = rotation.transpose().rotate(cam_light);

        let exponent = (5.0 - 4.0 * diffuse).max(0.2);
        let ambient = 0.02 + 0.48 * ambient;
        let base_radius = diameter * model_radius;
        let core_radius = base_radius * (1.0 - 0.4 * diffuse);
        let rim_dist_from_center = (model_radius * model_radius - base_radius * base_radius).max(0.0).sqrt();

        LightingCache {
            light_dir_world: cam_light * -1.0,
            cam_light,
            light_model,
            ambient,
            exponent,
            light_color,
            base_radius,
            core_radius,
            rim_dist_from_center,
        }
    }

    pub fn from_angles(yaw_deg: f32, pitch_deg: f32) -> Self {
        LightingCache::build(RotationMatrix::identity(), yaw_deg, pitch_deg, 0.25, 0.85, 0.6, Color::new(1.0, 1.0, 1.0, 1.0), 1.0)
    }

    /// Builds the frame's lighting cache, pulling any `dynamic`-shader
    /// param overrides (yaw/pitch/ambient/diffuse/diameter/light color)
    /// out of the configured shader chain and falling back to spec.md's
    /// three-quarter-light defaults when no `dynamic` stage is present.
    pub fn from_shader_configs(rotation: RotationMatrix, model_radius: f32, configs: &[ShaderConfig]) -> Self {
        let dynamic_params = configs.iter().find(|c| c.shader_id == "dynamic").map(|c| &c.params);
        let get_f = |key: &str, default: f32| -> f32 {
            dynamic_params.and_then(|p| p.get(key)).and_then(ParamValue::as_float).unwrap_or(default)
        };
        let light_color = dynamic_params
            .and_then(|p| p.get("light_color"))
            .and_then(ParamValue::as_color)
            .unwrap_or(Color::new(1.0, 1.0, 1.0, 1.0));

        LightingCache::build(
            rotation,
            get_f("yaw", 45.0),
            get_f("pitch", 35.0),
            get_f("ambient", 0.25),
            get_f("diffuse", 0.85),
            get_f("diameter", 0.6),
            light_color,
            model_radius,
        )
    }

    /// Overrides the cached light direction directly, useful for tests
    /// that want an exact `cam_light` without reverse-engineering a
    /// yaw/pitch pair. Only valid when the cache was built with an
    /// identity rotation, since `light_model` is not re-derived from a
    /// stored rotation matrix.
    pub fn with_cam_light(mut self, cam_light: Vector3) -> Self {
        let cam_light = cam_light.normalized();
        self.cam_light = cam_light;
        self.light_model = cam_light;
        self.light_dir_world = cam_light * -1.0;
        self
    }
}

impl Default for LightingCache {
    fn default() -> Self {
        // "Three-quarter" lighting: up and to the side, a common default
        // in voxel-art renderers absent an explicit light direction.
        LightingCache::from_angles(45.0, 35.0)
    }
}

/// One face of one voxel, as handed to a shader.
#[derive(Clone, Copy, Debug)]
pub struct FaceInput<'a> {
    pub voxel: &'a Voxel,
    pub face: FaceKind,
    pub base_color: Color,
    pub world_normal: Vector3,
}

#[derive(Clone, Copy, Debug)]
pub struct FaceOutput {
    pub color: Color,
}

/// A pluggable shading stage. Implementors read `FaceInput` and the
/// shared per-frame caches and return a (possibly modified) color.
pub trait ShaderModule: Send + Sync {
    fn id(&self) -> &'static str;
    fn category(&self) -> ShaderCategory;
    fn shade(
        &self,
        input: FaceInput<'_>,
        view: &ViewContext,
        lighting: &LightingCache,
        params: &HashMap<String, ParamValue>,
    ) -> FaceOutput;
}

/// String-keyed registry of the built-in (and any caller-registered)
/// shader modules, ordered lighting-before-fx at build time.
pub struct ShaderRegistry {
    modules: HashMap<&'static str, Box<dyn ShaderModule>>,
}

impl ShaderRegistry {
    pub fn new() -> Self {
        let mut reg = ShaderRegistry { modules: HashMap::new() };
        reg.register(Box::new(BasicShader));
        reg.register(Box::new(DynamicShader));
        reg.register(Box::new(FaceShadeShader));
        reg.register(Box::new(IsoShader));
        reg
    }

    pub fn register(&mut self, module: Box<dyn ShaderModule>) {
        self.modules.insert(module.id(), module);
    }

    pub fn get(&self, id: &str) -> Option<&dyn ShaderModule> {
        self.modules.get(id).map(|b| b.as_ref())
    }
}

impl Default for ShaderRegistry {
    fn default() -> Self {
        ShaderRegistry::new()
    }
}

/// A resolved, ready-to-run shader pipeline for one frame: the
/// requested shader configs, sorted lighting-category first.
pub struct ShaderPipeline<'a> {
    stages: Vec<(&'a dyn ShaderModule, &'a HashMap<String, ParamValue>)>,
}

impl<'a> ShaderPipeline<'a> {
    pub fn build(registry: &'a ShaderRegistry, configs: &'a [ShaderConfig]) -> Self {
        let mut stages: Vec<_> = configs
            .iter()
            .filter_map(|cfg| registry.get(&cfg.shader_id).map(|m| (m, &cfg.params)))
            .collect();
        stages.sort_by_key(|(m, _)| match m.category() {
            ShaderCategory::Lighting => 0,
            ShaderCategory::Fx => 1,
        });
        ShaderPipeline { stages }
    }

    pub fn run(&self, mut input: FaceInput<'_>, view: &ViewContext, lighting: &LightingCache) -> Color {
        let mut color = input.base_color;
        for (module, params) in &self.stages {
            let out = module.shade(input, view, lighting, params);
            color = out.color;
            input.base_color = color;
        }
        color
    }
}
