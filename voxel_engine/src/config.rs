//! Top-level engine configuration, the aggregate `serde`-serializable
//! shape a caller loads from disk or a request body. Spec.md §7:
//! `InvalidConfig` is not a fatal error — out-of-range fields are
//! clamped into their valid range at the boundary, the way
//! `ViewParameters::clamped` already does for FOV and zoom.

use serde::{Deserialize, Serialize};

use crate::camera::ViewParameters;
use crate::color::Rgba8;
use crate::postprocess::{DownsampleMode, OutlineSettings};
use crate::shading::ShaderConfig;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    pub view: ViewParameters,
    pub shaders: Vec<ShaderConfig>,
    pub outline: OutlineSettings,
    pub downsample: DownsampleMode,
    pub width: u32,
    pub height: u32,
    pub supersample: u32,
    pub background: Rgba8,
    pub voxel_size: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            view: ViewParameters::default(),
            shaders: vec![ShaderConfig::new("basic")],
            outline: OutlineSettings::default(),
            downsample: DownsampleMode::Nearest,
            width: 256,
            height: 256,
            supersample: 1,
            background: Rgba8::TRANSPARENT,
            voxel_size: 1.0,
        }
    }
}

impl EngineConfig {
    /// Clamps every field to a valid, non-degenerate range instead of
    /// rejecting the config outright.
    pub fn clamped(mut self) -> Self {
        self.view = self.view.clamped();
        self.width = self.width.max(1);
        self.height = self.height.max(1);
        self.supersample = self.supersample.max(1);
        self.voxel_size = self.voxel_size.max(1e-3);
        if self.shaders.is_empty() {
            self.shaders.push(ShaderConfig::new("basic"));
        }
        self
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        let config: EngineConfig = serde_json::from_str(text)?;
        Ok(config.clamped())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
