//! Layer-scroll mode: a non-mutating view over the voxels within a
//! sliding Z window of a model, for "scroll through the stack"
//! inspection. Spec.md §4.10 — silent in spec.md on the exact
//! windowing rule; resolved here (see DESIGN.md) as an inclusive
//! `[focus_z - radius, focus_z + radius]` filter, since that is the
//! simplest rule consistent with the component's name and with the
//! rest of the pipeline taking a `VoxelModel` by reference.

use crate::model::{Voxel, VoxelModel};

/// The voxels of `model` whose Z lies within `radius` of `focus_z`,
/// inclusive on both ends.
pub fn layer_window(model: &VoxelModel, focus_z: i32, radius: i32) -> Vec<Voxel> {
    let radius = radius.max(0);
    model
        .voxels()
        .iter()
        .copied()
        .filter(|v| (v.z - focus_z).abs() <= radius)
        .collect()
}

/// Caches the last computed window so repeated scrolls by one layer at
/// a time don't rescan the whole model when the window hasn't moved.
pub struct LayerScrollCache {
    focus_z: Option<i32>,
    radius: i32,
    voxels: Vec<Voxel>,
}

impl LayerScrollCache {
    pub fn new(radius: i32) -> Self {
        LayerScrollCache { focus_z: None, radius: radius.max(0), voxels: Vec::new() }
    }

    pub fn window(&mut self, model: &VoxelModel, focus_z: i32) -> &[Voxel] {
        if self.focus_z != Some(focus_z) {
            self.voxels = layer_window(model, focus_z, self.radius);
            self.focus_z = Some(focus_z);
        }
        &self.voxels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;
    use crate::model::Voxel;

    #[test]
    fn window_includes_only_voxels_within_radius_inclusive() {
        let voxels = (0..10).map(|z| Voxel::new(0, 0, z, Rgba8::new(0, 0, 0, 255))).collect();
        let model = VoxelModel::new(voxels).unwrap();
        let window = layer_window(&model, 5, 2);
        let zs: Vec<i32> = window.iter().map(|v| v.z).collect();
        assert_eq!(zs.len(), 5);
        assert!(zs.contains(&3));
        assert!(zs.contains(&7));
        assert!(!zs.contains(&2));
        assert!(!zs.contains(&8));
    }

    #[test]
    fn cache_recomputes_only_when_focus_changes() {
        let voxels = (0..6).map(|z| Voxel::new(0, 0, z, Rgba8::new(0, 0, 0, 255))).collect();
        let model = VoxelModel::new(voxels).unwrap();
        let mut cache = LayerScrollCache::new(1);
        let first = cache.window(&model, 2).to_vec();
        let second = cache.window(&model, 2).to_vec();
        assert_eq!(first, second);
        let moved = cache.window(&model, 4).to_vec();
        assert_ne!(first, moved);
    }
}
