//! Back-face and adjacency culling. Spec.md §4.4.
//!
//! Grounded on `math_lib_3d/src/renderer.rs`'s face-normal dot-product
//! cull, generalized from a single mesh to per-voxel face sets and
//! combined with `VoxelModel::hidden_faces` for neighbor occlusion.

use voxel_math::Vector3;

use crate::camera::CameraState;
use crate::metrics::Metrics;
use crate::model::{FaceKind, FaceSet, Voxel, VoxelModel, ALL_FACES};

/// Default minimum `|dot(normal, view)|` for a face to be considered
/// front-facing, lowered proportionally as voxels get larger (a bigger
/// voxel's faces subtend a wider silhouette angle, so a fixed threshold
/// would start clipping valid near-grazing faces).
pub fn backface_threshold(voxel_size: f32) -> f32 {
    0.01 / voxel_size.max(1e-3).min(3.0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibleFace {
    pub face: FaceKind,
}

#[derive(Clone, Debug)]
pub struct VisibleVoxel {
    pub voxel: Voxel,
    pub visible_faces: FaceSet,
    pub view_dir: Vector3,
}

/// The constant view direction faces are tested against: a "front-top-
/// right" three-quarter view, the common default orientation voxel-art
/// tools frame a model from absent an explicit camera-relative normal
/// per voxel (the camera's distance dwarfs a single voxel's extent, so
/// per-voxel parallax is not worth tracking here).
fn view_direction() -> Vector3 {
    Vector3::new(-1.0, -1.0, -1.0).normalized()
}

/// Computes, for every voxel in the model, which faces survive both
/// back-face culling (face normal points away from the camera) and
/// adjacency culling (an occupied neighbor voxel hides the face).
///
/// Spec.md §4.4's two steps gate in order: a face that fails the
/// back-face test is counted `facesBackfaced` regardless of adjacency;
/// only a face that passes it is a "candidate" split further into
/// `facesCulledAdj` (hidden by a neighbor) or `facesDrawn`.
pub fn compute_visibility(
    model: &VoxelModel,
    camera: &CameraState,
    voxel_size: f32,
    metrics: &mut Metrics,
) -> Vec<VisibleVoxel> {
    let threshold = backface_threshold(voxel_size);
    metrics.voxels = model.voxels().len();
    let view_dir = view_direction();

    let mut out = Vec::with_capacity(model.voxels().len());
    for voxel in model.voxels() {
        let hidden_by_neighbor = model.hidden_faces(voxel);
        let mut visible = FaceSet::empty();
        for face in ALL_FACES {
            let world_normal = camera.rotation.rotate(face.normal());
            let facing = world_normal.dot(view_dir);
            if facing < -threshold {
                if hidden_by_neighbor.get(face) {
                    metrics.faces_culled_adj += 1;
                } else {
                    metrics.faces_drawn += 1;
                    visible.set(face, true);
                }
            } else {
                metrics.faces_backfaced += 1;
            }
        }

        if visible.count() > 0 {
            out.push(VisibleVoxel { voxel: *voxel, visible_faces: visible, view_dir });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{build_camera, ViewParameters};
    use crate::color::Rgba8;
    use crate::model::Voxel;

    #[test]
    fn fully_surrounded_voxel_has_no_visible_faces() {
        let mut voxels = vec![Voxel::new(0, 0, 0, Rgba8::new(255, 0, 0, 255))];
        for &(dx, dy, dz) in &[
            (1, 0, 0), (-1, 0, 0), (0, 1, 0), (0, -1, 0), (0, 0, 1), (0, 0, -1),
        ] {
            voxels.push(Voxel::new(dx, dy, dz, Rgba8::new(0, 255, 0, 255)));
        }
        let model = VoxelModel::new(voxels).unwrap();
        let camera = build_camera(&model, &ViewParameters::default(), 256.0, 256.0);
        let mut metrics = Metrics::default();
        let visible = compute_visibility(&model, &camera, 1.0, &mut metrics);
        let center_visible = visible.iter().find(|v| v.voxel.position() == (0, 0, 0));
        assert!(center_visible.is_none());
    }

    #[test]
    fn lone_voxel_shows_exactly_the_camera_facing_faces() {
        let model = VoxelModel::new(vec![Voxel::new(0, 0, 0, Rgba8::new(255, 0, 0, 255))]).unwrap();
        let camera = build_camera(&model, &ViewParameters::default(), 256.0, 256.0);
        let mut metrics = Metrics::default();
        let visible = compute_visibility(&model, &camera, 1.0, &mut metrics);
        assert_eq!(visible.len(), 1);
        assert!(visible[0].visible_faces.count() >= 1);
        assert!(visible[0].visible_faces.count() <= 3);
    }
}
