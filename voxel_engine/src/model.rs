//! Colored voxel set with bounds, occupancy index, and adjacency
//! hidden-face pre-pass. Spec.md §3 ("VoxelModel") and §4.2.
//!
//! Grounded on `math_lib_3d/src/model.rs` and `math_lib/src/aabb3.rs`
//! from the teacher crate (part list + bounds/corner bookkeeping),
//! replacing their `EditTriMesh`-oriented part system with a flat,
//! occupancy-indexed voxel set.

use std::collections::HashSet;

use voxel_math::Vector3;

use crate::color::Rgba8;
use crate::error::EngineError;

pub type Position = (i32, i32, i32);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Voxel {
    pub x: i32,
    pub y: i32,
    pub z: i32,
    pub color: Rgba8,
}

impl Voxel {
    pub fn new(x: i32, y: i32, z: i32, color: Rgba8) -> Self {
        Voxel { x, y, z, color }
    }

    pub fn position(&self) -> Position {
        (self.x, self.y, self.z)
    }

    /// The voxel's center in model space (the unit cube spans `[p, p+1]`
    /// on each axis).
    pub fn center(&self) -> Vector3 {
        Vector3::new(self.x as f32 + 0.5, self.y as f32 + 0.5, self.z as f32 + 0.5)
    }
}

/// One of the six unit-cube faces, named by its outward axis direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FaceKind {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

pub const ALL_FACES: [FaceKind; 6] = [
    FaceKind::Front,
    FaceKind::Back,
    FaceKind::Left,
    FaceKind::Right,
    FaceKind::Top,
    FaceKind::Bottom,
];

impl FaceKind {
    /// Outward unit normal: front=+Z, back=-Z, right=+X, left=-X, top=+Y, bottom=-Y.
    pub fn normal(self) -> Vector3 {
        match self {
            FaceKind::Front => Vector3::new(0.0, 0.0, 1.0),
            FaceKind::Back => Vector3::new(0.0, 0.0, -1.0),
            FaceKind::Right => Vector3::new(1.0, 0.0, 0.0),
            FaceKind::Left => Vector3::new(-1.0, 0.0, 0.0),
            FaceKind::Top => Vector3::new(0.0, 1.0, 0.0),
            FaceKind::Bottom => Vector3::new(0.0, -1.0, 0.0),
        }
    }

    /// Integer offset to the neighbor voxel that, if occupied, hides this face.
    pub fn offset(self) -> Position {
        let n = self.normal();
        (n.x as i32, n.y as i32, n.z as i32)
    }

    fn bit(self) -> u8 {
        match self {
            FaceKind::Front => 1 << 0,
            FaceKind::Back => 1 << 1,
            FaceKind::Left => 1 << 2,
            FaceKind::Right => 1 << 3,
            FaceKind::Top => 1 << 4,
            FaceKind::Bottom => 1 << 5,
        }
    }

    /// The four corners (cube-corner indices, bit0=x bit1=y bit2=z) that
    /// bound this face, walked around the rectangle boundary.
    pub fn corner_indices(self) -> [usize; 4] {
        match self {
            FaceKind::Front => [4, 5, 7, 6],
            FaceKind::Back => [0, 1, 3, 2],
            FaceKind::Top => [2, 3, 7, 6],
            FaceKind::Bottom => [0, 1, 5, 4],
            FaceKind::Right => [1, 3, 7, 5],
            FaceKind::Left => [0, 2, 6, 4],
        }
    }
}

/// A compact set of the six `FaceKind`s.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FaceSet(u8);

impl FaceSet {
    pub fn empty() -> Self {
        FaceSet(0)
    }

    pub fn get(&self, face: FaceKind) -> bool {
        self.0 & face.bit() != 0
    }

    pub fn set(&mut self, face: FaceKind, value: bool) {
        if value {
            self.0 |= face.bit();
        } else {
            self.0 &= !face.bit();
        }
    }

    pub fn count(&self) -> u32 {
        self.0.count_ones()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: Position,
    pub max: Position,
}

impl Bounds {
    /// Per spec.md §8: `minA <= maxA` for every axis.
    pub fn is_tight(&self) -> bool {
        self.min.0 <= self.max.0 && self.min.1 <= self.max.1 && self.min.2 <= self.max.2
    }

    pub fn center(&self) -> Vector3 {
        Vector3::new(
            (self.min.0 + self.max.0) as f32 * 0.5 + 0.5,
            (self.min.1 + self.max.1) as f32 * 0.5 + 0.5,
            (self.min.2 + self.max.2) as f32 * 0.5 + 0.5,
        )
    }

    /// Extent + 1 per axis (bounds are inclusive of both endpoints).
    pub fn size(&self) -> (i32, i32, i32) {
        (
            self.max.0 - self.min.0 + 1,
            self.max.1 - self.min.1 + 1,
            self.max.2 - self.min.2 + 1,
        )
    }

    pub fn max_dimension(&self) -> f32 {
        let (sx, sy, sz) = self.size();
        (sx.max(sy).max(sz)) as f32
    }

    /// World-space corner `i` of the bounding box (bit0=x, bit1=y, bit2=z
    /// selects min vs. max on each axis), mirroring
    /// `math_lib/src/aabb3.rs`'s `corner`.
    pub fn corner(&self, i: usize) -> Vector3 {
        Vector3::new(
            if i & 1 != 0 { self.max.0 + 1 } else { self.min.0 } as f32,
            if i & 2 != 0 { self.max.1 + 1 } else { self.min.1 } as f32,
            if i & 4 != 0 { self.max.2 + 1 } else { self.min.2 } as f32,
        )
    }
}

/// An ordered, immutable colored voxel set with a tight bounding box and
/// an O(1) occupancy index.
#[derive(Clone, Debug)]
pub struct VoxelModel {
    voxels: Vec<Voxel>,
    bounds: Option<Bounds>,
    occupancy: HashSet<Position>,
}

impl VoxelModel {
    /// Builds a model from a voxel sequence. Fails with
    /// `InternalInvariantViolated` if the input contains duplicate
    /// positions (spec.md §3: "no duplicate positions").
    pub fn new(voxels: Vec<Voxel>) -> Result<Self, EngineError> {
        let mut occupancy = HashSet::with_capacity(voxels.len());
        for v in &voxels {
            if !occupancy.insert(v.position()) {
                return Err(EngineError::InternalInvariantViolated {
                    invariant: "voxel model has no duplicate positions",
                    detail: format!("duplicate voxel at {:?}", v.position()),
                });
            }
        }

        let bounds = compute_bounds(&voxels);
        if let Some(b) = bounds {
            if !b.is_tight() {
                return Err(EngineError::InternalInvariantViolated {
                    invariant: "voxel model bounds are tight (min <= max per axis)",
                    detail: format!("{:?}", b),
                });
            }
        }

        Ok(VoxelModel { voxels, bounds, occupancy })
    }

    pub fn is_empty(&self) -> bool {
        self.voxels.is_empty()
    }

    pub fn voxels(&self) -> &[Voxel] {
        &self.voxels
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn occupies(&self, pos: Position) -> bool {
        self.occupancy.contains(&pos)
    }

    /// Bounds center, or the origin for an empty model.
    pub fn middle_point(&self) -> Vector3 {
        self.bounds.map(|b| b.center()).unwrap_or(Vector3::ZERO)
    }

    pub fn size(&self) -> (i32, i32, i32) {
        self.bounds.map(|b| b.size()).unwrap_or((0, 0, 0))
    }

    /// For each of the six faces, `true` iff the neighbor voxel in that
    /// face's direction is occupied (spec.md §4.2, §8: `hidden_faces(v,
    /// occ)[f] == true <=> (v + n_f) in occ`).
    pub fn hidden_faces(&self, voxel: &Voxel) -> FaceSet {
        let mut hidden = FaceSet::empty();
        for face in ALL_FACES {
            let (dx, dy, dz) = face.offset();
            let neighbor = (voxel.x + dx, voxel.y + dy, voxel.z + dz);
            hidden.set(face, self.occupies(neighbor));
        }
        hidden
    }
}

fn compute_bounds(voxels: &[Voxel]) -> Option<Bounds> {
    let mut iter = voxels.iter();
    let first = iter.next()?;
    let mut min = (first.x, first.y, first.z);
    let mut max = min;
    for v in iter {
        min.0 = min.0.min(v.x);
        min.1 = min.1.min(v.y);
        min.2 = min.2.min(v.z);
        max.0 = max.0.max(v.x);
        max.1 = max.1.max(v.y);
        max.2 = max.2.max(v.z);
    }
    Some(Bounds { min, max })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(x: i32, y: i32, z: i32) -> Voxel {
        Voxel::new(x, y, z, Rgba8::new(255, 0, 0, 255))
    }

    #[test]
    fn bounds_are_tight_for_any_nonempty_model() {
        let model = VoxelModel::new(vec![v(-2, 0, 5), v(3, -1, 5), v(0, 4, -3)]).unwrap();
        let b = model.bounds().unwrap();
        assert!(b.is_tight());
        assert_eq!(b.min, (-2, -1, -3));
        assert_eq!(b.max, (3, 4, 5));
    }

    #[test]
    fn duplicate_positions_are_rejected() {
        let err = VoxelModel::new(vec![v(0, 0, 0), v(0, 0, 0)]).unwrap_err();
        assert!(matches!(err, EngineError::InternalInvariantViolated { .. }));
    }

    #[test]
    fn hidden_faces_matches_neighbor_occupancy() {
        // A row of 3 voxels along +X: the middle one has both x-neighbors.
        let model = VoxelModel::new(vec![v(0, 0, 0), v(1, 0, 0), v(2, 0, 0)]).unwrap();
        let middle = model.voxels()[1];
        let hidden = model.hidden_faces(&middle);
        assert!(hidden.get(FaceKind::Right));
        assert!(hidden.get(FaceKind::Left));
        assert!(!hidden.get(FaceKind::Top));
        assert!(!hidden.get(FaceKind::Front));

        let edge = model.voxels()[0];
        let hidden_edge = model.hidden_faces(&edge);
        assert!(hidden_edge.get(FaceKind::Right));
        assert!(!hidden_edge.get(FaceKind::Left));
    }

    #[test]
    fn empty_model_has_no_bounds_and_zero_size() {
        let model = VoxelModel::new(vec![]).unwrap();
        assert!(model.is_empty());
        assert!(model.bounds().is_none());
        assert_eq!(model.size(), (0, 0, 0));
    }
}
