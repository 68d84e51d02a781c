//! Render-pass counters and timings, surfaced on every `RenderOutcome`
//! so a caller (or the viewer's logging) can see what a frame cost
//! without a full metrics/observability stack — spec.md's Non-goals
//! exclude that surface, not the counters themselves.

use std::time::Duration;

/// Spec.md §3's per-render counters. `faces_backfaced`, `faces_culled_adj`
/// and `faces_drawn` are all counted per face (§4.4: "Counters
/// (facesBackfaced, facesCulledAdj, facesDrawn) are updated per voxel"
/// means once per face considered for each voxel, not once per voxel).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Metrics {
    pub voxels: usize,
    pub faces_backfaced: usize,
    pub faces_culled_adj: usize,
    pub faces_drawn: usize,
    pub polygons_filled: usize,
}

impl Metrics {
    /// `facesDrawn <= facesVisibleRaw` (spec.md §8's subset-filter
    /// invariant): the faces that would have drawn before adjacency
    /// culling, i.e. everything that passed the back-face test.
    pub fn faces_visible_raw(&self) -> usize {
        self.faces_drawn + self.faces_culled_adj
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Timings {
    pub visibility: Duration,
    pub shading: Duration,
    pub rasterize: Duration,
    pub postprocess: Duration,
}

impl Timings {
    pub fn total(&self) -> Duration {
        self.visibility + self.shading + self.rasterize + self.postprocess
    }
}
