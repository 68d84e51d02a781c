//! Mesh export format identifiers. Geometry export itself is out of
//! scope (spec.md Non-goals), but the engine still needs a stable name
//! for the formats a future exporter would target, so `EngineConfig`
//! and related tooling have somewhere to reference them without
//! inventing strings ad hoc.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeshFormat {
    Obj,
    Ply,
    Stl,
}
