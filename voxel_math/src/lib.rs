//! Pure vector/rotation algebra for the voxel preview engine.
//!
//! No knowledge of voxels, cameras, or pixels lives here — see
//! `voxel_engine` for everything that builds on top of this algebra.

pub mod rotation_matrix;
pub mod trackball;
pub mod utils;
pub mod vector3;

pub use rotation_matrix::RotationMatrix;
pub use trackball::axis_angle_from_trackball;
pub use vector3::Vector3;
