//! Bell virtual trackball: maps a 2D mouse drag to a 3D rotation axis
//! and angle, per spec.md §4.1.

use crate::utils::safe_acos;
use crate::vector3::Vector3;

const SPHERE_RADIUS_SQUARED_THRESHOLD: f32 = 0.5; // (sqrt(2)/2)^2

/// Projects a mouse position onto the Bell trackball: the unit sphere
/// for points within radius `sqrt(2)/2` of the center, and a hyperbolic
/// sheet beyond that (so drags near the silhouette don't blow up).
fn project_to_trackball(x: f32, y: f32, w: f32, h: f32) -> Vector3 {
    // Normalize to [-1, 1] with +y up, origin at the viewport center.
    let nx = (2.0 * x - w) / w;
    let ny = (h - 2.0 * y) / h;
    let r_sq = nx * nx + ny * ny;

    let z = if r_sq < SPHERE_RADIUS_SQUARED_THRESHOLD {
        (1.0 - r_sq).sqrt()
    } else {
        let r = r_sq.sqrt().max(1e-6);
        0.5 / r
    };

    Vector3::new(nx, ny, z).normalized()
}

/// Returns the rotation `(axis, angle_radians)` that carries the
/// trackball point under `(start_x, start_y)` to the one under
/// `(end_x, end_y)`, for a viewport of size `w x h`.
pub fn axis_angle_from_trackball(
    start_x: f32,
    start_y: f32,
    end_x: f32,
    end_y: f32,
    w: f32,
    h: f32,
) -> (Vector3, f32) {
    let start = project_to_trackball(start_x, start_y, w, h);
    let end = project_to_trackball(end_x, end_y, w, h);

    let axis = start.cross(end);
    let angle = safe_acos(start.dot(end));

    if axis.magnitude_squared() < 1e-12 {
        (Vector3::new(0.0, 1.0, 0.0), 0.0)
    } else {
        (axis.normalized(), angle)
    }
}
