//! Turntable animation driver. Spec.md §6 ("Animation driver").
//!
//! Per frame rotation is computed directly from the frame index rather
//! than accumulated frame-to-frame, so periodicity (frame 0 and frame
//! N land on the same angle for an N-step full-turn span) holds
//! exactly regardless of how many frames were generated before it —
//! grounded on `math_lib_3d/src/camera.rs`'s orbit-camera angle
//! parametrization, generalized from a single free axis to the six
//! axes spec.md names and routed through `RotationMatrix::
//! apply_absolute`/`apply_relative` rather than raw Euler addition, so
//! `Pitch`/`Yaw`/`Roll` compose in the camera's frame the same way a
//! live trackball drag would.

use serde::{Deserialize, Serialize};

use voxel_math::RotationMatrix;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationAxis {
    X,
    Y,
    Z,
    Pitch,
    Yaw,
    Roll,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnimationRequest {
    pub axis: AnimationAxis,
    /// The base view's Euler orientation (spec.md's `baseView`), held
    /// fixed across every frame except for the swept axis.
    pub base_x_deg: f32,
    pub base_y_deg: f32,
    pub base_z_deg: f32,
    /// Offset added to every frame's swept-axis angle before the
    /// per-step delta (spec.md's `startAngle`).
    pub start_angle_deg: f32,
    pub total_steps: u32,
    /// Total degrees swept across the full animation (360 for a
    /// complete turntable loop).
    pub span_deg: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationFrame {
    pub index: u32,
    pub rotation_x_deg: f32,
    pub rotation_y_deg: f32,
    pub rotation_z_deg: f32,
}

/// `ceil(1440 / steps)`, the millisecond duration spec.md §6 assigns to
/// each frame of a `steps`-frame animation.
pub fn frame_duration_ms(total_steps: u32) -> u32 {
    let steps = total_steps.max(1) as f32;
    (1440.0 / steps).ceil() as u32
}

/// The rotation for frame `index` of `total_steps`, computed directly
/// (not accumulated) so `frame_rotation(req, 0)` and
/// `frame_rotation(req, total_steps)` agree whenever `span_deg` is a
/// multiple of 360. `X`/`Y`/`Z` compose via `apply_absolute` (the
/// model's own axes); `Pitch`/`Yaw`/`Roll` via `apply_relative` (the
/// camera's frame).
pub fn frame_rotation(request: &AnimationRequest, index: u32) -> AnimationFrame {
    let steps = request.total_steps.max(1) as f32;
    let degrees_per_step = request.span_deg / steps;
    let angle = request.start_angle_deg + degrees_per_step * index as f32;

    let base = RotationMatrix::from_euler_degrees(request.base_x_deg, request.base_y_deg, request.base_z_deg);
    let rotated = match request.axis {
        AnimationAxis::X => base.apply_absolute(angle, 0.0, 0.0),
        AnimationAxis::Y => base.apply_absolute(0.0, angle, 0.0),
        AnimationAxis::Z => base.apply_absolute(0.0, 0.0, angle),
        AnimationAxis::Pitch => base.apply_relative(angle, 0.0, 0.0),
        AnimationAxis::Yaw => base.apply_relative(0.0, angle, 0.0),
        AnimationAxis::Roll => base.apply_relative(0.0, 0.0, angle),
    };

    let (x, y, z) = rotated.to_euler_degrees();
    AnimationFrame { index, rotation_x_deg: x, rotation_y_deg: y, rotation_z_deg: z }
}

/// Generates all frames `0..total_steps` (exclusive of the final
/// wrap-around frame, which duplicates frame 0 for a full-span loop).
pub fn generate_frames(request: &AnimationRequest) -> Vec<AnimationFrame> {
    (0..request.total_steps).map(|i| frame_rotation(request, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaw_request() -> AnimationRequest {
        AnimationRequest {
            axis: AnimationAxis::Yaw,
            base_x_deg: 0.0,
            base_y_deg: 0.0,
            base_z_deg: 0.0,
            start_angle_deg: 0.0,
            total_steps: 4,
            span_deg: 360.0,
        }
    }

    #[test]
    fn full_turn_yaw_animation_is_periodic() {
        let req = yaw_request();
        let first = frame_rotation(&req, 0);
        let wrapped = frame_rotation(&req, 4);
        assert!((first.rotation_y_deg - wrapped.rotation_y_deg).abs() < 1e-3);
    }

    #[test]
    fn yaw_animation_only_moves_the_yaw_axis() {
        let req = AnimationRequest { base_x_deg: 10.0, base_z_deg: 20.0, ..yaw_request() };
        let frames = generate_frames(&req);
        assert_eq!(frames.len(), 4);
        for f in &frames {
            assert!((f.rotation_x_deg - 10.0).abs() < 1e-3);
            assert!((f.rotation_z_deg - 20.0).abs() < 1e-3);
        }
        assert!((frames[1].rotation_y_deg - 90.0).abs() < 1e-3);
        assert!((frames[2].rotation_y_deg - 180.0).abs() < 1e-3);
    }

    #[test]
    fn start_angle_offsets_every_frame() {
        let req = AnimationRequest { start_angle_deg: 45.0, ..yaw_request() };
        let frame0 = frame_rotation(&req, 0);
        assert!((frame0.rotation_y_deg - 45.0).abs() < 1e-3);
    }

    #[test]
    fn frame_duration_matches_spec_scenario_six() {
        assert_eq!(frame_duration_ms(4), 360);
    }

    #[test]
    fn x_axis_animation_uses_absolute_composition() {
        let req = AnimationRequest {
            axis: AnimationAxis::X,
            base_x_deg: 0.0,
            base_y_deg: 0.0,
            base_z_deg: 0.0,
            start_angle_deg: 0.0,
            total_steps: 4,
            span_deg: 360.0,
        };
        let frames = generate_frames(&req);
        assert!((frames[1].rotation_x_deg - 90.0).abs() < 1e-3);
        assert!(frames[1].rotation_y_deg.abs() < 1e-3 || (frames[1].rotation_y_deg - 360.0).abs() < 1e-3);
    }
}
