//! 3x3 orthonormal rotation matrices and Euler-angle conversion.
//!
//! Grounded on `math_lib/src/rotation_matrix.rs` and
//! `math_lib/src/euler_angles.rs` from the teacher crate, which carry
//! the same "Z*Y*X composition / gimbal-lock-at-the-poles" shape this
//! spec calls for; generalized from heading/pitch/bank radians to the
//! spec's X/Y/Z-degree authoritative representation.

use crate::utils::normalize_degrees;
use crate::vector3::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Row-major 3x3 rotation matrix. `m[row][col]`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RotationMatrix {
    m: [[f32; 3]; 3],
}

fn rot_x(theta: f32) -> RotationMatrix {
    let (s, c) = theta.sin_cos();
    RotationMatrix {
        m: [[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]],
    }
}

fn rot_y(theta: f32) -> RotationMatrix {
    let (s, c) = theta.sin_cos();
    RotationMatrix {
        m: [[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]],
    }
}

fn rot_z(theta: f32) -> RotationMatrix {
    let (s, c) = theta.sin_cos();
    RotationMatrix {
        m: [[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]],
    }
}

impl RotationMatrix {
    pub const fn identity() -> Self {
        RotationMatrix {
            m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
        }
    }

    pub fn from_raw(m: [[f32; 3]; 3]) -> Self {
        RotationMatrix { m }
    }

    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.m[row][col]
    }

    /// Builds Rx, Ry, Rz from Euler degrees and returns their `Z*Y*X`
    /// composition (spec.md §4.1: "canonical co-dependent behavior").
    pub fn from_euler_degrees(x: f32, y: f32, z: f32) -> Self {
        let x = normalize_degrees(x).to_radians();
        let y = normalize_degrees(y).to_radians();
        let z = normalize_degrees(z).to_radians();
        rot_z(z).mul(&rot_y(y)).mul(&rot_x(x))
    }

    /// Standard two-case Euler extraction for an `R = Rz*Ry*Rx` matrix,
    /// keyed on `sqrt(m00^2 + m10^2) < 1e-6` (gimbal lock at `y = +-90deg`).
    /// Returns `(x, y, z)` in degrees, each normalized to `[0, 360)`.
    pub fn to_euler_degrees(&self) -> (f32, f32, f32) {
        let m = &self.m;
        let sy = (m[0][0] * m[0][0] + m[1][0] * m[1][0]).sqrt();

        let (x, y, z) = if sy >= 1e-6 {
            let x = m[2][1].atan2(m[2][2]);
            let y = (-m[2][0]).atan2(sy);
            let z = m[1][0].atan2(m[0][0]);
            (x, y, z)
        } else {
            // Gimbal lock: z is forced to zero, x absorbs the combined rotation.
            let x = (-m[1][2]).atan2(m[1][1]);
            let y = (-m[2][0]).atan2(sy);
            (x, y, 0.0)
        };

        (
            normalize_degrees(x.to_degrees()),
            normalize_degrees(y.to_degrees()),
            normalize_degrees(z.to_degrees()),
        )
    }

    pub fn transpose(&self) -> Self {
        let m = &self.m;
        RotationMatrix {
            m: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    /// Rotation matrices are orthonormal, so the inverse is the transpose.
    pub fn inverse(&self) -> Self {
        self.transpose()
    }

    pub fn determinant(&self) -> f32 {
        let m = &self.m;
        m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0])
    }

    pub fn mul(&self, rhs: &RotationMatrix) -> RotationMatrix {
        let a = &self.m;
        let b = &rhs.m;
        let mut out = [[0.0f32; 3]; 3];
        for row in 0..3 {
            for col in 0..3 {
                out[row][col] = a[row][0] * b[0][col] + a[row][1] * b[1][col] + a[row][2] * b[2][col];
            }
        }
        RotationMatrix { m: out }
    }

    pub fn rotate(&self, v: Vector3) -> Vector3 {
        let m = &self.m;
        Vector3::new(
            m[0][0] * v.x + m[0][1] * v.y + m[0][2] * v.z,
            m[1][0] * v.x + m[1][1] * v.y + m[1][2] * v.z,
            m[2][0] * v.x + m[2][1] * v.y + m[2][2] * v.z,
        )
    }

    /// Rotates `self` around the model's own (local) axes: `M * R(dx,dy,dz)`.
    pub fn apply_absolute(&self, dx: f32, dy: f32, dz: f32) -> Self {
        self.mul(&RotationMatrix::from_euler_degrees(dx, dy, dz))
    }

    /// Rotates `self` in the camera's frame: `(Rroll*Rpitch*Ryaw) * M`.
    /// Pitch is about X, yaw is about Y, roll is about Z, each in degrees.
    pub fn apply_relative(&self, pitch: f32, yaw: f32, roll: f32) -> Self {
        let delta = rot_z(roll.to_radians())
            .mul(&rot_x(pitch.to_radians()))
            .mul(&rot_y(yaw.to_radians()));
        delta.mul(self)
    }

    /// True iff `self` is orthonormal within spec.md §8's tolerances:
    /// `|det - 1| < 1e-3` and `M^T * M ~= I` within `1e-4`.
    pub fn is_valid_rotation(&self) -> bool {
        if (self.determinant() - 1.0).abs() >= 1e-3 {
            return false;
        }
        let mtm = self.transpose().mul(self);
        let identity = RotationMatrix::identity();
        for row in 0..3 {
            for col in 0..3 {
                if (mtm.m[row][col] - identity.m[row][col]).abs() >= 1e-4 {
                    return false;
                }
            }
        }
        true
    }
}

impl Default for RotationMatrix {
    fn default() -> Self {
        Self::identity()
    }
}
