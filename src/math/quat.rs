//! Quaternion rotations
//!
//! Placement orientations are quaternions even though the engine only ever
//! produces 90-degree yaw steps. Level files written by hand or by other
//! tools can carry arbitrary rotations and they round-trip unchanged.

use std::ops::Mul;
use serde::{Serialize, Deserialize};
use super::Vec3;

/// Rotation quaternion (x, y, z, w)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Quat {
    pub const IDENTITY: Quat = Quat { x: 0.0, y: 0.0, z: 0.0, w: 1.0 };

    pub fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Rotation of `angle` radians around a unit axis
    pub fn from_axis_angle(axis: Vec3, angle: f32) -> Self {
        let half = angle * 0.5;
        let s = half.sin();
        Self {
            x: axis.x * s,
            y: axis.y * s,
            z: axis.z * s,
            w: half.cos(),
        }
    }

    /// Yaw rotation around the vertical axis
    pub fn from_rotation_y(angle: f32) -> Self {
        Self::from_axis_angle(Vec3::UP, angle)
    }

    /// Rotate a vector by this quaternion
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // v' = v + 2 * cross(q.xyz, cross(q.xyz, v) + w * v)
        let u = Vec3::new(self.x, self.y, self.z);
        let t = u.cross(v) + v * self.w;
        v + u.cross(t) * 2.0
    }

    pub fn dot(self, other: Quat) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    pub fn len(self) -> f32 {
        self.dot(self).sqrt()
    }

    pub fn normalize(self) -> Quat {
        let l = self.len();
        if l == 0.0 {
            return Quat::IDENTITY;
        }
        Quat {
            x: self.x / l,
            y: self.y / l,
            z: self.z / l,
            w: self.w / l,
        }
    }

    /// All components are neither NaN nor infinite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// True when both quaternions represent the same rotation within `eps`.
    ///
    /// q and -q are the same rotation, hence the absolute value.
    pub fn approx_eq(self, other: Quat, eps: f32) -> bool {
        self.dot(other).abs() > 1.0 - eps
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Quat;

    /// Hamilton product: `a * b` applies `b` first, then `a`
    fn mul(self, rhs: Quat) -> Quat {
        Quat {
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y - self.x * rhs.z + self.y * rhs.w + self.z * rhs.x,
            z: self.w * rhs.z + self.x * rhs.y - self.y * rhs.x + self.z * rhs.w,
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
        }
    }
}
