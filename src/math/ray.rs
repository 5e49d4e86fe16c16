//! Ray queries for placement picking
//!
//! The pointer ray comes from the host viewport; everything here is pure
//! geometry against the ground plane and against anchor points in the scene.

use super::Vec3;

/// Rays steeper than this vertical component count as hitting the ground;
/// anything flatter is treated as parallel to it.
pub const GROUND_EPS: f32 = 1e-4;

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersect with the horizontal plane at y = 0.
    ///
    /// Similar triangles: solve t so that origin.y + t * direction.y = 0.
    /// Returns None for rays parallel to the plane (direction.y near zero),
    /// which keeps NaN out of the preview path.
    pub fn ground_intersection(&self) -> Option<Vec3> {
        if self.direction.y.abs() < GROUND_EPS {
            return None;
        }
        let t = -self.origin.y / self.direction.y;
        Some(self.at(t))
    }

    /// Distance from this ray to a point, together with the ray parameter of
    /// the closest approach. Points behind the origin measure against the
    /// origin itself (the ray does not extend backwards).
    pub fn distance_to_point(&self, point: Vec3) -> (f32, f32) {
        let t = (point - self.origin).dot(self.direction).max(0.0);
        (self.at(t).distance(point), t)
    }
}
