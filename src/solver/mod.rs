//! Placement solver - preview pose computation
//!
//! Runs once per pointer tick: project the ray onto the ground plane, or
//! override the result with an aligned anchor on a neighboring instance
//! when snapping is on. Pure geometry over the registry; commits happen
//! elsewhere.

use crate::catalog::{Catalog, PlaceableType};
use crate::math::{Quat, Ray, Vec3};
use crate::scene::{SceneRegistry, WorldAnchor};

/// Two anchor directions count as facing each other below this dot product
/// (within roughly 25 degrees of exactly opposed).
pub const ALIGN_DOT: f32 = -0.9;

/// How close the pointer ray must pass to an anchor point to pick it up,
/// in world units. Roughly the extent of a doorway.
pub const ANCHOR_PICK_RADIUS: f32 = 2.5;

/// A world placement: position plus orientation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    pub const ORIGIN: Pose = Pose {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };
}

/// Opposed-direction test for two world-space anchor directions
pub fn aligned(a: Vec3, b: Vec3) -> bool {
    a.dot(b) < ALIGN_DOT
}

/// Find the anchor the pointer ray is over.
///
/// Scans every world anchor for points within the pick radius of the ray
/// and returns the one closest along it, so with two rooms in line the
/// nearer doorway wins.
pub fn pick_anchor(
    ray: &Ray,
    registry: &SceneRegistry,
    catalog: &Catalog,
) -> Option<WorldAnchor> {
    let mut best: Option<(f32, WorldAnchor)> = None;
    for anchor in registry.world_anchors(catalog) {
        let (dist, t) = ray.distance_to_point(anchor.position);
        if dist > ANCHOR_PICK_RADIUS {
            continue;
        }
        if best.map(|(best_t, _)| t < best_t).unwrap_or(true) {
            best = Some((t, anchor));
        }
    }
    best.map(|(_, anchor)| anchor)
}

/// Per-session preview state: accumulated rotation, spawn height, snap flag,
/// and the last pose produced (held across degenerate rays).
#[derive(Debug, Clone)]
pub struct PlacementSolver {
    rotation: Quat,
    spawn_height: f32,
    snapping: bool,
    last_pose: Pose,
}

impl Default for PlacementSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl PlacementSolver {
    pub fn new() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            spawn_height: 0.0,
            snapping: true,
            last_pose: Pose::ORIGIN,
        }
    }

    /// Current pending orientation
    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    /// Current vertical offset applied to ground placements
    pub fn spawn_height(&self) -> f32 {
        self.spawn_height
    }

    pub fn snapping(&self) -> bool {
        self.snapping
    }

    pub fn set_snapping(&mut self, on: bool) {
        self.snapping = on;
    }

    pub fn toggle_snapping(&mut self) {
        self.snapping = !self.snapping;
    }

    /// Rotate the pending piece a quarter turn around the vertical axis.
    ///
    /// The only rotation the engine supports; four steps return to start.
    pub fn rotate_step(&mut self) {
        self.rotation = self.rotation * Quat::from_rotation_y(std::f32::consts::FRAC_PI_2);
    }

    /// Nudge the spawn height
    pub fn adjust_height(&mut self, delta: f32) {
        self.spawn_height += delta;
    }

    /// Compute the preview pose for the pending type under the pointer ray.
    ///
    /// Snap search runs first: if the ray is over an anchor whose direction
    /// opposes one of the pending type's anchors (under the current
    /// rotation), the pose lands on that anchor's world point. Alignment is
    /// a precondition, not an auto-rotate: the orientation is always the
    /// accumulated rotation state. Everything else falls through to the
    /// ground-plane projection, and a ray parallel to the ground holds the
    /// previous pose.
    pub fn preview(
        &mut self,
        ray: &Ray,
        pending: &PlaceableType,
        registry: &SceneRegistry,
        catalog: &Catalog,
    ) -> Pose {
        if self.snapping && pending.has_anchors() {
            if let Some(target) = pick_anchor(ray, registry, catalog) {
                if self.aligns_with(pending, target.direction) {
                    let pose = Pose {
                        position: target.position,
                        rotation: self.rotation,
                    };
                    self.last_pose = pose;
                    return pose;
                }
            }
        }

        match ray.ground_intersection() {
            Some(hit) => {
                let pose = Pose {
                    position: hit + Vec3::UP * self.spawn_height,
                    rotation: self.rotation,
                };
                self.last_pose = pose;
                pose
            }
            None => self.last_pose,
        }
    }

    /// Any of the pending type's anchors, rotated by the pending rotation,
    /// opposes the given world direction
    fn aligns_with(&self, pending: &PlaceableType, direction: Vec3) -> bool {
        pending
            .anchors
            .iter()
            .any(|a| aligned(direction, self.rotation.rotate(a.direction)))
    }
}
