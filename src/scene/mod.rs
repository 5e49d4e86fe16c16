//! Scene registry - the placed instances making up the current level
//!
//! The registry is the single mutable piece of world state: the solver reads
//! it for snap candidates, commits append to it, and the level codec
//! snapshots or hydrates it. It also exposes the world-space anchor lookup
//! used instead of collider raycasts: anchors are few enough that a flat
//! scan per pick is fine on the interactive path.

use serde::{Serialize, Deserialize};
use crate::catalog::Catalog;
use crate::math::{Quat, Vec3};

/// One placed piece in the scene
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlacedInstance {
    /// Catalog id of the piece's type
    pub type_id: u32,
    /// World position
    pub position: Vec3,
    /// World orientation.
    ///
    /// Engine commits only ever compose quarter turns around the vertical
    /// axis; instances hydrated from files may carry anything.
    pub rotation: Quat,
}

impl PlacedInstance {
    pub fn new(type_id: u32, position: Vec3, rotation: Quat) -> Self {
        Self { type_id, position, rotation }
    }
}

/// Stable handle to a placed instance.
///
/// Handles stay valid across removals of other instances, so an external
/// undo stack can reverse a commit by handle at any later point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceHandle(usize);

/// A connector anchor resolved into world space
#[derive(Debug, Clone, Copy)]
pub struct WorldAnchor {
    /// Connector point in world space
    pub position: Vec3,
    /// Outward connector direction in world space
    pub direction: Vec3,
}

/// The mutable collection of all placed instances
///
/// Removed slots are tombstoned rather than compacted so handles never
/// shift. Order of insertion is preserved for iteration and snapshots.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    slots: Vec<Option<PlacedInstance>>,
}

impl SceneRegistry {
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Append an instance and return its handle.
    ///
    /// A single atomic insertion: the reversal is `remove` on the handle.
    pub fn place(&mut self, instance: PlacedInstance) -> InstanceHandle {
        self.slots.push(Some(instance));
        InstanceHandle(self.slots.len() - 1)
    }

    /// Look up an instance by handle
    pub fn get(&self, handle: InstanceHandle) -> Option<&PlacedInstance> {
        self.slots.get(handle.0).and_then(|s| s.as_ref())
    }

    /// Remove an instance, returning it if the handle was live
    pub fn remove(&mut self, handle: InstanceHandle) -> Option<PlacedInstance> {
        self.slots.get_mut(handle.0).and_then(|s| s.take())
    }

    /// Drop all instances (the "new level" flow)
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of live instances
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Iterate live instances in placement order
    pub fn instances(&self) -> impl Iterator<Item = &PlacedInstance> {
        self.slots.iter().filter_map(|s| s.as_ref())
    }

    /// Every anchor of every placed instance, resolved into world space.
    ///
    /// Instances whose type is missing from the catalog contribute nothing;
    /// they still render and persist, they just cannot be snapped to.
    pub fn world_anchors<'a>(
        &'a self,
        catalog: &'a Catalog,
    ) -> impl Iterator<Item = WorldAnchor> + 'a {
        self.instances().flat_map(move |inst| {
            catalog
                .get(inst.type_id)
                .map(|ty| ty.anchors.as_slice())
                .unwrap_or(&[])
                .iter()
                .map(move |anchor| WorldAnchor {
                    position: inst.position + inst.rotation.rotate(anchor.offset),
                    direction: inst.rotation.rotate(anchor.direction),
                })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CompassDoors, PlaceableType, DOOR_STANDOFF};
    use std::f32::consts::PI;

    fn north_room_catalog() -> Catalog {
        let mut catalog = Catalog::new();
        let doors = CompassDoors { north: true, ..Default::default() };
        catalog.insert(PlaceableType::room(1, "cell", doors)).unwrap();
        catalog
    }

    #[test]
    fn test_place_and_get() {
        let mut registry = SceneRegistry::new();
        let h = registry.place(PlacedInstance::new(1, Vec3::ZERO, Quat::IDENTITY));
        assert_eq!(registry.get(h).unwrap().type_id, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_keeps_other_handles_valid() {
        let mut registry = SceneRegistry::new();
        let a = registry.place(PlacedInstance::new(1, Vec3::ZERO, Quat::IDENTITY));
        let b = registry.place(PlacedInstance::new(2, Vec3::UP, Quat::IDENTITY));

        assert!(registry.remove(a).is_some());
        assert!(registry.get(a).is_none());
        assert_eq!(registry.get(b).unwrap().type_id, 2);
        assert_eq!(registry.len(), 1);

        // Removing twice is a no-op
        assert!(registry.remove(a).is_none());
    }

    #[test]
    fn test_world_anchors_identity() {
        let catalog = north_room_catalog();
        let mut registry = SceneRegistry::new();
        registry.place(PlacedInstance::new(1, Vec3::new(5.0, 0.0, 0.0), Quat::IDENTITY));

        let anchors: Vec<_> = registry.world_anchors(&catalog).collect();
        assert_eq!(anchors.len(), 1);
        assert!((anchors[0].position.x - 5.0).abs() < 1e-5);
        assert!((anchors[0].position.z - DOOR_STANDOFF).abs() < 1e-5);
        assert!((anchors[0].direction.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_world_anchors_rotated() {
        let catalog = north_room_catalog();
        let mut registry = SceneRegistry::new();
        // Half turn: the north door now faces -Z
        registry.place(PlacedInstance::new(1, Vec3::ZERO, Quat::from_rotation_y(PI)));

        let anchors: Vec<_> = registry.world_anchors(&catalog).collect();
        assert_eq!(anchors.len(), 1);
        assert!((anchors[0].direction.z + 1.0).abs() < 1e-5);
        assert!((anchors[0].position.z + DOOR_STANDOFF).abs() < 1e-4);
    }

    #[test]
    fn test_world_anchors_unknown_type() {
        let catalog = north_room_catalog();
        let mut registry = SceneRegistry::new();
        registry.place(PlacedInstance::new(99, Vec3::ZERO, Quat::IDENTITY));
        assert_eq!(registry.world_anchors(&catalog).count(), 0);
    }
}
