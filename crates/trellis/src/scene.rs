//! Scene components and spatial entity helpers.
//!
//! A *spatial entity* is one that carries a [`Name`], a [`Node`] and a
//! [`Transform`]: the minimum an editor needs to show it in an outliner and
//! place it in the world. [`Mesh`] marks the entities that actually render.
//!
//! glam types are re-exported so users don't need to depend on it directly.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

pub use glam::{Mat4, Quat, Vec3};

use crate::ecs::Entity;
use crate::ecs::hierarchy::{self, Node};
use crate::ecs::registry::Registry;

/// Display name shown by editors and used in logs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Names the mesh asset an entity renders. Its presence is what makes a node
/// renderable, which keeps it alive through [`hierarchy::optimize`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mesh {
    pub asset: String,
}

impl Mesh {
    pub fn new(asset: impl Into<String>) -> Self {
        Self {
            asset: asset.into(),
        }
    }
}

/// Position, rotation and scale, plus the matrices derived from them.
///
/// `local` is relative to the parent node; `world` is written by
/// [`propagate_transforms`]. After editing the decomposed fields call
/// [`compose`](Self::compose); after editing `local` call
/// [`decompose`](Self::decompose).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: Vec3,
    pub rotation: Quat,
    pub position: Vec3,
    pub local: Mat4,
    pub world: Mat4,
}

impl Transform {
    /// Identity transform (origin, no rotation, uniform scale of 1).
    pub const IDENTITY: Self = Self {
        scale: Vec3::ONE,
        rotation: Quat::IDENTITY,
        position: Vec3::ZERO,
        local: Mat4::IDENTITY,
        world: Mat4::IDENTITY,
    };

    pub fn from_position(position: Vec3) -> Self {
        let mut transform = Self {
            position,
            ..Self::IDENTITY
        };
        transform.compose();
        transform
    }

    pub fn from_xyz(x: f32, y: f32, z: f32) -> Self {
        Self::from_position(Vec3::new(x, y, z))
    }

    /// Return a copy with `rotation` applied and `local` rebuilt.
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self.compose();
        self
    }

    /// Return a copy with uniform scale applied and `local` rebuilt.
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self.compose();
        self
    }

    /// Rebuild `local` from scale, rotation and position.
    pub fn compose(&mut self) {
        self.local = Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position);
    }

    /// Re-derive scale, rotation and position from `local`.
    pub fn decompose(&mut self) {
        let (scale, rotation, position) = self.local.to_scale_rotation_translation();
        self.scale = scale;
        self.rotation = rotation;
        self.position = position;
    }

    /// World-space position, valid after [`propagate_transforms`].
    pub fn world_position(&self) -> Vec3 {
        self.world.w_axis.truncate()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

// ── Spatial Entities ─────────────────────────────────────────────────────

/// Create an entity with a [`Name`], a root [`Node`] and an identity
/// [`Transform`].
pub fn create_spatial_entity(registry: &mut Registry, name: impl Into<String>) -> Entity {
    let entity = registry.create();
    registry.add(entity, Name::new(name));
    registry.add(entity, Node::default());
    registry.add(entity, Transform::default());
    entity
}

/// Destroy a spatial entity and its whole subtree.
pub fn destroy_spatial_entity(registry: &mut Registry, entity: Entity) {
    hierarchy::destroy_subtree(registry, entity);
}

// ── Transform Propagation ────────────────────────────────────────────────

/// Recompute every `Transform::world`.
///
/// - Roots and entities without a [`Node`]: `world = local`.
/// - Children: `world = parent.world * local`.
///
/// Traversal is breadth first, so parents are always computed before their
/// children. A child without a `Transform` passes its parent's matrix through.
pub fn propagate_transforms(registry: &mut Registry) {
    let mut queue: VecDeque<(Entity, Mat4)> = VecDeque::new();

    registry.each::<(&mut Transform,)>(|_, (transform,)| {
        transform.world = transform.local;
    });

    for (entity, (node, transform)) in registry.view::<(Node, Transform)>() {
        if node.is_root() {
            queue.extend(hierarchy::children(registry, entity).map(|c| (c, transform.world)));
        }
    }

    while let Some((entity, parent_world)) = queue.pop_front() {
        let world = match registry.try_get_mut::<Transform>(entity) {
            Some(transform) => {
                transform.world = parent_world * transform.local;
                transform.world
            }
            None => parent_world,
        };
        queue.extend(hierarchy::children(registry, entity).map(|c| (c, world)));
    }
}
