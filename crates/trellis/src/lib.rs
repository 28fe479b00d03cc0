//! # Trellis — Entity Storage and Scene Graph
//!
//! A sparse-set entity-component registry with a sibling-linked scene
//! hierarchy on top: the database a game engine queries and mutates every
//! frame.
//!
//! Start with `use trellis::prelude::*`, create a [`Registry`](ecs::Registry)
//! and spawn entities with [`create_spatial_entity`](scene::create_spatial_entity).

pub mod ecs;
pub mod scene;

#[cfg(feature = "diagnostics")]
pub mod diag;

pub mod prelude {
    pub use crate::ecs::hierarchy::{
        self, append, children, collapse_transforms, destroy_subtree, detach, flatten_subtree,
        optimize, reparent,
    };
    pub use crate::ecs::{
        Component, ComponentInfo, ComponentStore, Entity, HierarchyError, Node, Registry,
        RegistryConfig, View,
    };
    pub use crate::scene::{
        Mat4, Mesh, Name, Quat, Transform, Vec3, create_spatial_entity, destroy_spatial_entity,
        propagate_transforms,
    };
}
