//! # Sparse-Set ECS
//!
//! Entity-component storage in the style of
//! [EnTT](https://github.com/skypjack/entt): one packed sparse set per
//! component type, owned by a type-keyed [`Registry`].
//!
//! ## Module Overview
//!
//! - [`entity`] — Monotonic entity handles with a reserved null
//! - [`component`] — The `Component` marker and runtime type info
//! - [`storage`] — `ComponentStore<T>`, the sparse set
//! - [`registry`] — Central container (entities + stores)
//! - [`query`] — Read-only views and closure-based mutable queries
//! - [`hierarchy`] — Sibling-linked scene graph over the `Node` component

pub mod component;
pub mod entity;
pub mod hierarchy;
pub mod query;
pub mod registry;
pub mod storage;

pub use component::{Component, ComponentInfo};
pub use entity::Entity;
pub use hierarchy::{HierarchyError, Node};
pub use query::{ComponentSet, QueryParam, View};
pub use registry::{Registry, RegistryConfig};
pub use storage::ComponentStore;
