//! # Registry — The Central Container
//!
//! The [`Registry`] owns every entity and every component. It's the single
//! source of truth the rest of the engine reads and writes each frame.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Registry                                             │
//! │                                                      │
//! │  alive: Vec<bool>     indexed by raw entity value;   │
//! │                       its length is the next handle  │
//! │  live_count: usize    entities not yet destroyed     │
//! │                                                      │
//! │  stores: HashMap<TypeId, Box<dyn ErasedStore>>       │
//! │    one ComponentStore<T> per component type,         │
//! │    created lazily the first time T is added          │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! Entity liveness is a flat table rather than a list, so `is_valid` and
//! `destroy` are O(1) and full-registry iteration still walks entities in
//! creation order.
//!
//! ## Contracts
//!
//! Adding, removing and destroying never fail. Asking for a component that
//! isn't there through [`get`](Registry::get) is a programmer error and
//! panics; [`try_get`](Registry::try_get) is the non-panicking alternative.
//!
//! ## Comparison
//!
//! - **EnTT**: the same sparse-set-per-type registry, with recycled handles.
//! - **hecs / bevy_ecs**: archetype tables; cheaper multi-type iteration,
//!   more expensive add/remove.

use std::any::TypeId;
use std::collections::HashMap;

use serde::Deserialize;

use super::component::{Component, ComponentInfo};
use super::entity::Entity;
use super::query::{
    ComponentSet, ExtractedStores, QueryParam, StoreMap, View, has_duplicates, is_alive,
    typed_store, typed_store_mut,
};
use super::storage::ComponentStore;

/// Up-front sizing for a [`Registry`]. Everything still grows on demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Entities to reserve room for in the liveness table.
    pub entity_capacity: usize,
    /// Components each newly created store reserves room for.
    pub store_capacity: usize,
}

/// Owns all entities and their components.
pub struct Registry {
    stores: StoreMap,
    /// Liveness flag per raw entity value; its length is the high-water mark.
    alive: Vec<bool>,
    live_count: usize,
    config: RegistryConfig,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            stores: HashMap::new(),
            alive: Vec::with_capacity(config.entity_capacity),
            live_count: 0,
            config,
        }
    }

    // ── Entity Management ────────────────────────────────────────────

    /// Allocate a fresh entity. Handles are never reused.
    ///
    /// # Panics
    ///
    /// Panics if every non-null `u32` value has been handed out.
    pub fn create(&mut self) -> Entity {
        let raw = self.alive.len() as u32;
        assert!(raw != u32::MAX, "Entity handle space exhausted");
        self.alive.push(true);
        self.live_count += 1;
        let entity = Entity(raw);
        log::trace!("created {:?}", entity);
        entity
    }

    /// Remove `entity` from every store, then mark it dead.
    ///
    /// Destroying a dead, unknown or null entity does nothing. The hierarchy
    /// is not touched; see [`destroy_subtree`](super::hierarchy::destroy_subtree).
    pub fn destroy(&mut self, entity: Entity) {
        if !self.is_valid(entity) {
            log::trace!("destroy of {:?} ignored: not alive", entity);
            return;
        }
        for store in self.stores.values_mut() {
            if store.contains(entity) {
                store.remove(entity);
            }
        }
        self.alive[entity.index()] = false;
        self.live_count -= 1;
        log::trace!("destroyed {:?}", entity);
    }

    /// `true` if `entity` was created and not yet destroyed.
    pub fn is_valid(&self, entity: Entity) -> bool {
        is_alive(&self.alive, entity)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.live_count
    }

    /// `true` if there are no live entities.
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Number of handles ever handed out (dead ones included).
    pub fn high_water_mark(&self) -> u32 {
        self.alive.len() as u32
    }

    /// Iterate live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive
            .iter()
            .enumerate()
            .filter(|(_, alive)| **alive)
            .map(|(raw, _)| Entity(raw as u32))
    }

    /// Empty every store and forget every entity. The handle counter keeps
    /// counting, so handles from before the clear are never handed out again.
    pub fn clear(&mut self) {
        for store in self.stores.values_mut() {
            store.clear();
        }
        self.alive.fill(false);
        self.live_count = 0;
    }

    // ── Stores ───────────────────────────────────────────────────────

    /// Make sure a store for `T` exists.
    pub fn register<T: Component>(&mut self) {
        self.store_or_insert::<T>();
    }

    /// The store for `T`, if any component of that type was ever added.
    pub fn store<T: Component>(&self) -> Option<&ComponentStore<T>> {
        typed_store::<T>(&self.stores)
    }

    pub fn store_mut<T: Component>(&mut self) -> Option<&mut ComponentStore<T>> {
        typed_store_mut::<T>(&mut self.stores)
    }

    fn store_or_insert<T: Component>(&mut self) -> &mut ComponentStore<T> {
        let capacity = self.config.store_capacity;
        self.stores
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(ComponentStore::<T>::with_capacity(capacity)))
            .as_any_mut()
            .downcast_mut::<ComponentStore<T>>()
            .unwrap_or_else(|| {
                panic!(
                    "Store registered for `{}` holds a different type",
                    std::any::type_name::<T>()
                )
            })
    }

    // ── Component Add/Remove ─────────────────────────────────────────

    /// Attach `component` to `entity`, replacing any existing `T`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is [`Entity::NULL`].
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> &mut T {
        debug_assert!(
            self.is_valid(entity),
            "Adding `{}` to dead entity {:?}",
            std::any::type_name::<T>(),
            entity
        );
        self.store_or_insert::<T>().insert(entity, component)
    }

    /// Attach a default-constructed `T` to `entity`.
    pub fn add_default<T: Component + Default>(&mut self, entity: Entity) -> &mut T {
        self.add(entity, T::default())
    }

    /// Detach and return `entity`'s `T`. No-op if it has none.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.store_mut::<T>()?.remove(entity)
    }

    /// Copy `from`'s `T` onto `to`. No-op if `from` has no `T`.
    pub fn copy<T: Component + Clone>(&mut self, from: Entity, to: Entity) {
        if let Some(store) = self.store_mut::<T>() {
            store.copy(from, to);
        }
    }

    // ── Per-Entity Component Access ──────────────────────────────────

    /// Get `entity`'s `T`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    #[track_caller]
    pub fn get<T: Component>(&self, entity: Entity) -> &T {
        match self.try_get::<T>(entity) {
            Some(component) => component,
            None => missing_component::<T>(entity),
        }
    }

    /// Get `entity`'s `T` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no `T`.
    #[track_caller]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> &mut T {
        match self.try_get_mut::<T>(entity) {
            Some(component) => component,
            None => missing_component::<T>(entity),
        }
    }

    /// `entity`'s `T`, or `None` if it has none.
    pub fn try_get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store::<T>()?.try_get(entity)
    }

    pub fn try_get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store_mut::<T>()?.try_get_mut(entity)
    }

    /// Get several of `entity`'s components at once.
    ///
    /// ```ignore
    /// let (material, name) = registry.get_all::<(Material, Name)>(entity);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if the entity is missing any component in `S`.
    #[track_caller]
    pub fn get_all<S: ComponentSet>(&self, entity: Entity) -> S::Refs<'_> {
        match self.try_get_all::<S>(entity) {
            Some(refs) => refs,
            None => missing_component::<S>(entity),
        }
    }

    /// Every component in `S` for `entity`, or `None` if any is missing.
    pub fn try_get_all<S: ComponentSet>(&self, entity: Entity) -> Option<S::Refs<'_>> {
        S::fetch(&self.stores, entity)
    }

    /// `true` if `entity` has a `T`.
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.store::<T>().is_some_and(|store| store.contains(entity))
    }

    /// `true` if `entity` has every component in the tuple `S`.
    ///
    /// ```ignore
    /// registry.has_all::<(Transform, Mesh)>(entity)
    /// ```
    pub fn has_all<S: ComponentSet>(&self, entity: Entity) -> bool {
        S::contains(&self.stores, entity)
    }

    /// Number of `T` components, 0 if none was ever added.
    pub fn count<T: Component>(&self) -> usize {
        self.store::<T>().map_or(0, ComponentStore::len)
    }

    /// `true` if at least one entity has a `T`.
    pub fn any<T: Component>(&self) -> bool {
        self.count::<T>() > 0
    }

    /// Call `f` once for every component type `entity` currently has.
    ///
    /// The order is unspecified. Used by serializers and cloning tools that
    /// don't know every component type at compile time.
    pub fn visit(&self, entity: Entity, mut f: impl FnMut(ComponentInfo)) {
        for (&type_id, store) in &self.stores {
            if store.contains(entity) {
                f(ComponentInfo::from_erased(type_id, store.type_name()));
            }
        }
    }

    // ── Query ────────────────────────────────────────────────────────

    /// Iterate every entity that has all components in `S`, with shared
    /// references to them.
    ///
    /// A single-type set walks that store's dense arrays. A multi-type set
    /// walks live entities in creation order and skips those missing any
    /// component.
    ///
    /// # Example
    ///
    /// ```ignore
    /// for (entity, (name, transform)) in registry.view::<(Name, Transform)>() {
    ///     println!("{entity}: {} at {}", name.0, transform.position);
    /// }
    /// ```
    pub fn view<S: ComponentSet>(&self) -> View<'_, S> {
        View::new(&self.stores, &self.alive)
    }

    /// Run `f` for every entity matching the query `Q`, with mutable access
    /// where requested.
    ///
    /// Iteration order follows [`view`](Self::view).
    ///
    /// # Example
    ///
    /// ```ignore
    /// registry.each::<(&mut Transform, &Velocity)>(|entity, (transform, velocity)| {
    ///     transform.position += velocity.0;
    /// });
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `Q` names the same component type twice.
    pub fn each<Q: QueryParam>(&mut self, mut f: impl FnMut(Entity, Q::Item<'_>)) {
        let type_ids = Q::type_ids();
        assert!(
            !has_duplicates(&type_ids),
            "Query `{}` accesses the same component type more than once",
            std::any::type_name::<Q>()
        );

        let Some(mut guard) = ExtractedStores::<Q>::take(&mut self.stores) else {
            return;
        };
        let Some(stores) = guard.stores_mut() else {
            return;
        };

        if type_ids.len() == 1 {
            let mut index = 0;
            while let Some(entity) = Q::dense_entity(stores, index) {
                index += 1;
                if is_alive(&self.alive, entity) {
                    f(entity, Q::fetch(stores, entity));
                }
            }
        } else {
            for (raw, &alive) in self.alive.iter().enumerate() {
                let entity = Entity(raw as u32);
                if alive && Q::contains(stores, entity) {
                    f(entity, Q::fetch(stores, entity));
                }
            }
        }
    }

    // ── Diagnostics ──────────────────────────────────────────────────

    /// Collect a serializable summary of the registry.
    #[cfg(feature = "diagnostics")]
    pub fn diagnostics_snapshot(&self) -> crate::diag::RegistrySnapshot {
        let stores = self
            .stores
            .values()
            .map(|store| (store.type_name(), store.len()))
            .collect();
        crate::diag::RegistrySnapshot::new(self.live_count, self.high_water_mark(), stores)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

#[cold]
#[track_caller]
fn missing_component<T>(entity: Entity) -> ! {
    panic!(
        "Entity {:?} has no `{}` component",
        entity,
        std::any::type_name::<T>()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Position {
        x: f32,
        y: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Label(&'static str);

    struct Marker;

    #[test]
    fn create_hands_out_increasing_handles() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        assert_eq!(a.raw(), 0);
        assert_eq!(b.raw(), 1);
        assert!(registry.is_valid(a));
        assert_eq!(registry.entity_count(), 2);
    }

    #[test]
    fn handles_are_never_reused() {
        let mut registry = Registry::new();
        let a = registry.create();
        registry.destroy(a);
        let b = registry.create();
        assert_ne!(a, b);
        assert!(!registry.is_valid(a));
        assert!(registry.is_valid(b));
    }

    #[test]
    fn add_get_remove() {
        let mut registry = Registry::new();
        let e = registry.create();

        registry.add(e, Position { x: 1.0, y: 2.0 });
        assert!(registry.has::<Position>(e));
        assert_eq!(registry.get::<Position>(e).x, 1.0);

        registry.get_mut::<Position>(e).y = 5.0;
        assert_eq!(registry.get::<Position>(e).y, 5.0);

        assert_eq!(registry.remove::<Position>(e), Some(Position { x: 1.0, y: 5.0 }));
        assert!(!registry.has::<Position>(e));
        assert_eq!(registry.remove::<Position>(e), None);
    }

    #[test]
    fn add_overwrites_existing() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Label("first"));
        registry.add(e, Label("second"));
        assert_eq!(registry.count::<Label>(), 1);
        assert_eq!(registry.get::<Label>(e).0, "second");
    }

    #[test]
    fn add_default_constructs() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add_default::<Position>(e).x = 3.0;
        assert_eq!(*registry.get::<Position>(e), Position { x: 3.0, y: 0.0 });
    }

    #[test]
    fn missing_store_means_absent() {
        let mut registry = Registry::new();
        let e = registry.create();
        assert!(!registry.has::<Velocity>(e));
        assert!(!registry.has_all::<(Velocity, Position)>(e));
        assert!(registry.try_get::<Velocity>(e).is_none());
        assert!(registry.try_get_mut::<Velocity>(e).is_none());
        assert_eq!(registry.count::<Velocity>(), 0);
        assert!(!registry.any::<Velocity>());
        assert_eq!(registry.remove::<Velocity>(e), None);
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn get_missing_panics() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Marker);
        registry.get::<Position>(e);
    }

    #[test]
    fn null_entity_is_never_present() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Marker);
        assert!(!registry.has::<Marker>(Entity::NULL));
        assert!(!registry.is_valid(Entity::NULL));
    }

    #[test]
    fn has_all_requires_every_type() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position::default());
        assert!(registry.has_all::<(Position,)>(e));
        assert!(!registry.has_all::<(Position, Velocity)>(e));
        registry.add(e, Velocity { dx: 0.0, dy: 0.0 });
        assert!(registry.has_all::<(Position, Velocity)>(e));
    }

    #[test]
    fn destroy_removes_every_component() {
        let mut registry = Registry::new();
        let e = registry.create();
        let other = registry.create();
        registry.add(e, Position::default());
        registry.add(e, Label("gone"));
        registry.add(other, Label("kept"));

        registry.destroy(e);

        assert!(!registry.is_valid(e));
        assert!(!registry.has::<Position>(e));
        assert!(!registry.has::<Label>(e));
        assert_eq!(registry.count::<Label>(), 1);
        assert_eq!(registry.get::<Label>(other).0, "kept");
    }

    #[test]
    fn destroy_twice_is_noop() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.destroy(e);
        registry.destroy(e);
        registry.destroy(Entity::from_raw(999));
        registry.destroy(Entity::NULL);
        assert_eq!(registry.entity_count(), 0);
    }

    #[test]
    fn view_single_type() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        let _c = registry.create();
        registry.add(a, Label("a"));
        registry.add(b, Label("b"));

        let seen: HashSet<_> = registry
            .view::<(Label,)>()
            .map(|(e, (label,))| (e, label.0))
            .collect();
        assert_eq!(seen, HashSet::from([(a, "a"), (b, "b")]));
    }

    #[test]
    fn view_multi_type_in_creation_order() {
        let mut registry = Registry::new();
        let mut expected = Vec::new();
        for i in 0..10 {
            let e = registry.create();
            registry.add(e, Position { x: i as f32, y: 0.0 });
            if i % 3 == 0 {
                registry.add(e, Velocity { dx: 1.0, dy: 0.0 });
                expected.push(e);
            }
        }
        // Shuffle the dense order of one store.
        registry.remove::<Position>(Entity::from_raw(1));

        let seen: Vec<_> = registry
            .view::<(Position, Velocity)>()
            .map(|(e, _)| e)
            .collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn view_matches_has_all() {
        let mut registry = Registry::new();
        for i in 0..20u32 {
            let e = registry.create();
            if i % 2 == 0 {
                registry.add(e, Position::default());
            }
            if i % 3 == 0 {
                registry.add(e, Label("x"));
            }
            if i % 5 == 0 {
                registry.add(e, Marker);
            }
        }
        registry.destroy(Entity::from_raw(6));

        let from_view: HashSet<_> = registry
            .view::<(Position, Label, Marker)>()
            .map(|(e, _)| e)
            .collect();
        let from_has: HashSet<_> = registry
            .entities()
            .filter(|&e| registry.has_all::<(Position, Label, Marker)>(e))
            .collect();
        assert_eq!(from_view, from_has);
        assert_eq!(from_view, HashSet::from([Entity::from_raw(0)]));
    }

    #[test]
    fn view_over_missing_store_is_empty() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position::default());
        assert!(registry.view::<(Velocity,)>().is_empty());
        assert!(registry.view::<(Position, Velocity)>().is_empty());
    }

    #[test]
    fn each_mutates_in_place() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position { x: 0.0, y: 0.0 });
        registry.add(e, Velocity { dx: 1.0, dy: 2.0 });
        let still = registry.create();
        registry.add(still, Position { x: 9.0, y: 9.0 });

        registry.each::<(&mut Position, &Velocity)>(|_, (pos, vel)| {
            pos.x += vel.dx;
            pos.y += vel.dy;
        });

        assert_eq!(*registry.get::<Position>(e), Position { x: 1.0, y: 2.0 });
        assert_eq!(*registry.get::<Position>(still), Position { x: 9.0, y: 9.0 });
        // Stores went back into the registry.
        assert_eq!(registry.count::<Velocity>(), 1);
    }

    #[test]
    fn each_single_type_visits_all() {
        let mut registry = Registry::new();
        for i in 0..5 {
            let e = registry.create();
            registry.add(e, Position { x: i as f32, y: 0.0 });
        }
        let mut visited = 0;
        registry.each::<(&mut Position,)>(|_, (pos,)| {
            pos.y = 1.0;
            visited += 1;
        });
        assert_eq!(visited, 5);
        assert!(registry.view::<(Position,)>().all(|(_, (p,))| p.y == 1.0));
    }

    #[test]
    fn each_with_missing_store_leaves_others_in_place() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position::default());

        let mut calls = 0;
        registry.each::<(&mut Position, &Velocity)>(|_, _| calls += 1);

        assert_eq!(calls, 0);
        assert!(registry.has::<Position>(e));
    }

    #[test]
    #[should_panic(expected = "more than once")]
    fn each_rejects_aliasing() {
        let mut registry = Registry::new();
        registry.each::<(&Position, &mut Position)>(|_, _| {});
    }

    #[test]
    fn each_multi_type_in_creation_order() {
        let mut registry = Registry::new();
        let entities: Vec<Entity> = (0..6).map(|_| registry.create()).collect();
        for &e in &entities {
            registry.add(e, Position::default());
        }
        // Velocity's dense order is the reverse of creation order.
        for &e in entities.iter().rev() {
            registry.add(e, Velocity { dx: 0.0, dy: 0.0 });
        }
        registry.remove::<Velocity>(entities[2]);

        let mut seen = Vec::new();
        registry.each::<(&Velocity, &mut Position)>(|e, _| seen.push(e));

        let expected: Vec<Entity> = entities.iter().copied().filter(|&e| e != entities[2]).collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn each_puts_stores_back_when_callback_panics() {
        use std::panic::{AssertUnwindSafe, catch_unwind};

        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, 5u32);
        registry.add(e, Label("still here"));

        let result = catch_unwind(AssertUnwindSafe(|| {
            registry.each::<(&mut u32, &Label)>(|_, _| panic!("callback failed"));
        }));

        assert!(result.is_err());
        assert!(registry.has::<u32>(e));
        assert_eq!(registry.count::<u32>(), 1);
        assert_eq!(registry.get::<Label>(e).0, "still here");
    }

    #[test]
    fn get_all_fetches_every_component() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position { x: 1.0, y: 2.0 });
        registry.add(e, Label("both"));

        let (position, label) = registry.get_all::<(Position, Label)>(e);
        assert_eq!(*position, Position { x: 1.0, y: 2.0 });
        assert_eq!(label.0, "both");

        assert!(registry.try_get_all::<(Position, Label)>(e).is_some());
        assert!(registry.try_get_all::<(Position, Velocity)>(e).is_none());
        assert!(registry.try_get_all::<(Position,)>(Entity::NULL).is_none());
    }

    #[test]
    #[should_panic(expected = "has no")]
    fn get_all_missing_panics() {
        let mut registry = Registry::new();
        let e = registry.create();
        registry.add(e, Position::default());
        registry.get_all::<(Position, Velocity)>(e);
    }

    #[test]
    fn single_type_queries_skip_dead_entities() {
        let mut registry = Registry::new();
        let live = registry.create();
        let dead = registry.create();
        registry.destroy(dead);
        registry.add(live, Label("live"));
        // A component left behind on a dead handle, bypassing `add`.
        if let Some(store) = registry.store_mut::<Label>() {
            store.insert(dead, Label("stale"));
        }

        let viewed: Vec<Entity> = registry.view::<(Label,)>().map(|(e, _)| e).collect();
        assert_eq!(viewed, vec![live]);

        let mut visited = Vec::new();
        registry.each::<(&Label,)>(|e, _| visited.push(e));
        assert_eq!(visited, vec![live]);
    }

    #[test]
    fn visit_reports_present_types() {
        let mut registry = Registry::new();
        let e = registry.create();
        let other = registry.create();
        registry.add(e, Position::default());
        registry.add(e, Label("v"));
        registry.add(other, Marker);

        let mut names = Vec::new();
        registry.visit(e, |info| names.push(info.short_name()));
        names.sort();
        assert_eq!(names, vec!["Label", "Position"]);

        let mut seen_marker = false;
        registry.visit(other, |info| seen_marker |= info.is::<Marker>());
        assert!(seen_marker);
    }

    #[test]
    fn copy_component_between_entities() {
        let mut registry = Registry::new();
        let src = registry.create();
        let dst = registry.create();
        registry.add(src, Label("template"));
        registry.copy::<Label>(src, dst);
        assert_eq!(registry.get::<Label>(dst).0, "template");
    }

    #[test]
    fn entities_skips_destroyed() {
        let mut registry = Registry::new();
        let a = registry.create();
        let b = registry.create();
        let c = registry.create();
        registry.destroy(b);
        assert_eq!(registry.entities().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn clear_forgets_everything() {
        let mut registry = Registry::new();
        let a = registry.create();
        registry.add(a, Marker);
        registry.clear();

        assert!(registry.is_empty());
        assert!(!registry.is_valid(a));
        assert_eq!(registry.count::<Marker>(), 0);
        let b = registry.create();
        assert_ne!(a, b);
    }

    #[test]
    fn config_reserves_capacity() {
        let config: RegistryConfig =
            serde_json::from_str(r#"{ "entity_capacity": 64 }"#).unwrap();
        assert_eq!(config.entity_capacity, 64);
        assert_eq!(config.store_capacity, 0);

        let mut registry = Registry::with_config(config);
        let e = registry.create();
        registry.add(e, Marker);
        assert!(registry.has::<Marker>(e));
    }

    #[test]
    fn register_creates_empty_store() {
        let mut registry = Registry::new();
        registry.register::<Position>();
        assert!(registry.store::<Position>().is_some());
        assert!(!registry.any::<Position>());
    }
}
