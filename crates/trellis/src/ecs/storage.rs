//! # Storage — One Sparse Set per Component Type
//!
//! [`ComponentStore<T>`] maps [`Entity`] → `T` with O(1) insert, remove and
//! membership test, while keeping the values tightly packed for iteration.
//!
//! ## Memory Layout
//!
//! ```text
//! sparse:   [ 1, -, 0, -, 2 ]        ← indexed by raw entity value
//!              │     │     │
//! entities: [ E2,  E0,  E4 ]          ← dense, parallel to `dense`
//! dense:    [ T2,  T0,  T4 ]          ← the components themselves
//! ```
//!
//! `-` is the `ABSENT` sentinel. The invariant tying it together is
//! `sparse[entities[i]] == i` for every dense slot `i`.
//!
//! ## Swap-Remove
//!
//! Removing `E0` moves the last element (`E4`, `T4`) into its slot, patches
//! `sparse[4]`, and pops. Nothing shifts, so removal is O(1), but iteration
//! order is not stable across removals.
//!
//! ## Type Erasure
//!
//! The [`Registry`](super::registry::Registry) holds stores of many types in
//! one map, so each store also implements [`ErasedStore`], the non-generic
//! capability set {clear, len, remove, contains}. Downcasting back to
//! `ComponentStore<T>` happens only inside the registry.
//!
//! ## Comparison
//!
//! - **EnTT**: the same sparse set, paged sparse arrays, plus grouping.
//! - **hecs / bevy_ecs tables**: archetype columns instead; faster multi-type
//!   iteration, slower add/remove.

use std::any::Any;

use super::component::Component;
use super::entity::Entity;

/// Sparse slot value meaning "this entity has no component here".
const ABSENT: u32 = u32::MAX;

/// Packed storage for every `T` attached to an entity.
pub struct ComponentStore<T> {
    dense: Vec<T>,
    entities: Vec<Entity>,
    sparse: Vec<u32>,
}

impl<T: Component> ComponentStore<T> {
    pub fn new() -> Self {
        Self {
            dense: Vec::new(),
            entities: Vec::new(),
            sparse: Vec::new(),
        }
    }

    /// Create a store with room for `capacity` components before the dense
    /// arrays reallocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            entities: Vec::with_capacity(capacity),
            sparse: Vec::new(),
        }
    }

    /// Attach `value` to `entity`, or overwrite the existing value in place.
    ///
    /// Never creates a duplicate entry: a second insert for the same entity
    /// leaves [`len`](Self::len) unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is [`Entity::NULL`].
    pub fn insert(&mut self, entity: Entity, value: T) -> &mut T {
        assert!(
            !entity.is_null(),
            "Cannot insert component `{}` on the null entity",
            std::any::type_name::<T>()
        );

        if let Some(index) = self.packed_index(entity) {
            let slot = &mut self.dense[index];
            *slot = value;
            return slot;
        }

        let raw = entity.index();
        if raw >= self.sparse.len() {
            // Grow geometrically so a run of fresh entities stays amortized O(1).
            let new_len = (raw + 1).max(self.sparse.len() * 2);
            self.sparse.resize(new_len, ABSENT);
        }

        let index = self.dense.len();
        self.sparse[raw] = index as u32;
        self.entities.push(entity);
        self.dense.push(value);
        &mut self.dense[index]
    }

    /// `true` if `entity` has a component in this store.
    pub fn contains(&self, entity: Entity) -> bool {
        self.packed_index(entity).is_some()
    }

    /// Position of `entity`'s component in the dense arrays.
    pub fn packed_index(&self, entity: Entity) -> Option<usize> {
        let index = *self.sparse.get(entity.index())? as usize;
        match self.entities.get(index) {
            Some(&owner) if owner == entity => Some(index),
            _ => None,
        }
    }

    /// Get the component for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component in this store.
    pub fn get(&self, entity: Entity) -> &T {
        match self.packed_index(entity) {
            Some(index) => &self.dense[index],
            None => missing::<T>(entity),
        }
    }

    /// Get the component for `entity` mutably.
    ///
    /// # Panics
    ///
    /// Panics if the entity has no component in this store.
    pub fn get_mut(&mut self, entity: Entity) -> &mut T {
        match self.packed_index(entity) {
            Some(index) => &mut self.dense[index],
            None => missing::<T>(entity),
        }
    }

    /// Non-panicking [`get`](Self::get).
    pub fn try_get(&self, entity: Entity) -> Option<&T> {
        self.packed_index(entity).map(|index| &self.dense[index])
    }

    /// Non-panicking [`get_mut`](Self::get_mut).
    pub fn try_get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.packed_index(entity).map(|index| &mut self.dense[index])
    }

    /// Swap-remove `entity`'s component and return it. No-op for entities
    /// that aren't in the store.
    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        let index = self.packed_index(entity)?;
        let last = self.entities.len() - 1;

        if index != last {
            let moved = self.entities[last];
            self.sparse[moved.index()] = index as u32;
        }
        self.sparse[entity.index()] = ABSENT;

        self.entities.swap_remove(index);
        Some(self.dense.swap_remove(index))
    }

    /// Copy `from`'s component onto `to`, overwriting any existing value.
    /// Does nothing if `from` has no component here.
    pub fn copy(&mut self, from: Entity, to: Entity)
    where
        T: Clone,
    {
        if let Some(value) = self.try_get(from).cloned() {
            self.insert(to, value);
        }
    }

    /// Number of stored components.
    pub fn len(&self) -> usize {
        self.dense.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    /// Drop every component. The sparse array keeps its size so re-inserting
    /// the same entities does not reallocate it.
    pub fn clear(&mut self) {
        self.dense.clear();
        self.entities.clear();
        self.sparse.fill(ABSENT);
    }

    /// Dense entity list, parallel to [`components`](Self::components).
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Dense component list, parallel to [`entities`](Self::entities).
    pub fn components(&self) -> &[T] {
        &self.dense
    }

    /// Iterate `(Entity, &T)` in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &T)> {
        self.entities.iter().copied().zip(self.dense.iter())
    }

    /// Iterate `(Entity, &mut T)` in dense order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> {
        self.entities.iter().copied().zip(self.dense.iter_mut())
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(self.dense.len(), self.entities.len());
        for (i, entity) in self.entities.iter().enumerate() {
            assert_eq!(self.sparse[entity.index()] as usize, i);
        }
    }
}

impl<T: Component> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cold]
#[track_caller]
fn missing<T>(entity: Entity) -> ! {
    panic!(
        "Entity {:?} has no `{}` component",
        entity,
        std::any::type_name::<T>()
    )
}

// ── Type Erasure ─────────────────────────────────────────────────────────

/// The non-generic face of a [`ComponentStore`], letting the registry keep
/// stores of different types in one map.
#[doc(hidden)]
pub trait ErasedStore: Send + Sync {
    fn contains(&self, entity: Entity) -> bool;
    /// Remove without handing the value back (it is dropped).
    fn remove(&mut self, entity: Entity);
    fn len(&self) -> usize;
    fn clear(&mut self);
    fn type_name(&self) -> &'static str;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Component> ErasedStore for ComponentStore<T> {
    fn contains(&self, entity: Entity) -> bool {
        ComponentStore::contains(self, entity)
    }

    fn remove(&mut self, entity: Entity) {
        ComponentStore::remove(self, entity);
    }

    fn len(&self) -> usize {
        ComponentStore::len(self)
    }

    fn clear(&mut self) {
        ComponentStore::clear(self);
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}
