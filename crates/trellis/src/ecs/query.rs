//! # Query — Iterating Over Entities by Component Type
//!
//! Two ways to walk "every entity that has A and B":
//!
//! - [`View`]: a plain `Iterator` of shared references, built by
//!   [`Registry::view`](super::registry::Registry::view). Component sets are
//!   tuples of component types: `(Name,)`, `(Name, Transform)`.
//! - [`QueryParam`]: a closure-driven query with mutable access, run by
//!   [`Registry::each`](super::registry::Registry::each). Parameters are
//!   tuples of references: `(&mut Transform, &Node)`.
//!
//! ## Join Strategy
//!
//! Every store is packed independently, so there is no shared row index to
//! zip. The join works like this:
//!
//! ```text
//! one type:   walk that store's dense arrays directly (dense order),
//!             skipping dead entities
//! many types: for raw in 0..high_water:
//!                 skip dead entities
//!                 test store 1, store 2, ... (stop at the first miss)
//! ```
//!
//! That is O(entities × types) instead of O(smallest store), but it is simple
//! and yields entities in creation order.
//!
//! ## Closure-Based Mutation
//!
//! Rust's `Iterator` can't hand out items that borrow from the iterator
//! itself (a lending iterator). Instead of unsafe pointer casts, `each`
//! temporarily takes the requested stores out of the registry's map, so the
//! borrow checker sees them as independently owned values. A drop guard puts
//! them back when the call ends, even if the closure panics.
//!
//! ## Comparison
//!
//! - **EnTT**: views pick the smallest pool as the pivot and probe the rest.
//! - **hecs / bevy_ecs**: archetype matching; no per-entity probing at all.

use std::any::TypeId;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::ops::Range;

use super::component::Component;
use super::entity::Entity;
use super::storage::{ComponentStore, ErasedStore};

/// Every store in a registry, keyed by component type.
#[doc(hidden)]
pub type StoreMap = HashMap<TypeId, Box<dyn ErasedStore>>;

/// Look up the typed store for `T`, if it has been created.
pub(crate) fn typed_store<T: Component>(stores: &StoreMap) -> Option<&ComponentStore<T>> {
    stores
        .get(&TypeId::of::<T>())
        .and_then(|store| store.as_any().downcast_ref::<ComponentStore<T>>())
}

/// Mutable variant of [`typed_store`].
pub(crate) fn typed_store_mut<T: Component>(
    stores: &mut StoreMap,
) -> Option<&mut ComponentStore<T>> {
    stores
        .get_mut(&TypeId::of::<T>())
        .and_then(|store| store.as_any_mut().downcast_mut::<ComponentStore<T>>())
}

/// Liveness lookup shared by views and `each`. Handles past the end of the
/// table were never created.
pub(crate) fn is_alive(alive: &[bool], entity: Entity) -> bool {
    alive.get(entity.index()).copied().unwrap_or(false)
}

/// Where a query draws its candidate entities from.
#[doc(hidden)]
pub enum Pivot<'r> {
    /// A single store's dense entity list.
    Dense(&'r [Entity]),
    /// Every live entity, in creation order.
    Live,
    /// A required store doesn't exist, so nothing can match.
    Empty,
}

// ── Read-Only Views ──────────────────────────────────────────────────────

/// A tuple of component types that can be tested and fetched together.
///
/// Implemented for tuples of 1 to 8 component types.
pub trait ComponentSet {
    /// Shared references to every component in the set.
    type Refs<'r>;

    fn type_ids() -> Vec<TypeId>;

    #[doc(hidden)]
    fn contains(stores: &StoreMap, entity: Entity) -> bool;

    #[doc(hidden)]
    fn fetch(stores: &StoreMap, entity: Entity) -> Option<Self::Refs<'_>>;

    #[doc(hidden)]
    fn pivot(stores: &StoreMap) -> Pivot<'_>;
}

macro_rules! impl_component_set {
    ($First:ident $(, $Rest:ident)*) => {
        impl<$First: Component $(, $Rest: Component)*> ComponentSet for ($First, $($Rest,)*) {
            type Refs<'r> = (&'r $First, $(&'r $Rest,)*);

            fn type_ids() -> Vec<TypeId> {
                vec![TypeId::of::<$First>() $(, TypeId::of::<$Rest>())*]
            }

            fn contains(stores: &StoreMap, entity: Entity) -> bool {
                typed_store::<$First>(stores).is_some_and(|s| s.contains(entity))
                    $(&& typed_store::<$Rest>(stores).is_some_and(|s| s.contains(entity)))*
            }

            fn fetch(stores: &StoreMap, entity: Entity) -> Option<Self::Refs<'_>> {
                Some((
                    typed_store::<$First>(stores)?.try_get(entity)?,
                    $(typed_store::<$Rest>(stores)?.try_get(entity)?,)*
                ))
            }

            fn pivot(stores: &StoreMap) -> Pivot<'_> {
                let Some(first) = typed_store::<$First>(stores) else {
                    return Pivot::Empty;
                };
                $(
                    if typed_store::<$Rest>(stores).is_none() {
                        return Pivot::Empty;
                    }
                )*
                if Self::type_ids().len() == 1 {
                    Pivot::Dense(first.entities())
                } else {
                    Pivot::Live
                }
            }
        }
    };
}

impl_component_set!(A);
impl_component_set!(A, B);
impl_component_set!(A, B, C);
impl_component_set!(A, B, C, D);
impl_component_set!(A, B, C, D, E);
impl_component_set!(A, B, C, D, E, F);
impl_component_set!(A, B, C, D, E, F, G);
impl_component_set!(A, B, C, D, E, F, G, H);

enum Cursor<'r> {
    Dense(std::slice::Iter<'r, Entity>),
    Live(Range<u32>),
    Done,
}

/// Iterator over every entity holding all components of `S`, created by
/// [`Registry::view`](super::registry::Registry::view).
///
/// The view borrows the registry, so no structural change can happen while
/// it is alive.
pub struct View<'r, S: ComponentSet> {
    stores: &'r StoreMap,
    alive: &'r [bool],
    cursor: Cursor<'r>,
    _marker: PhantomData<S>,
}

impl<'r, S: ComponentSet> View<'r, S> {
    pub(crate) fn new(stores: &'r StoreMap, alive: &'r [bool]) -> Self {
        let cursor = match S::pivot(stores) {
            Pivot::Dense(entities) => Cursor::Dense(entities.iter()),
            Pivot::Live => Cursor::Live(0..alive.len() as u32),
            Pivot::Empty => Cursor::Done,
        };
        Self {
            stores,
            alive,
            cursor,
            _marker: PhantomData,
        }
    }

    /// `true` if no entity matches.
    pub fn is_empty(self) -> bool {
        self.count() == 0
    }
}

impl<'r, S: ComponentSet> Iterator for View<'r, S> {
    type Item = (Entity, S::Refs<'r>);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let entity = match &mut self.cursor {
                Cursor::Dense(entities) => {
                    let entity = *entities.next()?;
                    if !is_alive(self.alive, entity) {
                        continue;
                    }
                    entity
                }
                Cursor::Live(range) => {
                    let raw = range.next()?;
                    if !self.alive[raw as usize] {
                        continue;
                    }
                    Entity(raw)
                }
                Cursor::Done => return None,
            };
            if let Some(refs) = S::fetch(self.stores, entity) {
                return Some((entity, refs));
            }
        }
    }
}

// ── Mutable Queries ──────────────────────────────────────────────────────

/// Trait for things `each` can fetch: `&T` (shared read), `&mut T` (exclusive
/// write), and tuples of those.
///
/// The `Store` associated type enables the extract/restore pattern: stores
/// are temporarily taken out of the registry's map so independent stores
/// don't alias.
pub trait QueryParam {
    /// The item yielded per entity.
    type Item<'w>;

    /// Owned store(s) extracted from the registry.
    type Store;

    /// The component TypeIds this parameter needs.
    fn type_ids() -> Vec<TypeId>;

    /// Take the needed store(s) out of the map. `None` if any is missing; in
    /// that case the map is left untouched.
    #[doc(hidden)]
    fn extract(stores: &mut StoreMap) -> Option<Self::Store>;

    /// Put the store(s) back.
    #[doc(hidden)]
    fn restore(store: Self::Store, stores: &mut StoreMap);

    #[doc(hidden)]
    fn contains(store: &Self::Store, entity: Entity) -> bool;

    /// Fetch the item for `entity`, which must be contained.
    #[doc(hidden)]
    fn fetch(store: &mut Self::Store, entity: Entity) -> Self::Item<'_>;

    /// The entity at `index` in the first store's dense order.
    #[doc(hidden)]
    fn dense_entity(store: &Self::Store, index: usize) -> Option<Entity>;
}

fn extract_typed<T: Component>(stores: &mut StoreMap) -> Option<Box<ComponentStore<T>>> {
    let tid = TypeId::of::<T>();
    let erased = stores.remove(&tid)?;
    match erased.into_any().downcast::<ComponentStore<T>>() {
        Ok(store) => Some(store),
        Err(_) => panic!(
            "Store registered for `{}` holds a different type",
            std::any::type_name::<T>()
        ),
    }
}

fn restore_typed<T: Component>(store: Box<ComponentStore<T>>, stores: &mut StoreMap) {
    stores.insert(TypeId::of::<T>(), store);
}

/// Shared read access to a component.
impl<T: Component> QueryParam for &T {
    type Item<'w> = &'w T;
    type Store = Box<ComponentStore<T>>;

    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>()]
    }

    fn extract(stores: &mut StoreMap) -> Option<Self::Store> {
        extract_typed::<T>(stores)
    }

    fn restore(store: Self::Store, stores: &mut StoreMap) {
        restore_typed(store, stores);
    }

    fn contains(store: &Self::Store, entity: Entity) -> bool {
        store.contains(entity)
    }

    fn fetch(store: &mut Self::Store, entity: Entity) -> Self::Item<'_> {
        store.get(entity)
    }

    fn dense_entity(store: &Self::Store, index: usize) -> Option<Entity> {
        store.entities().get(index).copied()
    }
}

/// Exclusive write access to a component.
impl<T: Component> QueryParam for &mut T {
    type Item<'w> = &'w mut T;
    type Store = Box<ComponentStore<T>>;

    fn type_ids() -> Vec<TypeId> {
        vec![TypeId::of::<T>()]
    }

    fn extract(stores: &mut StoreMap) -> Option<Self::Store> {
        extract_typed::<T>(stores)
    }

    fn restore(store: Self::Store, stores: &mut StoreMap) {
        restore_typed(store, stores);
    }

    fn contains(store: &Self::Store, entity: Entity) -> bool {
        store.contains(entity)
    }

    fn fetch(store: &mut Self::Store, entity: Entity) -> Self::Item<'_> {
        store.get_mut(entity)
    }

    fn dense_entity(store: &Self::Store, index: usize) -> Option<Entity> {
        store.entities().get(index).copied()
    }
}

/// Implement `QueryParam` for tuples of params, so
/// `registry.each::<(&A, &mut B)>(|e, (a, b)| { ... })` works.
macro_rules! impl_query_param_tuple {
    ($First:ident $(, $Rest:ident)*) => {
        impl<$First: QueryParam $(, $Rest: QueryParam)*> QueryParam for ($First, $($Rest,)*) {
            type Item<'w> = ($First::Item<'w>, $($Rest::Item<'w>,)*);
            type Store = ($First::Store, $($Rest::Store,)*);

            fn type_ids() -> Vec<TypeId> {
                let mut ids = $First::type_ids();
                $(ids.extend($Rest::type_ids());)*
                ids
            }

            #[allow(non_snake_case)]
            fn extract(stores: &mut StoreMap) -> Option<Self::Store> {
                let $First = $First::extract(stores);
                $(let $Rest = $Rest::extract(stores);)*
                match ($First, $($Rest,)*) {
                    (Some($First), $(Some($Rest),)*) => Some(($First, $($Rest,)*)),
                    ($First, $($Rest,)*) => {
                        // Partial extraction: hand back whatever we took.
                        if let Some(store) = $First {
                            $First::restore(store, stores);
                        }
                        $(
                            if let Some(store) = $Rest {
                                $Rest::restore(store, stores);
                            }
                        )*
                        None
                    }
                }
            }

            #[allow(non_snake_case)]
            fn restore(store: Self::Store, stores: &mut StoreMap) {
                let ($First, $($Rest,)*) = store;
                $First::restore($First, stores);
                $($Rest::restore($Rest, stores);)*
            }

            #[allow(non_snake_case)]
            fn contains(store: &Self::Store, entity: Entity) -> bool {
                let ($First, $($Rest,)*) = store;
                $First::contains($First, entity) $(&& $Rest::contains($Rest, entity))*
            }

            #[allow(non_snake_case)]
            fn fetch(store: &mut Self::Store, entity: Entity) -> Self::Item<'_> {
                let ($First, $($Rest,)*) = store;
                ($First::fetch($First, entity), $($Rest::fetch($Rest, entity),)*)
            }

            fn dense_entity(store: &Self::Store, index: usize) -> Option<Entity> {
                $First::dense_entity(&store.0, index)
            }
        }
    };
}

impl_query_param_tuple!(A);
impl_query_param_tuple!(A, B);
impl_query_param_tuple!(A, B, C);
impl_query_param_tuple!(A, B, C, D);
impl_query_param_tuple!(A, B, C, D, E);
impl_query_param_tuple!(A, B, C, D, E, F);
impl_query_param_tuple!(A, B, C, D, E, F, G);
impl_query_param_tuple!(A, B, C, D, E, F, G, H);

/// Stores taken out of a registry for the duration of one `each` call.
///
/// Dropping the guard puts them back, including while unwinding from a
/// panicking callback.
pub(crate) struct ExtractedStores<'m, Q: QueryParam> {
    stores: Option<Q::Store>,
    map: &'m mut StoreMap,
}

impl<'m, Q: QueryParam> ExtractedStores<'m, Q> {
    /// `None` if any store `Q` needs is missing; the map is left untouched.
    pub(crate) fn take(map: &'m mut StoreMap) -> Option<Self> {
        let stores = Q::extract(map)?;
        Some(Self {
            stores: Some(stores),
            map,
        })
    }

    pub(crate) fn stores_mut(&mut self) -> Option<&mut Q::Store> {
        self.stores.as_mut()
    }
}

impl<Q: QueryParam> Drop for ExtractedStores<'_, Q> {
    fn drop(&mut self) {
        if let Some(stores) = self.stores.take() {
            Q::restore(stores, &mut *self.map);
        }
    }
}

/// `true` if `ids` names the same component type more than once.
pub(crate) fn has_duplicates(ids: &[TypeId]) -> bool {
    ids.iter()
        .enumerate()
        .any(|(i, id)| ids[i + 1..].contains(id))
}
