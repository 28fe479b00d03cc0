//! # Component — Plain Data Keyed by Type
//!
//! Components are plain data: a `Name`, a `Transform`, a `Node`. Any
//! `'static + Send + Sync` type qualifies; there is nothing to derive.
//!
//! The registry identifies a component type by its [`TypeId`]. That replaces
//! the runtime name-hash table an engine would otherwise populate at startup:
//! the compiler hands out a stable per-type identifier for free, and
//! [`ComponentInfo`] pairs it with the type name for tooling.

use std::any::TypeId;
use std::fmt;

/// Marker trait for anything that can be stored in a
/// [`Registry`](super::registry::Registry).
///
/// Blanket-implemented for every `'static + Send + Sync` type.
pub trait Component: 'static + Send + Sync {}

impl<T: 'static + Send + Sync> Component for T {}

/// Runtime identity of a component type, handed to
/// [`Registry::visit`](super::registry::Registry::visit) callbacks.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ComponentInfo {
    type_id: TypeId,
    type_name: &'static str,
}

impl ComponentInfo {
    /// Identity of the component type `T`.
    pub fn of<T: Component>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub(crate) fn from_erased(type_id: TypeId, type_name: &'static str) -> Self {
        Self { type_id, type_name }
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully-qualified type name, e.g. `trellis::scene::Transform`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without its module path, e.g. `Transform`.
    pub fn short_name(&self) -> &'static str {
        short_type_name(self.type_name)
    }

    /// `true` if this describes the component type `T`.
    pub fn is<T: Component>(&self) -> bool {
        self.type_id == TypeId::of::<T>()
    }
}

impl fmt::Debug for ComponentInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ComponentInfo({})", self.short_name())
    }
}

/// Strip the module path from a fully-qualified type name, keeping only the
/// short name (e.g. `trellis::scene::Transform` → `Transform`).
///
/// Generic arguments keep their own paths; only the outer path is cut.
pub(crate) fn short_type_name(full: &'static str) -> &'static str {
    let outer = full.split('<').next().unwrap_or(full);
    match outer.rfind("::") {
        Some(pos) => &full[pos + 2..],
        None => full,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Health(#[allow(dead_code)] u32);

    #[test]
    fn info_identifies_type() {
        let info = ComponentInfo::of::<Health>();
        assert!(info.is::<Health>());
        assert!(!info.is::<u32>());
        assert_eq!(info.type_id(), TypeId::of::<Health>());
        assert_eq!(info.short_name(), "Health");
    }

    #[test]
    fn short_names() {
        assert_eq!(short_type_name("trellis::scene::Transform"), "Transform");
        assert_eq!(short_type_name("u32"), "u32");
        assert_eq!(
            short_type_name("alloc::vec::Vec<core::option::Option<u8>>"),
            "Vec<core::option::Option<u8>>"
        );
    }
}
