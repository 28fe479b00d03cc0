//! # Entity — Opaque Handles for Game Objects
//!
//! An [`Entity`] is just a number. It doesn't "contain" anything; the
//! [`Registry`](super::registry::Registry) maps entities to their components
//! through one sparse set per component type.
//!
//! ## Design: Monotonic Handles
//!
//! Handles are handed out by a strictly incrementing counter and are never
//! recycled within a registry, so there is no generation counter to check:
//!
//! ```text
//! create() → Entity(0)
//! create() → Entity(1)
//! destroy(Entity(0))
//! create() → Entity(2)     ← 0 is never handed out again
//! ```
//!
//! The raw value doubles as the index into every store's sparse array, which
//! is what makes membership tests O(1).
//!
//! ## The Null Handle
//!
//! [`Entity::NULL`] (all bits set) means "no entity". The hierarchy uses it for
//! empty parent/child/sibling links, and no store ever contains it.
//!
//! ## Comparison
//!
//! - **hecs / bevy_ecs**: 32-bit index + 32-bit generation, recycled slots.
//! - **EnTT (C++)**: packed index + version, with a reserved null value.
//! - **trellis**: a bare `u32` with a reserved null, never recycled.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A lightweight handle to an entity in a [`Registry`](super::registry::Registry).
///
/// Entities are created via [`Registry::create`](super::registry::Registry::create)
/// and destroyed via [`Registry::destroy`](super::registry::Registry::destroy).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub(crate) u32);

impl Entity {
    /// The reserved "no entity" value.
    pub const NULL: Self = Self(u32::MAX);

    /// Build a handle from its raw value. Mostly useful for tooling and tests;
    /// a handle built this way is only meaningful if a registry created it.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value (also the sparse index into every store).
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// `true` for [`Entity::NULL`].
    pub const fn is_null(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("Entity(null)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            f.write_str("null")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
