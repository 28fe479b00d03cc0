//! Registry diagnostics: a serializable summary of what a [`Registry`] holds.
//!
//! Enabled by the `diagnostics` feature flag. Tools render the snapshot as
//! JSON with [`RegistrySnapshot::to_json`].
//!
//! [`Registry`]: crate::ecs::registry::Registry

use serde::Serialize;

use crate::ecs::component::short_type_name;

// ── Snapshot types ───────────────────────────────────────────────────────

/// Point-in-time summary of a registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub entity_count: usize,
    /// Handles handed out so far, destroyed ones included.
    pub high_water_mark: u32,
    /// Sorted by length descending, then by name.
    pub stores: Vec<StoreSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreSnapshot {
    pub component: &'static str,
    pub len: usize,
}

impl RegistrySnapshot {
    pub(crate) fn new(
        entity_count: usize,
        high_water_mark: u32,
        stores: Vec<(&'static str, usize)>,
    ) -> Self {
        let mut stores: Vec<StoreSnapshot> = stores
            .into_iter()
            .map(|(type_name, len)| StoreSnapshot {
                component: short_type_name(type_name),
                len,
            })
            .collect();
        stores.sort_by(|a, b| b.len.cmp(&a.len).then_with(|| a.component.cmp(b.component)));

        Self {
            entity_count,
            high_water_mark,
            stores,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use crate::ecs::registry::Registry;
    use crate::scene::{Name, Transform, create_spatial_entity};

    #[test]
    fn snapshot_counts_and_sorts() {
        let mut reg = Registry::new();
        let a = create_spatial_entity(&mut reg, "a");
        let b = create_spatial_entity(&mut reg, "b");
        reg.remove::<Transform>(b);
        reg.destroy(a);
        let _c = create_spatial_entity(&mut reg, "c");
        reg.remove::<Name>(b);

        let snapshot = reg.diagnostics_snapshot();

        assert_eq!(snapshot.entity_count, 2);
        assert_eq!(snapshot.high_water_mark, 3);
        let stores: Vec<_> = snapshot.stores.iter().map(|s| (s.component, s.len)).collect();
        assert_eq!(stores, vec![("Node", 2), ("Name", 1), ("Transform", 1)]);
    }

    #[test]
    fn snapshot_renders_as_json() {
        let mut reg = Registry::new();
        create_spatial_entity(&mut reg, "root");
        let json = reg.diagnostics_snapshot().to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["entity_count"], 1);
        assert_eq!(value["stores"].as_array().map(Vec::len), Some(3));
    }
}
