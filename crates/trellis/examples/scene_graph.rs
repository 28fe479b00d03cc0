//! Scene graph — build a small solar system, move it around, then flatten it.
//!
//! Prints the hierarchy before and after `optimize`, and a JSON registry
//! snapshot at the end.
//!
//! Run with: `RUST_LOG=debug cargo run -p trellis --example scene_graph`

use trellis::prelude::*;

// ── Markers ──────────────────────────────────────────────────────────────

struct Planet;

struct Orbit {
    speed: f32,
}

fn main() {
    env_logger::init();

    let mut registry = Registry::with_config(RegistryConfig {
        entity_capacity: 16,
        store_capacity: 16,
    });

    // A transform-only group node with the sun underneath.
    let system = create_spatial_entity(&mut registry, "solar system");
    *registry.get_mut::<Transform>(system) = Transform::from_xyz(0.0, 0.0, -10.0);

    let sun = create_spatial_entity(&mut registry, "sun");
    registry.add(sun, Mesh::new("sphere"));
    append(&mut registry, system, sun);

    for (name, distance, speed) in [("mercury", 2.0, 1.6), ("venus", 3.5, 1.2), ("earth", 5.0, 1.0)]
    {
        let planet = create_spatial_entity(&mut registry, name);
        *registry.get_mut::<Transform>(planet) = Transform::from_xyz(distance, 0.0, 0.0);
        registry.add(planet, Mesh::new("sphere"));
        registry.add(planet, Planet);
        registry.add(planet, Orbit { speed });
        append(&mut registry, sun, planet);
    }

    let earth_pivot = create_spatial_entity(&mut registry, "earth pivot");
    let earth = registry
        .view::<(Name, Planet)>()
        .find(|(_, (name, _))| name.as_str() == "earth")
        .map(|(entity, _)| entity);
    if let Some(earth) = earth {
        append(&mut registry, earth, earth_pivot);
        let moon = create_spatial_entity(&mut registry, "moon");
        *registry.get_mut::<Transform>(moon) = Transform::from_xyz(0.6, 0.0, 0.0).with_scale(0.3);
        registry.add(moon, Mesh::new("sphere"));
        append(&mut registry, earth_pivot, moon);
    }

    // Advance the orbits one step.
    registry.each::<(&mut Transform, &Orbit)>(|_, (transform, orbit)| {
        let rotation = Quat::from_rotation_y(orbit.speed * 0.1);
        transform.position = rotation * transform.position;
        transform.rotation = rotation * transform.rotation;
        transform.compose();
    });
    propagate_transforms(&mut registry);

    println!("── before optimize ──");
    print_tree(&registry, system, 0);

    let removed = optimize(&mut registry);
    propagate_transforms(&mut registry);

    println!("── after optimize ({removed} nodes removed) ──");
    let roots: Vec<Entity> = registry
        .view::<(Node,)>()
        .filter(|(_, (node,))| node.is_root())
        .map(|(entity, _)| entity)
        .collect();
    for root in roots {
        print_tree(&registry, root, 0);
    }

    match registry.diagnostics_snapshot().to_json() {
        Ok(json) => println!("{json}"),
        Err(err) => log::error!("failed to render snapshot: {err}"),
    }
}

fn print_tree(registry: &Registry, entity: Entity, depth: usize) {
    let name = registry.try_get::<Name>(entity).map_or("<unnamed>", Name::as_str);
    let world = registry
        .try_get::<Transform>(entity)
        .map(Transform::world_position)
        .unwrap_or(Vec3::ZERO);
    let mut components = Vec::new();
    registry.visit(entity, |info| components.push(info.short_name()));
    components.sort_unstable();

    println!(
        "{:indent$}{name} [{entity}] at ({:.2}, {:.2}, {:.2}) {{{}}}",
        "",
        world.x,
        world.y,
        world.z,
        components.join(", "),
        indent = depth * 2
    );
    for child in children(registry, entity) {
        print_tree(registry, child, depth + 1);
    }
}
