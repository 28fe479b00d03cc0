//! # Entity Hierarchies — Sibling-Linked Scene Graph
//!
//! A [`Node`] component links an entity into a tree through four handles:
//! its parent, its first child, and its previous/next sibling. The functions
//! in this module are the only code that should rewrite those links.
//!
//! ```text
//!          root
//!           │ first_child
//!           ▼
//!           a ◄──prev── b ◄──prev── c
//!           a ──next──► b ──next──► c       (a, b, c all have parent = root)
//! ```
//!
//! ## Design
//!
//! A doubly-linked sibling chain instead of a `Vec` of children: unlinking a
//! node is O(1) and never compacts an array, at the cost of O(children)
//! append (walk to the tail) and O(children) iteration.
//!
//! [`detach`] *promotes*: the node's children move up to the node's parent
//! and take its place in the sibling chain. Destroying a whole subtree is a
//! separate operation, [`destroy_subtree`], which uses [`flatten_subtree`] to
//! delete leaves before their ancestors.
//!
//! ## Usage
//!
//! ```ignore
//! let root = create_spatial_entity(&mut registry, "root");
//! let child = create_spatial_entity(&mut registry, "child");
//! append(&mut registry, root, child);
//!
//! assert_eq!(children(&registry, root).collect::<Vec<_>>(), vec![child]);
//! ```
//!
//! ## Comparison
//!
//! - **bevy_ecs**: `ChildOf` relationship + `Children` vec, kept in sync by hooks.
//! - **EnTT**: no built-in hierarchy; the linked-sibling layout here is the
//!   pattern from the EnTT wiki.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ecs::entity::Entity;
use crate::ecs::registry::Registry;
use crate::scene::{Mesh, Transform};

/// Links an entity into the scene graph. All fields default to
/// [`Entity::NULL`], i.e. an isolated root.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub parent: Entity,
    pub first_child: Entity,
    pub prev_sibling: Entity,
    pub next_sibling: Entity,
}

impl Node {
    pub fn is_root(&self) -> bool {
        self.parent.is_null()
    }

    pub fn has_children(&self) -> bool {
        !self.first_child.is_null()
    }

    /// `true` if the node has a parent or at least one child.
    pub fn is_connected(&self) -> bool {
        !self.parent.is_null() || !self.first_child.is_null()
    }
}

/// Why a [`reparent`] request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HierarchyError {
    #[error("entity {0} is not alive")]
    InvalidEntity(Entity),
    #[error("entity {0} has no Node component")]
    MissingNode(Entity),
    #[error("entity {0} cannot be its own parent")]
    SelfParent(Entity),
    #[error("cannot parent {node} under its own descendant {new_parent}")]
    Cycle { node: Entity, new_parent: Entity },
}

// ── Link Helpers ─────────────────────────────────────────────────────────

#[track_caller]
fn node(registry: &Registry, entity: Entity) -> Node {
    *registry.get::<Node>(entity)
}

#[track_caller]
fn node_mut(registry: &mut Registry, entity: Entity) -> &mut Node {
    registry.get_mut::<Node>(entity)
}

/// Unlink `entity` from its sibling chain, fixing up the parent's
/// `first_child`. Children and the node's own links are left alone.
fn unlink_from_siblings(registry: &mut Registry, entity: Entity, links: Node) {
    if links.prev_sibling.is_null() {
        if !links.parent.is_null() {
            node_mut(registry, links.parent).first_child = links.next_sibling;
        }
    } else {
        node_mut(registry, links.prev_sibling).next_sibling = links.next_sibling;
    }
    if !links.next_sibling.is_null() {
        node_mut(registry, links.next_sibling).prev_sibling = links.prev_sibling;
    }
    log::trace!("unlinked {:?} from parent {:?}", entity, links.parent);
}

// ── Structural Edits ─────────────────────────────────────────────────────

/// Make `child` the last child of `parent`.
///
/// `child` is expected to be detached (a root with no siblings).
///
/// # Panics
///
/// Panics if either entity has no [`Node`].
pub fn append(registry: &mut Registry, parent: Entity, child: Entity) {
    let first = node(registry, parent).first_child;
    {
        let child_node = node_mut(registry, child);
        child_node.parent = parent;
        child_node.next_sibling = Entity::NULL;
    }

    if first.is_null() {
        node_mut(registry, parent).first_child = child;
        node_mut(registry, child).prev_sibling = Entity::NULL;
        return;
    }

    let mut tail = first;
    loop {
        let next = node(registry, tail).next_sibling;
        if next.is_null() {
            break;
        }
        tail = next;
    }
    node_mut(registry, tail).next_sibling = child;
    node_mut(registry, child).prev_sibling = tail;
}

/// Remove `entity` from the hierarchy, promoting its children.
///
/// The children are re-parented to `entity`'s parent and spliced into the
/// parent's child chain where `entity` used to be. If `entity` was a root,
/// its children become independent roots. Afterwards every link of `entity`
/// is [`Entity::NULL`]. The entity itself is not destroyed.
///
/// # Panics
///
/// Panics if `entity` or any linked entity has no [`Node`].
pub fn detach(registry: &mut Registry, entity: Entity) {
    let links = node(registry, entity);
    let kids: Vec<Entity> = children(registry, entity).collect();

    for &kid in &kids {
        node_mut(registry, kid).parent = links.parent;
    }

    match (kids.first(), kids.last()) {
        (Some(&first), Some(&last)) if !links.parent.is_null() => {
            // Splice [first..=last] into the slot `entity` occupied.
            node_mut(registry, first).prev_sibling = links.prev_sibling;
            node_mut(registry, last).next_sibling = links.next_sibling;
            if links.prev_sibling.is_null() {
                node_mut(registry, links.parent).first_child = first;
            } else {
                node_mut(registry, links.prev_sibling).next_sibling = first;
            }
            if !links.next_sibling.is_null() {
                node_mut(registry, links.next_sibling).prev_sibling = last;
            }
        }
        _ => {
            for &kid in &kids {
                let kid_node = node_mut(registry, kid);
                kid_node.prev_sibling = Entity::NULL;
                kid_node.next_sibling = Entity::NULL;
            }
            unlink_from_siblings(registry, entity, links);
        }
    }

    *node_mut(registry, entity) = Node::default();
}

/// Move `entity` (with its whole subtree) under `new_parent`, or make it a
/// root if `new_parent` is [`Entity::NULL`].
///
/// Unlike [`detach`] + [`append`], the subtree stays intact, so the request
/// is refused if it would create a cycle.
pub fn reparent(
    registry: &mut Registry,
    entity: Entity,
    new_parent: Entity,
) -> Result<(), HierarchyError> {
    for e in [entity, new_parent] {
        if e == new_parent && e.is_null() {
            continue;
        }
        if !registry.is_valid(e) {
            return Err(HierarchyError::InvalidEntity(e));
        }
        if !registry.has::<Node>(e) {
            return Err(HierarchyError::MissingNode(e));
        }
    }
    if entity == new_parent {
        return Err(HierarchyError::SelfParent(entity));
    }
    if !new_parent.is_null() && is_descendant(registry, new_parent, entity) {
        return Err(HierarchyError::Cycle { node: entity, new_parent });
    }

    let links = node(registry, entity);
    unlink_from_siblings(registry, entity, links);
    {
        let n = node_mut(registry, entity);
        n.parent = Entity::NULL;
        n.prev_sibling = Entity::NULL;
        n.next_sibling = Entity::NULL;
    }
    if !new_parent.is_null() {
        append(registry, new_parent, entity);
    }
    log::debug!("reparented {:?} under {:?}", entity, new_parent);
    Ok(())
}

// ── Traversal ────────────────────────────────────────────────────────────

/// Iterator over the direct children of a node, first to last.
pub struct Children<'r> {
    registry: &'r Registry,
    next: Entity,
}

impl Iterator for Children<'_> {
    type Item = Entity;

    fn next(&mut self) -> Option<Entity> {
        if self.next.is_null() {
            return None;
        }
        let current = self.next;
        self.next = self.registry.get::<Node>(current).next_sibling;
        Some(current)
    }
}

/// Walk `parent`'s child chain.
///
/// # Panics
///
/// Panics if `parent` has no [`Node`].
pub fn children(registry: &Registry, parent: Entity) -> Children<'_> {
    Children {
        registry,
        next: node(registry, parent).first_child,
    }
}

/// Every descendant of `root`, leaves before their ancestors.
///
/// The tree is walked breadth first and the result reversed, so destroying
/// entities in the returned order never leaves a dangling parent. `root`
/// itself is not included.
pub fn flatten_subtree(registry: &Registry, root: Entity) -> Vec<Entity> {
    let mut result = Vec::new();
    let mut queue = VecDeque::from([root]);

    while let Some(entity) = queue.pop_front() {
        result.push(entity);
        queue.extend(children(registry, entity));
    }

    result.reverse();
    result.pop();
    result
}

/// `true` if `ancestor` is somewhere on `entity`'s parent chain.
pub fn is_descendant(registry: &Registry, entity: Entity, ancestor: Entity) -> bool {
    let mut current = node(registry, entity).parent;
    while !current.is_null() {
        if current == ancestor {
            return true;
        }
        current = node(registry, current).parent;
    }
    false
}

// ── Subtree Operations ───────────────────────────────────────────────────

/// Bake `entity`'s local transform into its children and drop it from the
/// hierarchy, then do the same for every descendant.
///
/// Entities with a [`Mesh`] keep their place and their transform; only their
/// descendants are collapsed. A missing [`Transform`] counts as identity.
pub fn collapse_transforms(registry: &mut Registry, entity: Entity) {
    let kids: Vec<Entity> = children(registry, entity).collect();

    if !registry.has::<Mesh>(entity) {
        if let Some(parent_local) = registry.try_get::<Transform>(entity).map(|t| t.local) {
            for &kid in &kids {
                if let Some(transform) = registry.try_get_mut::<Transform>(kid) {
                    transform.local = parent_local * transform.local;
                    transform.decompose();
                }
            }
        }
        detach(registry, entity);
    }

    for kid in kids {
        collapse_transforms(registry, kid);
    }
}

/// Destroy `root` and all of its descendants. Returns how many entities were
/// destroyed.
///
/// An entity without a [`Node`] is destroyed on its own; a dead one is ignored.
pub fn destroy_subtree(registry: &mut Registry, root: Entity) -> usize {
    if !registry.is_valid(root) {
        return 0;
    }
    if !registry.has::<Node>(root) {
        registry.destroy(root);
        return 1;
    }

    let descendants = flatten_subtree(registry, root);
    for &entity in &descendants {
        detach(registry, entity);
        registry.destroy(entity);
    }
    detach(registry, root);
    registry.destroy(root);

    log::debug!("destroyed {:?} and {} descendants", root, descendants.len());
    descendants.len() + 1
}

/// Strip every transform-only node from the scene graph.
///
/// Collapses each root that has children, then destroys every node that
/// ended up neither connected nor renderable. Returns the number of entities
/// destroyed.
pub fn optimize(registry: &mut Registry) -> usize {
    let roots: Vec<Entity> = registry
        .view::<(Node,)>()
        .filter(|(_, (n,))| n.is_root() && n.has_children())
        .map(|(e, _)| e)
        .collect();
    for &root in &roots {
        collapse_transforms(registry, root);
    }

    let doomed: Vec<Entity> = registry
        .view::<(Node,)>()
        .filter(|(e, (n,))| !n.is_connected() && !registry.has::<Mesh>(*e))
        .map(|(e, _)| e)
        .collect();
    for &entity in &doomed {
        registry.destroy(entity);
    }

    log::debug!(
        "optimized hierarchy: collapsed {} roots, destroyed {} nodes",
        roots.len(),
        doomed.len()
    );
    doomed.len()
}
