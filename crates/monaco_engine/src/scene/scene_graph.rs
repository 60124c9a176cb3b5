//! Hierarchical scene graph
//!
//! Keeps the registry of entities that take part in the scene, enforces the
//! tree invariants on every structural edit and propagates local transforms
//! into world matrices once per frame.
//!
//! ## Invariants
//!
//! - every registered entity carries a [`TransformComponent`] and a
//!   [`HierarchyComponent`]
//! - a node has at most one parent, and `parent.children` lists it exactly once
//! - the parent relation never forms a cycle
//!
//! Rejected edits return `false` and leave every entity untouched.
//!
//! ## Matrix convention
//!
//! Matrices are column-vector (`nalgebra`): `world(child) = world(parent) * local(child)`.
//! This is the transpose of the row-vector form `local * parentWorld`.

use std::collections::HashSet;

use crate::config::SceneGraphConfig;
use crate::ecs::components::{HierarchyComponent, TransformComponent};
use crate::ecs::{EntityId, EntityStore};
use crate::foundation::math::Mat4;
use crate::render::RenderContext;

/// Registry and propagation engine for the entity hierarchy
///
/// The graph does not own entities. Every operation borrows the
/// [`EntityStore`] they live in; handles that no longer resolve are treated
/// as absent.
#[derive(Debug)]
pub struct SceneGraph {
    entities: Vec<EntityId>,
    members: HashSet<EntityId>,
    config: SceneGraphConfig,
    depth_warned: bool,
}

impl SceneGraph {
    /// Create an empty graph with the default configuration
    pub fn new() -> Self {
        Self::with_config(SceneGraphConfig::default())
    }

    /// Create an empty graph
    pub fn with_config(config: SceneGraphConfig) -> Self {
        Self {
            entities: Vec::with_capacity(config.initial_capacity),
            members: HashSet::with_capacity(config.initial_capacity),
            config,
            depth_warned: false,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &SceneGraphConfig {
        &self.config
    }

    /// Clear the registry
    pub fn init(&mut self) {
        self.entities.clear();
        self.members.clear();
        self.depth_warned = false;
    }

    // ── Registry ─────────────────────────────────────────────────────

    /// Register `id`, attaching a default transform and hierarchy node if missing
    ///
    /// Links the entity already carries survive only when the other side is
    /// registered and agrees; anything else is cut, so a cloned or re-added
    /// entity enters as a root.
    ///
    /// Returns `false` without side effects when `id` is dead or already registered.
    pub fn add_entity(&mut self, store: &mut EntityStore, id: EntityId) -> bool {
        if self.members.contains(&id) {
            return false;
        }
        let Some(entity) = store.get_mut(id) else {
            return false;
        };

        entity.ensure_component::<TransformComponent>();
        entity.ensure_component::<HierarchyComponent>();
        log::debug!("Registered '{}' in scene graph", entity.name());

        self.members.insert(id);
        self.entities.push(id);
        self.reconcile_links(store, id);
        true
    }

    fn linked_parent(&self, store: &EntityStore, id: EntityId) -> Option<EntityId> {
        if self.members.contains(&id) {
            parent(store, id)
        } else {
            None
        }
    }

    /// Cut links that the other side does not mirror
    fn reconcile_links(&self, store: &mut EntityStore, id: EntityId) {
        let Some(node) = store.get(id).and_then(|e| e.get_component::<HierarchyComponent>()) else {
            return;
        };

        let kept_parent = node
            .parent()
            .filter(|p| self.members.contains(p) && lists_child(store, *p, id));
        let stray: Vec<EntityId> = node
            .children()
            .iter()
            .copied()
            .filter(|c| !self.members.contains(c) || parent(store, *c) != Some(id))
            .collect();

        if kept_parent == node.parent() && stray.is_empty() {
            return;
        }
        if let Some(node) = hierarchy_mut(store, id) {
            node.set_parent(kept_parent);
            for child in &stray {
                node.remove_child(*child);
            }
        }
        log::warn!("Cut stale links of {:?} on registration, {} children dropped", id, stray.len());
    }

    /// Unregister `id`; its children become roots
    ///
    /// Children stay registered and are not re-parented to the removed
    /// entity's former parent.
    pub fn remove_entity(&mut self, store: &mut EntityStore, id: EntityId) {
        if !self.members.remove(&id) {
            return;
        }
        self.entities.retain(|e| *e != id);

        self.detach(store, id);
        let orphans = hierarchy_mut(store, id)
            .map(HierarchyComponent::take_children)
            .unwrap_or_default();
        for orphan in &orphans {
            if let Some(node) = hierarchy_mut(store, *orphan) {
                node.set_parent(None);
            }
        }

        log::debug!("Removed {:?} from scene graph, {} children orphaned", id, orphans.len());
    }

    /// Registered handles in registration order
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Number of registered entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `id` is registered
    pub fn is_registered(&self, id: EntityId) -> bool {
        self.members.contains(&id)
    }

    // ── Structure ────────────────────────────────────────────────────

    /// Whether `ancestor` appears on the parent chain of `node`
    ///
    /// A node is not its own ancestor. Links held by unregistered entities
    /// are ignored, since registration cuts them anyway.
    pub fn is_ancestor(&self, store: &EntityStore, ancestor: EntityId, node: EntityId) -> bool {
        let mut current = self.linked_parent(store, node);
        // The chain can never be longer than the number of live entities.
        for _ in 0..=store.len() {
            match current {
                Some(id) if id == ancestor => return true,
                Some(id) => current = self.linked_parent(store, id),
                None => return false,
            }
        }
        log::error!("Parent chain of {:?} does not terminate", node);
        false
    }

    /// Make `child` a child of `parent`
    ///
    /// Rejects dead handles, self-attachment and edits that would create a
    /// cycle. Unregistered entities are registered first, and `child` is
    /// detached from any previous parent.
    pub fn attach(&mut self, store: &mut EntityStore, child: EntityId, parent: EntityId) -> bool {
        if !store.contains(child) || !store.contains(parent) {
            log::warn!("Rejected attach of {:?} to {:?}: entity does not exist", child, parent);
            return false;
        }
        if child == parent {
            log::warn!("Rejected attach of {:?} to itself", child);
            return false;
        }
        if self.is_ancestor(store, child, parent) {
            log::warn!("Rejected attach of {:?} to {:?}: would create a cycle", child, parent);
            return false;
        }

        self.add_entity(store, child);
        self.add_entity(store, parent);
        self.detach(store, child);

        if let Some(node) = hierarchy_mut(store, child) {
            node.set_parent(Some(parent));
        }
        if let Some(node) = hierarchy_mut(store, parent) {
            node.add_child(child);
        }

        log::debug!("Attached {:?} to {:?}", child, parent);
        true
    }

    /// Make `child` a root
    ///
    /// Returns `false` for a dead handle or an entity without a hierarchy
    /// node. Detaching a root succeeds without changes.
    pub fn detach(&mut self, store: &mut EntityStore, child: EntityId) -> bool {
        let Some(entity) = store.get_mut(child) else {
            return false;
        };
        let Some(node) = entity.get_component_mut::<HierarchyComponent>() else {
            return false;
        };
        let Some(former) = node.parent() else {
            return true;
        };
        node.set_parent(None);

        if let Some(node) = hierarchy_mut(store, former) {
            node.remove_child(child);
        }
        log::debug!("Detached {:?} from {:?}", child, former);
        true
    }

    /// Parent of `id`, if any
    pub fn parent_of(&self, store: &EntityStore, id: EntityId) -> Option<EntityId> {
        parent(store, id)
    }

    /// Children of `id` in attachment order
    pub fn children_of<'s>(&self, store: &'s EntityStore, id: EntityId) -> &'s [EntityId] {
        store
            .get(id)
            .and_then(|e| e.get_component::<HierarchyComponent>())
            .map(HierarchyComponent::children)
            .unwrap_or_default()
    }

    /// Whether `id` is registered and has no live parent
    pub fn is_root(&self, store: &EntityStore, id: EntityId) -> bool {
        self.is_registered(id)
            && store.contains(id)
            && parent(store, id).map_or(true, |p| !store.contains(p))
    }

    /// Registered roots in registration order
    pub fn roots(&self, store: &EntityStore) -> Vec<EntityId> {
        self.entities
            .iter()
            .copied()
            .filter(|id| self.is_root(store, *id))
            .collect()
    }

    /// World matrix from the last propagation
    pub fn world_matrix(&self, store: &EntityStore, id: EntityId) -> Option<Mat4> {
        store
            .get(id)
            .and_then(|e| e.get_component::<TransformComponent>())
            .map(|t| *t.world_matrix())
    }

    /// Pre-order listing of the forest as `(id, depth)`, roots at depth 0
    pub fn walk_depth_first(&self, store: &EntityStore) -> Vec<(EntityId, usize)> {
        let mut out = Vec::with_capacity(self.entities.len());
        let mut visited = HashSet::with_capacity(self.entities.len());
        let mut stack: Vec<(EntityId, usize)> =
            self.roots(store).into_iter().rev().map(|id| (id, 0)).collect();

        while let Some((id, depth)) = stack.pop() {
            if !store.contains(id) || !visited.insert(id) {
                continue;
            }
            out.push((id, depth));
            for &child in self.children_of(store, id).iter().rev() {
                stack.push((child, depth + 1));
            }
        }
        out
    }

    // ── Frame ────────────────────────────────────────────────────────

    /// Run every entity's update hook, then propagate world matrices
    pub fn update(&mut self, store: &mut EntityStore, delta_time: f32, ctx: &mut dyn RenderContext) {
        log::trace!("Scene graph update: {} entities, dt {:.4}", self.entities.len(), delta_time);
        for &id in &self.entities {
            if let Some(entity) = store.get_mut(id) {
                entity.update(delta_time, ctx);
            }
        }
        self.propagate(store);
    }

    /// Run every entity's render hook in registration order
    pub fn render(&self, store: &EntityStore, ctx: &mut dyn RenderContext) {
        for &id in &self.entities {
            if let Some(entity) = store.get(id) {
                entity.render(ctx);
            }
        }
    }

    /// Clear every registered hierarchy node and empty the registry
    ///
    /// Entities stay alive in the store.
    pub fn destroy(&mut self, store: &mut EntityStore) {
        for &id in &self.entities {
            if let Some(node) = hierarchy_mut(store, id) {
                node.set_parent(None);
                node.take_children();
            }
        }
        log::debug!("Scene graph destroyed ({} entities released)", self.entities.len());
        self.init();
    }

    /// Depth-first, parent before child, siblings in attachment order
    fn propagate(&mut self, store: &mut EntityStore) {
        let mut visited = HashSet::with_capacity(self.entities.len());
        let mut stack: Vec<(EntityId, Mat4, usize)> = Vec::with_capacity(self.entities.len());
        for &root in self.entities.iter().rev() {
            if self.is_root(store, root) {
                stack.push((root, Mat4::identity(), 0));
            }
        }

        while let Some((id, parent_world, depth)) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let Some(entity) = store.get_mut(id) else {
                continue;
            };

            if depth > self.config.depth_warning_threshold && !self.depth_warned {
                log::warn!(
                    "Hierarchy under '{}' is {} levels deep (threshold {})",
                    entity.name(),
                    depth,
                    self.config.depth_warning_threshold
                );
                self.depth_warned = true;
            }

            let world = match entity.get_component_mut::<TransformComponent>() {
                Some(transform) => {
                    let world = parent_world * transform.local_matrix();
                    transform.set_world_matrix(world);
                    world
                }
                None => parent_world,
            };

            if let Some(node) = entity.get_component::<HierarchyComponent>() {
                for &child in node.children().iter().rev() {
                    stack.push((child, world, depth + 1));
                }
            }
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

fn parent(store: &EntityStore, id: EntityId) -> Option<EntityId> {
    store.get(id)?.get_component::<HierarchyComponent>()?.parent()
}

fn lists_child(store: &EntityStore, id: EntityId, child: EntityId) -> bool {
    store
        .get(id)
        .and_then(|e| e.get_component::<HierarchyComponent>())
        .is_some_and(|h| h.has_child(child))
}

fn hierarchy_mut(store: &mut EntityStore, id: EntityId) -> Option<&mut HierarchyComponent> {
    store.get_mut(id)?.get_component_mut::<HierarchyComponent>()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::components::MeshComponent;
    use crate::ecs::{Actor, Entity, EntityHooks, EntityKind};
    use crate::foundation::math::{Mat4Ext, Vec3};
    use crate::render::{DrawCall, NullContext, RecordingContext};
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const EPSILON: f32 = 1e-4;

    fn spawn(store: &mut EntityStore, name: &str) -> EntityId {
        store.spawn(Entity::new(name))
    }

    fn setup(names: &[&str]) -> (EntityStore, SceneGraph, Vec<EntityId>) {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let ids: Vec<_> = names.iter().map(|n| spawn(&mut store, n)).collect();
        for &id in &ids {
            graph.add_entity(&mut store, id);
        }
        (store, graph, ids)
    }

    fn hierarchy(store: &EntityStore, id: EntityId) -> &HierarchyComponent {
        store.get(id).unwrap().get_component::<HierarchyComponent>().unwrap()
    }

    fn set_local(store: &mut EntityStore, id: EntityId, position: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
        let transform = store.get_mut(id).unwrap().get_component_mut::<TransformComponent>().unwrap();
        transform.set_transform(position, rotation, scale);
        *transform.local_matrix()
    }

    /// Every parent link is mirrored by exactly one child entry and every chain ends at a root.
    fn assert_consistent(store: &EntityStore, graph: &SceneGraph) {
        for &id in graph.entities() {
            let node = hierarchy(store, id);
            if let Some(p) = node.parent() {
                assert!(graph.is_registered(p));
                assert_eq!(hierarchy(store, p).children().iter().filter(|c| **c == id).count(), 1);
            }
            for &child in node.children() {
                assert_eq!(hierarchy(store, child).parent(), Some(id));
            }
            let owners = graph
                .entities()
                .iter()
                .filter(|p| hierarchy(store, **p).has_child(id))
                .count();
            assert!(owners <= 1);
            assert!(!graph.is_ancestor(store, id, id));

            let mut steps = 0;
            let mut current = node.parent();
            while let Some(p) = current {
                steps += 1;
                assert!(steps <= graph.len(), "cycle through {id:?}");
                current = hierarchy(store, p).parent();
            }
        }
    }

    #[test]
    fn test_add_entity_injects_components() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let id = spawn(&mut store, "bare");
        assert!(!store.get(id).unwrap().has_component::<HierarchyComponent>());

        assert!(graph.add_entity(&mut store, id));
        assert!(!graph.add_entity(&mut store, id));

        let entity = store.get(id).unwrap();
        assert!(entity.has_component::<TransformComponent>());
        assert!(entity.has_component::<HierarchyComponent>());
        assert_eq!(graph.entities(), &[id]);
    }

    #[test]
    fn test_add_entity_ignores_dead_handle() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let id = spawn(&mut store, "gone");
        store.despawn(id);

        assert!(!graph.add_entity(&mut store, id));
        assert!(graph.is_empty());
    }

    #[test]
    fn test_init_clears_registry() {
        let (_store, mut graph, _) = setup(&["a", "b"]);
        graph.init();
        graph.init();
        assert!(graph.is_empty());
    }

    #[test]
    fn test_scenario() {
        let (mut store, mut graph, ids) = setup(&["A", "B", "C", "D"]);
        let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);

        assert!(graph.attach(&mut store, b, a));
        assert!(graph.attach(&mut store, c, b));
        assert!(graph.attach(&mut store, d, a));

        assert_eq!(graph.roots(&store), vec![a]);
        assert_eq!(graph.children_of(&store, a), &[b, d]);
        assert_eq!(graph.children_of(&store, b), &[c]);

        assert!(graph.detach(&mut store, b));
        assert_eq!(graph.parent_of(&store, b), None);
        assert_eq!(graph.children_of(&store, a), &[d]);
        assert!(graph.is_registered(b));
        assert_eq!(graph.parent_of(&store, c), Some(b));
        assert_consistent(&store, &graph);
    }

    #[test]
    fn test_attach_auto_registers() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let parent = spawn(&mut store, "parent");
        let child = spawn(&mut store, "child");

        assert!(graph.attach(&mut store, child, parent));
        assert!(graph.is_registered(parent));
        assert!(graph.is_registered(child));
        assert_eq!(graph.entities(), &[child, parent]);
    }

    #[test]
    fn test_self_attach_rejected() {
        let (mut store, mut graph, ids) = setup(&["x"]);
        let before = hierarchy(&store, ids[0]).clone();

        assert!(!graph.attach(&mut store, ids[0], ids[0]));
        assert_eq!(*hierarchy(&store, ids[0]), before);
    }

    #[test]
    fn test_cycle_rejected_without_mutation() {
        let (mut store, mut graph, ids) = setup(&["A", "B", "C"]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        assert!(graph.attach(&mut store, b, a));
        assert!(graph.attach(&mut store, c, b));

        let snapshot: Vec<_> = ids.iter().map(|id| hierarchy(&store, *id).clone()).collect();
        assert!(!graph.attach(&mut store, a, b));
        assert!(!graph.attach(&mut store, a, c));

        let after: Vec<_> = ids.iter().map(|id| hierarchy(&store, *id).clone()).collect();
        assert_eq!(snapshot, after);
    }

    #[test]
    fn test_rejected_attach_does_not_register() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let a = spawn(&mut store, "a");
        let dead = spawn(&mut store, "dead");
        store.despawn(dead);

        assert!(!graph.attach(&mut store, a, dead));
        assert!(!graph.attach(&mut store, dead, a));
        assert!(graph.is_empty());
        assert!(!store.get(a).unwrap().has_component::<HierarchyComponent>());
    }

    #[test]
    fn test_reparent_moves_single_link() {
        let (mut store, mut graph, ids) = setup(&["p1", "p2", "e"]);
        let (p1, p2, e) = (ids[0], ids[1], ids[2]);

        assert!(graph.attach(&mut store, e, p1));
        assert!(graph.attach(&mut store, e, p2));

        assert_eq!(graph.parent_of(&store, e), Some(p2));
        assert!(graph.children_of(&store, p1).is_empty());
        assert_eq!(graph.children_of(&store, p2), &[e]);
    }

    #[test]
    fn test_reattach_moves_child_to_back() {
        let (mut store, mut graph, ids) = setup(&["p", "a", "b"]);
        assert!(graph.attach(&mut store, ids[1], ids[0]));
        assert!(graph.attach(&mut store, ids[2], ids[0]));
        assert!(graph.attach(&mut store, ids[1], ids[0]));

        // Re-attaching moves the child to the back of the list.
        assert_eq!(graph.children_of(&store, ids[0]), &[ids[2], ids[1]]);
        assert_consistent(&store, &graph);
    }

    #[test]
    fn test_detach_root_is_noop() {
        let (mut store, mut graph, ids) = setup(&["root"]);
        let before = hierarchy(&store, ids[0]).clone();

        assert!(graph.detach(&mut store, ids[0]));
        assert!(graph.detach(&mut store, ids[0]));
        assert_eq!(*hierarchy(&store, ids[0]), before);
    }

    #[test]
    fn test_detach_edge_cases() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let bare = spawn(&mut store, "bare");
        let dead = spawn(&mut store, "dead");
        store.despawn(dead);

        // No hierarchy node to detach.
        assert!(!graph.detach(&mut store, bare));
        assert!(!graph.detach(&mut store, dead));
        assert!(store.get(bare).unwrap().get_component::<HierarchyComponent>().is_none());
    }

    #[test]
    fn test_remove_entity_orphans_children() {
        let (mut store, mut graph, ids) = setup(&["G", "A", "B", "C"]);
        let (g, a, b, c) = (ids[0], ids[1], ids[2], ids[3]);
        assert!(graph.attach(&mut store, a, g));
        assert!(graph.attach(&mut store, b, a));
        assert!(graph.attach(&mut store, c, a));

        graph.remove_entity(&mut store, a);

        assert!(!graph.is_registered(a));
        assert!(graph.is_registered(b));
        assert!(graph.is_registered(c));
        assert_eq!(graph.parent_of(&store, b), None);
        assert_eq!(graph.parent_of(&store, c), None);
        // Not re-parented to the grandparent.
        assert!(graph.children_of(&store, g).is_empty());
        assert!(graph.children_of(&store, a).is_empty());
        assert_eq!(graph.roots(&store), vec![g, b, c]);
        assert_consistent(&store, &graph);

        // Removing twice is harmless.
        graph.remove_entity(&mut store, a);
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_world_propagation_composes_down_the_chain() {
        let (mut store, mut graph, ids) = setup(&["A", "B", "C"]);
        let (a, b, c) = (ids[0], ids[1], ids[2]);
        assert!(graph.attach(&mut store, b, a));
        assert!(graph.attach(&mut store, c, b));

        let ma = set_local(&mut store, a, Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.5, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let mb = set_local(&mut store, b, Vec3::new(0.0, 1.0, 0.0), Vec3::new(0.3, 0.0, 0.7), Vec3::new(1.0, 0.5, 1.0));
        let mc = set_local(&mut store, c, Vec3::new(-1.0, 0.0, 4.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 3.0));

        graph.update(&mut store, 0.016, &mut NullContext);

        assert_relative_eq!(graph.world_matrix(&store, a).unwrap(), ma, epsilon = EPSILON);
        assert_relative_eq!(graph.world_matrix(&store, b).unwrap(), ma * mb, epsilon = EPSILON);
        assert_relative_eq!(graph.world_matrix(&store, c).unwrap(), ma * mb * mc, epsilon = EPSILON);
    }

    #[test]
    fn test_world_position_of_orbiting_child() {
        let (mut store, mut graph, ids) = setup(&["sun", "planet"]);
        assert!(graph.attach(&mut store, ids[1], ids[0]));
        set_local(&mut store, ids[0], Vec3::zeros(), Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0), Vec3::new(1.0, 1.0, 1.0));
        set_local(&mut store, ids[1], Vec3::new(10.0, 0.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        graph.update(&mut store, 0.0, &mut NullContext);

        let planet = store.get(ids[1]).unwrap().get_component::<TransformComponent>().unwrap();
        assert_relative_eq!(planet.world_position(), Vec3::new(0.0, 0.0, -10.0), epsilon = EPSILON);
    }

    #[test]
    fn test_detached_subtree_reverts_to_local() {
        let (mut store, mut graph, ids) = setup(&["p", "c"]);
        assert!(graph.attach(&mut store, ids[1], ids[0]));
        set_local(&mut store, ids[0], Vec3::new(5.0, 0.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let mc = set_local(&mut store, ids[1], Vec3::new(0.0, 1.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        graph.update(&mut store, 0.0, &mut NullContext);

        graph.detach(&mut store, ids[1]);
        graph.update(&mut store, 0.0, &mut NullContext);
        assert_relative_eq!(graph.world_matrix(&store, ids[1]).unwrap(), mc, epsilon = EPSILON);
    }

    #[test]
    fn test_update_hooks_run_before_propagation() {
        fn slide(entity: &mut Entity, dt: f32, _ctx: &mut dyn RenderContext) {
            if let Some(t) = entity.get_component_mut::<TransformComponent>() {
                t.translate(Vec3::new(dt, 0.0, 0.0));
            }
        }
        let hooks = EntityHooks {
            update: slide,
            ..EntityHooks::PASSIVE
        };
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let parent = store.spawn(Entity::with_kind("slider", EntityKind::Custom("slider"), hooks));
        let child = spawn(&mut store, "rider");
        assert!(graph.attach(&mut store, child, parent));

        graph.update(&mut store, 2.0, &mut NullContext);

        let world = graph.world_matrix(&store, child).unwrap();
        assert_relative_eq!(world.m14, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_inactive_entities_still_propagate() {
        let (mut store, mut graph, ids) = setup(&["p", "c"]);
        assert!(graph.attach(&mut store, ids[1], ids[0]));
        set_local(&mut store, ids[0], Vec3::new(0.0, 0.0, 7.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        store.get_mut(ids[0]).unwrap().set_active(false);

        graph.update(&mut store, 0.0, &mut NullContext);
        assert_relative_eq!(graph.world_matrix(&store, ids[1]).unwrap().m34, 7.0, epsilon = EPSILON);
    }

    #[test]
    fn test_render_follows_registration_order() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let child = store.spawn(Actor::with_mesh("child", MeshComponent::quad("c")));
        let parent = store.spawn(Actor::with_mesh("parent", MeshComponent::quad("p")));
        graph.add_entity(&mut store, child);
        assert!(graph.attach(&mut store, child, parent));
        set_local(&mut store, parent, Vec3::new(0.0, 4.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));

        let mut ctx = RecordingContext::new();
        graph.update(&mut store, 0.016, &mut ctx);
        graph.render(&store, &mut ctx);

        let labels: Vec<_> = ctx.draws().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["child", "parent"]);
        assert_relative_eq!(ctx.draws()[0].world.m24, 4.0, epsilon = EPSILON);
    }

    #[test]
    fn test_update_hooks_run_in_registration_order() {
        fn record(entity: &mut Entity, _dt: f32, ctx: &mut dyn RenderContext) {
            let (Some(mesh), Some(transform)) = (
                entity.get_component::<MeshComponent>(),
                entity.get_component::<TransformComponent>(),
            ) else {
                return;
            };
            ctx.draw(DrawCall {
                label: entity.name(),
                mesh,
                material: None,
                world: *transform.world_matrix(),
            });
        }
        let hooks = EntityHooks {
            update: record,
            ..EntityHooks::PASSIVE
        };
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let mut spawn_recorder = |name: &str| {
            let entity = Entity::with_kind(name, EntityKind::Custom("recorder"), hooks)
                .with_component(MeshComponent::quad(name))
                .unwrap();
            store.spawn(entity)
        };
        let (g, c, p) = (spawn_recorder("g"), spawn_recorder("c"), spawn_recorder("p"));
        for id in [g, c, p] {
            graph.add_entity(&mut store, id);
        }
        assert!(graph.attach(&mut store, c, p));
        assert!(graph.attach(&mut store, g, c));

        let mut ctx = RecordingContext::new();
        graph.update(&mut store, 0.016, &mut ctx);

        let labels: Vec<_> = ctx.draws().iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, vec!["g", "c", "p"]);
    }

    #[test]
    fn test_cloned_entity_registers_as_root() {
        let (mut store, mut graph, ids) = setup(&["A", "B"]);
        let (a, b) = (ids[0], ids[1]);
        assert!(graph.attach(&mut store, b, a));
        set_local(&mut store, a, Vec3::new(5.0, 0.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        let mb = set_local(&mut store, b, Vec3::new(0.0, 1.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
        graph.update(&mut store, 0.0, &mut NullContext);

        let source = store.get(b).unwrap().clone();
        let copy = store.spawn(source);
        assert_eq!(hierarchy(&store, copy).parent(), Some(a));
        assert!(graph.add_entity(&mut store, copy));

        assert_eq!(graph.parent_of(&store, copy), None);
        assert!(graph.is_root(&store, copy));
        assert_eq!(graph.children_of(&store, a), &[b]);
        assert_consistent(&store, &graph);

        graph.update(&mut store, 0.0, &mut NullContext);
        assert_relative_eq!(graph.world_matrix(&store, copy).unwrap(), mb, epsilon = EPSILON);
    }

    #[test]
    fn test_clone_can_adopt_its_source_parent() {
        let (mut store, mut graph, ids) = setup(&["A", "B"]);
        let (a, b) = (ids[0], ids[1]);
        assert!(graph.attach(&mut store, b, a));

        // The stale link to `b` must not read as a cycle.
        let source = store.get(b).unwrap().clone();
        let copy = store.spawn(source);
        assert!(graph.attach(&mut store, b, copy));
        assert_eq!(graph.parent_of(&store, copy), None);
        assert_eq!(graph.children_of(&store, copy), &[b]);
        assert!(graph.children_of(&store, a).is_empty());
        assert_consistent(&store, &graph);
    }

    #[test]
    fn test_readding_after_init_starts_from_roots() {
        let (mut store, mut graph, ids) = setup(&["A", "B"]);
        let (a, b) = (ids[0], ids[1]);
        assert!(graph.attach(&mut store, b, a));

        graph.init();
        assert!(graph.add_entity(&mut store, b));
        assert!(graph.add_entity(&mut store, a));

        assert_consistent(&store, &graph);
        assert_eq!(graph.roots(&store), vec![b, a]);
        assert!(graph.children_of(&store, a).is_empty());
        assert_eq!(graph.parent_of(&store, b), None);
    }

    #[test]
    fn test_registration_keeps_mirrored_links() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::new();
        let a = spawn(&mut store, "A");
        let b = spawn(&mut store, "B");
        graph.add_entity(&mut store, a);

        let mut linked = HierarchyComponent::new();
        linked.set_parent(Some(a));
        let c = store.spawn(Entity::new("C").with_component(linked).unwrap());
        hierarchy_mut(&mut store, a).unwrap().add_child(c);
        // Points at an entity that is not registered.
        let mut dangling = HierarchyComponent::new();
        dangling.add_child(b);
        let d = store.spawn(Entity::new("D").with_component(dangling).unwrap());

        assert!(graph.add_entity(&mut store, c));
        assert!(graph.add_entity(&mut store, d));

        assert_eq!(graph.parent_of(&store, c), Some(a));
        assert_eq!(graph.children_of(&store, a), &[c]);
        assert!(graph.children_of(&store, d).is_empty());
        assert_consistent(&store, &graph);
    }

    #[test]
    fn test_walk_depth_first_preorder() {
        let (mut store, mut graph, ids) = setup(&["A", "B", "C", "D", "E"]);
        let (a, b, c, d, e) = (ids[0], ids[1], ids[2], ids[3], ids[4]);
        graph.attach(&mut store, b, a);
        graph.attach(&mut store, c, b);
        graph.attach(&mut store, d, a);

        let walk = graph.walk_depth_first(&store);
        assert_eq!(walk, vec![(a, 0), (b, 1), (c, 2), (d, 1), (e, 0)]);
    }

    #[test]
    fn test_deep_chain_propagates_without_recursion() {
        let mut store = EntityStore::new();
        let mut graph = SceneGraph::with_config(SceneGraphConfig::new().with_depth_warning_threshold(8));
        let mut previous = spawn(&mut store, "link0");
        graph.add_entity(&mut store, previous);
        for i in 1..2_000 {
            let next = spawn(&mut store, &format!("link{i}"));
            assert!(graph.attach(&mut store, next, previous));
            set_local(&mut store, next, Vec3::new(1.0, 0.0, 0.0), Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0));
            previous = next;
        }

        graph.update(&mut store, 0.0, &mut NullContext);
        assert_relative_eq!(graph.world_matrix(&store, previous).unwrap().m14, 1999.0, epsilon = 1e-2);
    }

    #[test]
    fn test_stale_handles_are_skipped() {
        let (mut store, mut graph, ids) = setup(&["p", "c"]);
        assert!(graph.attach(&mut store, ids[1], ids[0]));
        // Despawned behind the graph's back.
        store.despawn(ids[0]);

        graph.update(&mut store, 0.0, &mut NullContext);
        graph.render(&store, &mut NullContext);
        assert!(graph.is_root(&store, ids[1]));
        assert!(!graph.is_root(&store, ids[0]));
    }

    #[test]
    fn test_destroy_clears_hierarchy_but_keeps_entities() {
        let (mut store, mut graph, ids) = setup(&["a", "b"]);
        assert!(graph.attach(&mut store, ids[1], ids[0]));

        graph.destroy(&mut store);
        assert!(graph.is_empty());
        assert_eq!(store.len(), 2);
        assert!(hierarchy(&store, ids[0]).children().is_empty());
        assert!(hierarchy(&store, ids[1]).is_root());
    }

    #[test]
    fn test_random_edits_keep_forest_acyclic() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let (mut store, mut graph, mut ids) = setup(&["n0", "n1", "n2", "n3", "n4", "n5", "n6", "n7", "n8", "n9"]);

        for step in 0..2_000 {
            let x = ids[rng.gen_range(0..ids.len())];
            let y = ids[rng.gen_range(0..ids.len())];
            match rng.gen_range(0..10) {
                0..=5 => {
                    let would_cycle = x == y || graph.is_ancestor(&store, x, y);
                    assert_eq!(graph.attach(&mut store, x, y), !would_cycle);
                    if !would_cycle {
                        assert_eq!(graph.parent_of(&store, x), Some(y));
                    }
                }
                6 | 7 => {
                    assert!(graph.detach(&mut store, x));
                    assert_eq!(graph.parent_of(&store, x), None);
                }
                8 => {
                    graph.remove_entity(&mut store, x);
                    graph.add_entity(&mut store, x);
                }
                _ => {
                    graph.remove_entity(&mut store, x);
                    store.despawn(x);
                    let fresh = spawn(&mut store, &format!("fresh{step}"));
                    graph.add_entity(&mut store, fresh);
                    ids.retain(|id| *id != x);
                    ids.push(fresh);
                }
            }
            assert_consistent(&store, &graph);
        }

        graph.update(&mut store, 0.0, &mut NullContext);
        assert_eq!(graph.walk_depth_first(&store).len(), graph.len());
    }

    #[test]
    fn test_decomposed_world_matches_row_form() {
        let (mut store, mut graph, ids) = setup(&["a", "b"]);
        graph.attach(&mut store, ids[1], ids[0]);
        let ma = set_local(&mut store, ids[0], Vec3::new(1.0, 0.0, 0.0), Vec3::new(0.2, 0.1, 0.0), Vec3::new(1.0, 1.0, 1.0));
        let mb = set_local(&mut store, ids[1], Vec3::new(0.0, 2.0, 0.0), Vec3::new(0.0, 0.0, 0.4), Vec3::new(1.0, 1.0, 1.0));
        graph.update(&mut store, 0.0, &mut NullContext);

        // Row-vector form: world(B) = Mb^T * Ma^T.
        let row_form = mb.transpose() * ma.transpose();
        let world = graph.world_matrix(&store, ids[1]).unwrap();
        assert_relative_eq!(world.transpose(), row_form, epsilon = EPSILON);
        assert_relative_eq!(world.to_local_components().0, (ma * mb.column(3)).xyz(), epsilon = EPSILON);
    }
}
