//! Scene Manager - owner of a scene's entities and hierarchy
//!
//! Pairs an [`EntityStore`] with a [`SceneGraph`] so callers can spawn,
//! parent and despawn entities without juggling both borrows:
//!
//! ```text
//! spawn ──► EntityStore ──► SceneGraph.add_entity
//! despawn ─► SceneGraph.remove_entity ──► EntityStore.despawn
//! ```

use crate::config::EngineConfig;
use crate::ecs::{Entity, EntityId, EntityStore};
use crate::foundation::math::Mat4;
use crate::render::RenderContext;
use crate::scene::SceneGraph;

/// A scene: owned entities plus their hierarchy
#[derive(Debug, Default)]
pub struct SceneManager {
    store: EntityStore,
    graph: SceneGraph,
}

impl SceneManager {
    /// Create an empty scene with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty scene sized from the engine configuration
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            store: EntityStore::with_capacity(config.scene.initial_capacity),
            graph: SceneGraph::with_config(config.scene.clone()),
        }
    }

    /// Take ownership of `entity` and register it as a root
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.store.spawn(entity);
        self.graph.add_entity(&mut self.store, id);
        id
    }

    /// Spawn `entity` directly under `parent`
    ///
    /// Falls back to a root when `parent` is dead.
    pub fn spawn_child(&mut self, entity: Entity, parent: EntityId) -> EntityId {
        let id = self.spawn(entity);
        if !self.graph.attach(&mut self.store, id, parent) {
            log::warn!("Parent {:?} missing, spawned {:?} as a root", parent, id);
        }
        id
    }

    /// Remove `id` from the hierarchy, then destroy it
    ///
    /// Its children become roots. Returns the destroyed entity.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        self.graph.remove_entity(&mut self.store, id);
        self.store.despawn(id)
    }

    /// See [`SceneGraph::attach`]
    pub fn attach(&mut self, child: EntityId, parent: EntityId) -> bool {
        self.graph.attach(&mut self.store, child, parent)
    }

    /// See [`SceneGraph::detach`]
    pub fn detach(&mut self, child: EntityId) -> bool {
        self.graph.detach(&mut self.store, child)
    }

    /// Step entity logic and propagate world matrices
    pub fn update(&mut self, delta_time: f32, ctx: &mut dyn RenderContext) {
        self.graph.update(&mut self.store, delta_time, ctx);
    }

    /// Render every registered entity
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        self.graph.render(&self.store, ctx);
    }

    /// Tear down the hierarchy and destroy every entity
    pub fn shutdown(&mut self) {
        let count = self.store.len();
        self.graph.destroy(&mut self.store);
        self.store.clear();
        log::info!("Scene shut down, {} entities destroyed", count);
    }

    /// Entity behind `id`
    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.store.get(id)
    }

    /// Mutable entity behind `id`
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.store.get_mut(id)
    }

    /// World matrix from the last update
    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        self.graph.world_matrix(&self.store, id)
    }

    /// Read access to the hierarchy
    pub fn graph(&self) -> &SceneGraph {
        &self.graph
    }

    /// Read access to the entities
    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.store.len()
    }
}
