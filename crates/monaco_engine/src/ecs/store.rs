//! Entity storage
//!
//! Generation-checked arena of entities. A handle whose entity was despawned
//! simply stops resolving, which is how the scene graph treats "null".

use slotmap::SlotMap;

use super::entity::Entity;

slotmap::new_key_type! {
    /// Stable, generation-checked handle to an [`Entity`] in an [`EntityStore`]
    pub struct EntityId;
}

/// Owner of every live entity
#[derive(Debug, Default)]
pub struct EntityStore {
    entities: SlotMap<EntityId, Entity>,
}

impl EntityStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with room for `capacity` entities
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entities: SlotMap::with_capacity_and_key(capacity),
        }
    }

    /// Take ownership of `entity`, run its `awake` and `init` hooks, return its handle
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = self.entities.insert(entity);
        if let Some(entity) = self.entities.get_mut(id) {
            entity.awake();
            entity.init();
            log::debug!("Spawned entity '{}' as {:?}", entity.name(), id);
        }
        id
    }

    /// Run `destroy` on the entity and hand it back
    ///
    /// The caller is responsible for removing it from any scene graph first.
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let mut entity = self.entities.remove(id)?;
        entity.destroy();
        log::debug!("Despawned entity '{}' ({:?})", entity.name(), id);
        Some(entity)
    }

    /// Whether `id` still refers to a live entity
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(id)
    }

    /// Entity behind `id`
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Mutable entity behind `id`
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// True when no entity is alive
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Live handles, in no particular order
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys()
    }

    /// Live entities with their handles
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &Entity)> {
        self.entities.iter()
    }

    /// Destroy every entity
    pub fn clear(&mut self) {
        for (_, entity) in &mut self.entities {
            entity.destroy();
        }
        self.entities.clear();
    }
}
