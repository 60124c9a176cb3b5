//! Entity implementation
//!
//! An [`Entity`] is a named container of components plus a small table of
//! behavior hooks supplied by its kind. Entities never own other entities;
//! the scene hierarchy is a relation kept in [`HierarchyComponent`]s.

use std::collections::HashMap;
use std::fmt;

use super::component::{Component, ComponentData, ComponentLifecycle, ComponentType};
use super::components::{HierarchyComponent, TransformComponent};
use crate::render::RenderContext;

/// Entity-level errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EntityError {
    /// A component of this type is already attached
    #[error("Entity '{entity}' already has a {component:?} component")]
    DuplicateComponent {
        /// Name of the entity
        entity: String,
        /// Type that was attached twice
        component: ComponentType,
    },
}

/// Tag naming the behavior an entity was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Plain container, lifecycle hooks do nothing
    Empty,
    /// Renderable actor, see [`crate::ecs::actor`]
    Actor,
    /// Application-defined kind
    Custom(&'static str),
}

/// Behavior callbacks for one entity kind
#[derive(Clone, Copy)]
pub struct EntityHooks {
    /// Runs once before `init`
    pub awake: fn(&mut Entity),
    /// Runs once after `awake`
    pub init: fn(&mut Entity),
    /// Runs once per frame
    pub update: fn(&mut Entity, f32, &mut dyn RenderContext),
    /// Runs once per rendered frame
    pub render: fn(&Entity, &mut dyn RenderContext),
    /// Runs before the entity releases its components
    pub destroy: fn(&mut Entity),
}

impl EntityHooks {
    /// Hooks that do nothing; components are not forwarded to
    pub const PASSIVE: Self = Self {
        awake: noop,
        init: noop,
        update: noop_update,
        render: noop_render,
        destroy: noop,
    };
}

impl Default for EntityHooks {
    fn default() -> Self {
        Self::PASSIVE
    }
}

impl fmt::Debug for EntityHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityHooks").finish_non_exhaustive()
    }
}

fn noop(_entity: &mut Entity) {}

fn noop_update(_entity: &mut Entity, _delta_time: f32, _ctx: &mut dyn RenderContext) {}

fn noop_render(_entity: &Entity, _ctx: &mut dyn RenderContext) {}

/// Container of components representing one object in the scene
#[derive(Debug, Clone)]
pub struct Entity {
    name: String,
    active: bool,
    kind: EntityKind,
    hooks: EntityHooks,
    components: Vec<Component>,
    slots: HashMap<ComponentType, usize>,
}

impl Entity {
    /// Create an empty, active entity with passive hooks
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, EntityKind::Empty, EntityHooks::PASSIVE)
    }

    /// Create an entity with the behavior of `kind`
    pub fn with_kind(name: impl Into<String>, kind: EntityKind, hooks: EntityHooks) -> Self {
        Self {
            name: name.into(),
            active: true,
            kind,
            hooks,
            components: Vec::new(),
            slots: HashMap::new(),
        }
    }

    /// Create an entity that already carries a transform and a hierarchy node
    pub fn hierarchy_capable(name: impl Into<String>) -> Self {
        let mut entity = Self::new(name);
        entity.ensure_component::<TransformComponent>();
        entity.ensure_component::<HierarchyComponent>();
        entity
    }

    /// Entity name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rename the entity
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Kind tag
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Inactive entities skip their update and render hooks
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enable or disable update and render hooks
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    // ── Components ───────────────────────────────────────────────────

    /// Attach a component; at most one per type
    ///
    /// The component is initialized on the way in.
    pub fn add_component<T: ComponentData>(&mut self, mut component: T) -> Result<(), EntityError> {
        if self.slots.contains_key(&T::TYPE) {
            return Err(EntityError::DuplicateComponent {
                entity: self.name.clone(),
                component: T::TYPE,
            });
        }
        component.init();
        self.push(component.into());
        Ok(())
    }

    /// Builder pattern: attach a component
    pub fn with_component<T: ComponentData>(mut self, component: T) -> Result<Self, EntityError> {
        self.add_component(component)?;
        Ok(self)
    }

    /// Attach `component`, returning the one it replaced
    pub fn replace_component<T: ComponentData>(&mut self, mut component: T) -> Option<T> {
        component.init();
        match self.get_component_mut::<T>() {
            Some(existing) => Some(std::mem::replace(existing, component)),
            None => {
                self.push(component.into());
                None
            }
        }
    }

    /// Attach a default-initialized `T` unless one exists; returns whether one was added
    pub fn ensure_component<T: ComponentData + Default>(&mut self) -> bool {
        if self.has_component::<T>() {
            return false;
        }
        let mut component = T::default();
        component.init();
        self.push(component.into());
        true
    }

    /// Component of type `T`, if attached
    pub fn get_component<T: ComponentData>(&self) -> Option<&T> {
        let slot = *self.slots.get(&T::TYPE)?;
        self.components.get(slot).and_then(T::from_component)
    }

    /// Mutable component of type `T`, if attached
    pub fn get_component_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        let slot = *self.slots.get(&T::TYPE)?;
        self.components.get_mut(slot).and_then(T::from_component_mut)
    }

    /// Whether a component of type `T` is attached
    pub fn has_component<T: ComponentData>(&self) -> bool {
        self.slots.contains_key(&T::TYPE)
    }

    /// Components in insertion order
    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.iter()
    }

    /// Number of attached components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Run `init` on every component in insertion order
    pub fn init_components(&mut self) {
        for component in &mut self.components {
            component.init();
        }
    }

    /// Run `update` on every component in insertion order
    pub fn update_components(&mut self, delta_time: f32) {
        for component in &mut self.components {
            component.update(delta_time);
        }
    }

    /// Run `render` on every component in insertion order
    pub fn render_components(&self, ctx: &mut dyn RenderContext) {
        for component in &self.components {
            component.render(ctx);
        }
    }

    fn push(&mut self, component: Component) {
        self.slots.insert(component.component_type(), self.components.len());
        self.components.push(component);
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Run the kind's `awake` hook
    pub fn awake(&mut self) {
        let hook = self.hooks.awake;
        hook(self);
    }

    /// Run the kind's `init` hook
    pub fn init(&mut self) {
        let hook = self.hooks.init;
        hook(self);
    }

    /// Run the kind's `update` hook if active
    pub fn update(&mut self, delta_time: f32, ctx: &mut dyn RenderContext) {
        if !self.active {
            return;
        }
        let hook = self.hooks.update;
        hook(self, delta_time, ctx);
    }

    /// Run the kind's `render` hook if active
    pub fn render(&self, ctx: &mut dyn RenderContext) {
        if self.active {
            (self.hooks.render)(self, ctx);
        }
    }

    /// Run the kind's `destroy` hook, then destroy and drop every component
    pub fn destroy(&mut self) {
        let hook = self.hooks.destroy;
        hook(self);

        for component in &mut self.components {
            component.destroy();
        }
        self.components.clear();
        self.slots.clear();
    }
}
