//! Hierarchy component
//!
//! Tree adjacency of one entity. Only stores handles; keeping the parent and
//! child sides consistent is the job of [`crate::scene::SceneGraph`].

use crate::ecs::component::{ComponentLifecycle, ComponentType};
use crate::ecs::EntityId;

/// Parent back-reference and ordered child list of one node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyComponent {
    parent: Option<EntityId>,
    children: Vec<EntityId>,
}

impl HierarchyComponent {
    /// Create a root node with no children
    pub fn new() -> Self {
        Self::default()
    }

    /// Current parent, `None` for roots
    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Children in insertion order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Overwrite the parent without touching either parent's child list
    pub fn set_parent(&mut self, parent: Option<EntityId>) {
        self.parent = parent;
    }

    /// Append `child` unless it is already listed
    pub fn add_child(&mut self, child: EntityId) {
        if !self.children.contains(&child) {
            self.children.push(child);
        }
    }

    /// Remove `child` if listed
    pub fn remove_child(&mut self, child: EntityId) {
        self.children.retain(|c| *c != child);
    }

    /// Whether `child` is listed
    pub fn has_child(&self, child: EntityId) -> bool {
        self.children.contains(&child)
    }

    /// True when there is no parent
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// True when at least one child is listed
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    pub(crate) fn take_children(&mut self) -> Vec<EntityId> {
        std::mem::take(&mut self.children)
    }
}

impl ComponentLifecycle for HierarchyComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Hierarchy
    }

    /// Forget both sides of the adjacency; children are not notified.
    fn destroy(&mut self) {
        self.children.clear();
        self.parent = None;
    }
}
