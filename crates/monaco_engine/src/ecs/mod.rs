//! Entity-Component implementation
//!
//! Entities are component containers stored in an [`EntityStore`] and named by
//! [`EntityId`] handles. Behavior differs per [`EntityKind`] through a table of
//! hook functions rather than a type hierarchy.

pub mod actor;
pub mod component;
pub mod components;
pub mod entity;
pub mod store;

pub use actor::Actor;
pub use component::{Component, ComponentData, ComponentLifecycle, ComponentType};
pub use entity::{Entity, EntityError, EntityHooks, EntityKind};
pub use store::{EntityId, EntityStore};
