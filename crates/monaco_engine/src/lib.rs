//! # Monaco Engine
//!
//! Scene core of a real-time 3D engine: an entity/component model, a
//! hierarchical scene graph and per-frame transform propagation.
//!
//! ## Features
//!
//! - **Entities**: named component containers with per-kind lifecycle hooks
//! - **Transforms**: position / Euler rotation / scale with an eagerly cached local matrix
//! - **Scene Graph**: acyclic parent/child hierarchy with world-matrix propagation
//! - **Backend-agnostic rendering**: draws go through a [`render::RenderContext`]
//!
//! ## Quick Start
//!
//! ```rust
//! use monaco_engine::prelude::*;
//!
//! let mut scene = SceneManager::new();
//! let sun = scene.spawn(Entity::new("sun"));
//! let earth = scene.spawn_child(Actor::with_mesh("earth", MeshComponent::quad("earth")), sun);
//!
//! if let Some(t) = scene.entity_mut(earth).and_then(|e| e.get_component_mut::<TransformComponent>()) {
//!     t.set_position(Vec3::new(10.0, 0.0, 0.0));
//! }
//!
//! let mut ctx = RecordingContext::new();
//! scene.update(0.016, &mut ctx);
//! scene.render(&mut ctx);
//! assert_eq!(ctx.draws().len(), 1);
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod ecs;
pub mod foundation;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, EngineConfig, SceneGraphConfig},
        ecs::{
            components::{HierarchyComponent, MaterialComponent, MeshComponent, TransformComponent, Vertex},
            Actor, Component, ComponentLifecycle, ComponentType, Entity, EntityError, EntityHooks, EntityId,
            EntityKind, EntityStore,
        },
        foundation::math::{Mat4, Mat4Ext, Vec3, Vec4},
        render::{DrawCall, NullContext, RecordingContext, RenderContext},
        scene::{SceneGraph, SceneManager},
    };
}
