//! Rendering backend contract
//!
//! The scene core never talks to a graphics API. Entity and component render
//! hooks receive a `&mut dyn RenderContext` and forward it unchanged; only
//! entity kinds that actually draw (see [`crate::ecs::actor`]) call into it.

use crate::ecs::components::{MaterialComponent, MeshComponent};
use crate::foundation::math::Mat4;

/// A single indexed draw request
#[derive(Debug, Clone, Copy)]
pub struct DrawCall<'a> {
    /// Name of the entity issuing the draw
    pub label: &'a str,
    /// Geometry to draw
    pub mesh: &'a MeshComponent,
    /// Surface description, if the entity has one
    pub material: Option<&'a MaterialComponent>,
    /// Column-major world matrix produced by transform propagation
    pub world: Mat4,
}

/// Opaque handle to a rendering backend
pub trait RenderContext {
    /// Submit one draw
    fn draw(&mut self, call: DrawCall<'_>);
}

/// Context that discards every draw
#[derive(Debug, Default, Clone, Copy)]
pub struct NullContext;

impl RenderContext for NullContext {
    fn draw(&mut self, _call: DrawCall<'_>) {}
}

/// Summary of a submitted draw, kept by [`RecordingContext`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    /// Name of the entity issuing the draw
    pub label: String,
    /// Name of the mesh
    pub mesh: String,
    /// Number of indices submitted
    pub index_count: usize,
    /// Name of the material, if any
    pub material: Option<String>,
    /// World matrix at submission time
    pub world: Mat4,
}

/// Headless context that records draws instead of executing them
#[derive(Debug, Default, Clone)]
pub struct RecordingContext {
    draws: Vec<RecordedDraw>,
}

impl RecordingContext {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws recorded since the last [`RecordingContext::clear`]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Forget recorded draws, typically once per frame
    pub fn clear(&mut self) {
        self.draws.clear();
    }
}

impl RenderContext for RecordingContext {
    fn draw(&mut self, call: DrawCall<'_>) {
        log::trace!("draw '{}' ({} indices)", call.label, call.mesh.index_count());
        self.draws.push(RecordedDraw {
            label: call.label.to_string(),
            mesh: call.mesh.name.clone(),
            index_count: call.mesh.index_count(),
            material: call.material.map(|m| m.name.clone()),
            world: call.world,
        });
    }
}
