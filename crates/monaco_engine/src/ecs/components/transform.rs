//! Transform component
//!
//! Local spatial state of an entity and the matrices derived from it:
//! - the local matrix, always `T * Rz * Ry * Rx * S` of the stored vectors
//! - the world matrix, written by [`crate::scene::SceneGraph::update`]

use crate::ecs::component::{ComponentLifecycle, ComponentType};
use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Local position, Euler rotation (radians, XYZ) and scale of an entity
///
/// Setters store values verbatim (no angle wrapping) and refresh the cached
/// local matrix immediately, so the matrix never disagrees with the vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    position: Vec3,
    rotation: Vec3,
    scale: Vec3,
    matrix: Mat4,
    world: Mat4,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            matrix: Mat4::identity(),
            world: Mat4::identity(),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from position only
    pub fn from_position(position: Vec3) -> Self {
        Self::default().with_position(position)
    }

    /// Create from full transform specification
    pub fn from_components(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        let mut transform = Self::default();
        transform.set_transform(position, rotation, scale);
        transform
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.set_position(position);
        self
    }

    /// Builder pattern: Set rotation from Euler angles (radians, XYZ order)
    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.set_rotation(rotation);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.set_scale(scale);
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::new(scale, scale, scale))
    }

    /// Local position
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Local rotation in radians
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Local scale
    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    /// Set local position
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
        self.recompute();
    }

    /// Set local rotation in radians
    pub fn set_rotation(&mut self, rotation: Vec3) {
        self.rotation = rotation;
        self.recompute();
    }

    /// Set local scale
    pub fn set_scale(&mut self, scale: Vec3) {
        self.scale = scale;
        self.recompute();
    }

    /// Set position, rotation and scale at once
    pub fn set_transform(&mut self, position: Vec3, rotation: Vec3, scale: Vec3) {
        self.position = position;
        self.rotation = rotation;
        self.scale = scale;
        self.recompute();
    }

    /// Move relative to the current local position
    pub fn translate(&mut self, delta: Vec3) {
        self.position += delta;
        self.recompute();
    }

    /// Replace the local state with the decomposition of `matrix`
    ///
    /// Used by manipulation tools that edit a composed matrix and write the
    /// result back through the setters.
    pub fn set_from_matrix(&mut self, matrix: &Mat4) {
        let (position, rotation, scale) = matrix.to_local_components();
        self.set_transform(position, rotation, scale);
    }

    /// Cached local matrix
    pub fn local_matrix(&self) -> &Mat4 {
        &self.matrix
    }

    /// World matrix from the last scene graph propagation
    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// World-space position from the last propagation
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.world.m14, self.world.m24, self.world.m34)
    }

    pub(crate) fn set_world_matrix(&mut self, world: Mat4) {
        self.world = world;
    }

    fn recompute(&mut self) {
        self.matrix = Mat4::from_local_components(&self.position, &self.rotation, &self.scale);
    }
}

impl ComponentLifecycle for TransformComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Transform
    }

    fn init(&mut self) {
        self.recompute();
        self.world = self.matrix;
    }

    fn update(&mut self, _delta_time: f32) {
        self.recompute();
    }
}
