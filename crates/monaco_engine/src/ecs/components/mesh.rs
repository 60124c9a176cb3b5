//! Mesh component
//!
//! CPU-side geometry record. Asset importers produce these; the scene core
//! neither knows nor cares how the data arrived.

use crate::ecs::component::{ComponentLifecycle, ComponentType};

/// Vertex with position, normal, and texture coordinate data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vertex {
    /// Position in 3D space
    pub position: [f32; 3],

    /// Normal vector
    pub normal: [f32; 3],

    /// Texture coordinates
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub fn new(position: [f32; 3], normal: [f32; 3], tex_coord: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            tex_coord,
        }
    }
}

/// Geometry of one drawable: vertices plus triangle-list indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshComponent {
    /// Identifier of the mesh, usually the imported object name
    pub name: String,

    /// Vertex data
    pub vertices: Vec<Vertex>,

    /// Index data for triangles
    pub indices: Vec<u32>,
}

impl MeshComponent {
    /// Create an empty mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a mesh from existing geometry
    pub fn with_geometry(name: impl Into<String>, vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            vertices,
            indices,
        }
    }

    /// Unit quad in the XY plane facing +Z
    pub fn quad(name: impl Into<String>) -> Self {
        let normal = [0.0, 0.0, 1.0];
        let vertices = vec![
            Vertex::new([-0.5, -0.5, 0.0], normal, [0.0, 1.0]),
            Vertex::new([0.5, -0.5, 0.0], normal, [1.0, 1.0]),
            Vertex::new([0.5, 0.5, 0.0], normal, [1.0, 0.0]),
            Vertex::new([-0.5, 0.5, 0.0], normal, [0.0, 0.0]),
        ];
        Self::with_geometry(name, vertices, vec![0, 1, 2, 2, 3, 0])
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of indices
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of complete triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the mesh has nothing to draw
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether every index points at an existing vertex
    pub fn indices_in_bounds(&self) -> bool {
        let count = self.vertices.len();
        self.indices.iter().all(|&i| (i as usize) < count)
    }
}

impl ComponentLifecycle for MeshComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Mesh
    }

    fn destroy(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }
}
