//! ECS Components module
//!
//! Concrete component kinds an entity can own, at most one of each.

pub mod hierarchy;
pub mod material;
pub mod mesh;
pub mod transform;

pub use hierarchy::HierarchyComponent;
pub use material::MaterialComponent;
pub use mesh::{MeshComponent, Vertex};
pub use transform::TransformComponent;
