//! Scene management
//!
//! The [`SceneGraph`] keeps the parent/child relation between entities valid
//! and turns local transforms into world matrices each frame. The
//! [`SceneManager`] owns the entities a graph refers to.
//!
//! ## Frame
//!
//! ```text
//! update:  entity hooks (registration order) ──► world matrices (roots first, depth-first)
//! render:  entity hooks (registration order)
//! ```

mod scene_graph;
mod scene_manager;

pub use scene_graph::SceneGraph;
pub use scene_manager::SceneManager;
