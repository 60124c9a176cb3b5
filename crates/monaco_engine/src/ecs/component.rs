//! Component trait and implementations
//!
//! Components are stored per entity as a closed [`Component`] enum. Typed access
//! goes through [`ComponentData`], which pairs each concrete component with its
//! [`ComponentType`] tag so lookups never need runtime type inspection.

use super::components::{HierarchyComponent, MaterialComponent, MeshComponent, TransformComponent};
use crate::render::RenderContext;

/// Discriminating tag for component kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum ComponentType {
    /// Untagged
    #[default]
    None,
    /// Local position/rotation/scale
    Transform,
    /// Geometry record
    Mesh,
    /// Surface description
    Material,
    /// Parent/child adjacency
    Hierarchy,
}

/// Lifecycle hooks shared by every component
pub trait ComponentLifecycle {
    /// Tag of this component
    fn component_type(&self) -> ComponentType;

    /// Called once when the component is attached by the engine
    fn init(&mut self) {}

    /// Called once per frame by entity kinds that forward updates
    fn update(&mut self, _delta_time: f32) {}

    /// Called during the render phase by entity kinds that forward renders
    fn render(&self, _ctx: &mut dyn RenderContext) {}

    /// Release owned data
    fn destroy(&mut self) {}
}

/// A component owned by an entity
#[derive(Debug, Clone)]
pub enum Component {
    /// See [`TransformComponent`]
    Transform(TransformComponent),
    /// See [`MeshComponent`]
    Mesh(MeshComponent),
    /// See [`MaterialComponent`]
    Material(MaterialComponent),
    /// See [`HierarchyComponent`]
    Hierarchy(HierarchyComponent),
}

impl Component {
    fn as_lifecycle(&self) -> &dyn ComponentLifecycle {
        match self {
            Self::Transform(c) => c,
            Self::Mesh(c) => c,
            Self::Material(c) => c,
            Self::Hierarchy(c) => c,
        }
    }

    fn as_lifecycle_mut(&mut self) -> &mut dyn ComponentLifecycle {
        match self {
            Self::Transform(c) => c,
            Self::Mesh(c) => c,
            Self::Material(c) => c,
            Self::Hierarchy(c) => c,
        }
    }
}

impl ComponentLifecycle for Component {
    fn component_type(&self) -> ComponentType {
        self.as_lifecycle().component_type()
    }

    fn init(&mut self) {
        self.as_lifecycle_mut().init();
    }

    fn update(&mut self, delta_time: f32) {
        self.as_lifecycle_mut().update(delta_time);
    }

    fn render(&self, ctx: &mut dyn RenderContext) {
        self.as_lifecycle().render(ctx);
    }

    fn destroy(&mut self) {
        self.as_lifecycle_mut().destroy();
    }
}

/// Typed view over one [`Component`] variant
///
/// Only the concrete component types in this crate implement it, so asking an
/// entity for anything else is a compile error rather than a failed lookup.
pub trait ComponentData: ComponentLifecycle + Into<Component> + 'static {
    /// Tag shared by every instance of this type
    const TYPE: ComponentType;

    /// Borrow `component` as `Self` if the variant matches
    fn from_component(component: &Component) -> Option<&Self>;

    /// Mutably borrow `component` as `Self` if the variant matches
    fn from_component_mut(component: &mut Component) -> Option<&mut Self>;
}

macro_rules! impl_component_data {
    ($ty:ty, $variant:ident) => {
        impl From<$ty> for Component {
            fn from(component: $ty) -> Self {
                Component::$variant(component)
            }
        }

        impl ComponentData for $ty {
            const TYPE: ComponentType = ComponentType::$variant;

            fn from_component(component: &Component) -> Option<&Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }

            fn from_component_mut(component: &mut Component) -> Option<&mut Self> {
                match component {
                    Component::$variant(c) => Some(c),
                    _ => None,
                }
            }
        }
    };
}

impl_component_data!(TransformComponent, Transform);
impl_component_data!(MeshComponent, Mesh);
impl_component_data!(MaterialComponent, Material);
impl_component_data!(HierarchyComponent, Hierarchy);
