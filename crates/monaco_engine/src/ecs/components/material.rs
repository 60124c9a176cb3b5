//! Material component

use crate::ecs::component::{ComponentLifecycle, ComponentType};
use crate::foundation::math::Vec4;

/// Surface description consumed by the rendering backend
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialComponent {
    /// Material identifier
    pub name: String,
    /// Linear RGBA tint
    pub base_color: Vec4,
    /// Texture names bound in slot order (albedo first)
    pub textures: Vec<String>,
}

impl Default for MaterialComponent {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color: Vec4::new(1.0, 1.0, 1.0, 1.0),
            textures: Vec::new(),
        }
    }
}

impl MaterialComponent {
    /// Create a white, untextured material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder pattern: Set base color
    pub fn with_base_color(mut self, color: Vec4) -> Self {
        self.base_color = color;
        self
    }

    /// Builder pattern: Append a texture slot
    pub fn with_texture(mut self, texture: impl Into<String>) -> Self {
        self.textures.push(texture.into());
        self
    }

    /// Texture in the albedo slot, if any
    pub fn albedo(&self) -> Option<&str> {
        self.textures.first().map(String::as_str)
    }
}

impl ComponentLifecycle for MaterialComponent {
    fn component_type(&self) -> ComponentType {
        ComponentType::Material
    }

    fn destroy(&mut self) {
        self.textures.clear();
    }
}
