//! Actor entity kind
//!
//! A renderable entity: owns a transform and a mesh, optionally a material.
//! Updates are forwarded to every component; rendering submits one draw with
//! the world matrix written by the last scene graph propagation.

use super::components::{MaterialComponent, MeshComponent, TransformComponent};
use super::entity::{Entity, EntityHooks, EntityKind};
use crate::render::{DrawCall, RenderContext};

/// Hook table shared by every actor
pub const ACTOR_HOOKS: EntityHooks = EntityHooks {
    awake: actor_awake,
    init: actor_init,
    update: actor_update,
    render: actor_render,
    destroy: actor_destroy,
};

/// Constructors for actor entities
pub struct Actor;

impl Actor {
    /// Actor with an identity transform and an empty mesh
    pub fn new(name: impl Into<String>) -> Entity {
        Self::with_mesh(name, MeshComponent::default())
    }

    /// Actor drawing `mesh`
    pub fn with_mesh(name: impl Into<String>, mesh: MeshComponent) -> Entity {
        let mut entity = Entity::with_kind(name, EntityKind::Actor, ACTOR_HOOKS);
        entity.ensure_component::<TransformComponent>();
        entity.replace_component(mesh);
        entity
    }

    /// Swap the mesh an actor draws, returning the previous one
    pub fn set_mesh(entity: &mut Entity, mesh: MeshComponent) -> Option<MeshComponent> {
        if !mesh.indices_in_bounds() {
            log::warn!(
                "Mesh '{}' on '{}' has indices past its {} vertices",
                mesh.name,
                entity.name(),
                mesh.vertex_count()
            );
        }
        entity.replace_component(mesh)
    }

    /// Swap the material an actor draws with, returning the previous one
    pub fn set_material(entity: &mut Entity, material: MaterialComponent) -> Option<MaterialComponent> {
        entity.replace_component(material)
    }
}

fn actor_awake(entity: &mut Entity) {
    log::trace!("Actor '{}' awake", entity.name());
}

fn actor_init(entity: &mut Entity) {
    // World matrices fall back to local until the next propagation.
    entity.init_components();
}

fn actor_update(entity: &mut Entity, delta_time: f32, _ctx: &mut dyn RenderContext) {
    entity.update_components(delta_time);
}

fn actor_render(entity: &Entity, ctx: &mut dyn RenderContext) {
    let (Some(mesh), Some(transform)) = (
        entity.get_component::<MeshComponent>(),
        entity.get_component::<TransformComponent>(),
    ) else {
        return;
    };
    if mesh.is_empty() {
        return;
    }

    ctx.draw(DrawCall {
        label: entity.name(),
        mesh,
        material: entity.get_component::<MaterialComponent>(),
        world: *transform.world_matrix(),
    });
}

fn actor_destroy(entity: &mut Entity) {
    if let Some(mesh) = entity.get_component::<MeshComponent>() {
        log::debug!(
            "Releasing actor '{}' ({} vertices, {} indices)",
            entity.name(),
            mesh.vertex_count(),
            mesh.index_count()
        );
    }
}
