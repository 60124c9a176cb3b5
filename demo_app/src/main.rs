//! Headless orrery demo
//!
//! Builds a small solar system out of nested pivots, spins the pivots for a
//! fixed number of frames and reports where every body ended up. Draws go to a
//! recording context instead of a GPU.
//!
//! Usage: `orrery_demo [engine_config.toml|.ron]`

use monaco_engine::config::{Config, ConfigError, EngineConfig};
use monaco_engine::ecs::components::{MaterialComponent, MeshComponent, TransformComponent};
use monaco_engine::ecs::{Actor, Entity, EntityId};
use monaco_engine::foundation::logging;
use monaco_engine::foundation::math::{Vec3, Vec4};
use monaco_engine::render::RecordingContext;
use monaco_engine::scene::SceneManager;
use rand::prelude::*;

const FRAME_COUNT: usize = 240;
const FRAME_TIME: f32 = 1.0 / 60.0;
const MAX_MOONS: usize = 3;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// A pivot that turns around its local Y axis every frame
struct Orbit {
    pivot: EntityId,
    angular_speed: f32,
}

struct OrreryApp {
    scene: SceneManager,
    orbits: Vec<Orbit>,
    bodies: Vec<EntityId>,
    ctx: RecordingContext,
}

impl OrreryApp {
    fn new(config: &EngineConfig) -> Self {
        Self {
            scene: SceneManager::with_config(config),
            orbits: Vec::new(),
            bodies: Vec::new(),
            ctx: RecordingContext::new(),
        }
    }

    fn build(&mut self) {
        let mut rng = thread_rng();

        let sun = self.spawn_body("sun", None, Vec3::zeros(), 3.0, Vec4::new(1.0, 0.8, 0.2, 1.0));
        let planets = [("mercury", 6.0, 1.6), ("venus", 9.0, 1.2), ("earth", 13.0, 1.0), ("mars", 17.0, 0.8)];

        for (name, distance, speed) in planets {
            let pivot = self.spawn_pivot(&format!("{name}_orbit"), sun, speed);
            let planet = self.spawn_body(
                name,
                Some(pivot),
                Vec3::new(distance, 0.0, 0.0),
                rng.gen_range(0.4..1.2),
                Vec4::new(rng.gen(), rng.gen(), rng.gen(), 1.0),
            );

            for i in 0..rng.gen_range(0..=MAX_MOONS) {
                let moon_pivot = self.spawn_pivot(&format!("{name}_moon{i}_orbit"), planet, rng.gen_range(2.0..6.0));
                self.spawn_body(
                    &format!("{name}_moon{i}"),
                    Some(moon_pivot),
                    Vec3::new(rng.gen_range(1.5..3.0), 0.0, 0.0),
                    0.25,
                    Vec4::new(0.7, 0.7, 0.7, 1.0),
                );
            }
        }

        log::info!(
            "Built orrery: {} entities, {} bodies, {} orbits",
            self.scene.entity_count(),
            self.bodies.len(),
            self.orbits.len()
        );
    }

    fn spawn_pivot(&mut self, name: &str, parent: EntityId, angular_speed: f32) -> EntityId {
        let pivot = self.scene.spawn_child(Entity::new(name), parent);
        self.orbits.push(Orbit { pivot, angular_speed });
        pivot
    }

    fn spawn_body(&mut self, name: &str, parent: Option<EntityId>, offset: Vec3, radius: f32, color: Vec4) -> EntityId {
        let mut actor = Actor::with_mesh(name, MeshComponent::quad(format!("{name}_mesh")));
        Actor::set_material(&mut actor, MaterialComponent::new(format!("{name}_mat")).with_base_color(color));
        if let Some(transform) = actor.get_component_mut::<TransformComponent>() {
            transform.set_position(offset);
            transform.set_scale(Vec3::new(radius, radius, radius));
        }

        let id = match parent {
            Some(parent) => self.scene.spawn_child(actor, parent),
            None => self.scene.spawn(actor),
        };
        self.bodies.push(id);
        id
    }

    fn run(&mut self) {
        for frame in 0..FRAME_COUNT {
            self.advance_orbits(FRAME_TIME);

            self.ctx.clear();
            self.scene.update(FRAME_TIME, &mut self.ctx);
            self.scene.render(&mut self.ctx);

            if frame % 60 == 0 {
                log::debug!("Frame {}: {} draws", frame, self.ctx.draws().len());
            }
        }
    }

    fn advance_orbits(&mut self, delta_time: f32) {
        for orbit in &self.orbits {
            if let Some(transform) = self
                .scene
                .entity_mut(orbit.pivot)
                .and_then(|e| e.get_component_mut::<TransformComponent>())
            {
                let rotation = transform.rotation() + Vec3::new(0.0, orbit.angular_speed * delta_time, 0.0);
                transform.set_rotation(rotation);
            }
        }
    }

    fn report(&self) {
        let graph = self.scene.graph();
        let store = self.scene.store();

        for (id, depth) in graph.walk_depth_first(store) {
            let Some(entity) = store.get(id) else { continue };
            if !self.bodies.contains(&id) {
                continue;
            }
            let position = entity
                .get_component::<TransformComponent>()
                .map_or_else(Vec3::zeros, TransformComponent::world_position);
            log::info!(
                "{:indent$}{} at ({:.2}, {:.2}, {:.2})",
                "",
                entity.name(),
                position.x,
                position.y,
                position.z,
                indent = depth * 2
            );
        }
        log::info!("Last frame submitted {} draws", self.ctx.draws().len());
    }

    fn shutdown(&mut self) {
        self.scene.shutdown();
    }
}

fn load_config() -> Result<EngineConfig, DemoError> {
    let config = match std::env::args().nth(1) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config()?;
    logging::init_from_config(&config);

    log::info!("Starting orrery demo ({} frames)", FRAME_COUNT);

    let mut app = OrreryApp::new(&config);
    app.build();
    app.run();
    app.report();
    app.shutdown();

    log::info!("Orrery demo completed successfully");
    Ok(())
}
