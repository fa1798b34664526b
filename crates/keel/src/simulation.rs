//! # Simulation
//!
//! Builds the entity manager with the sample systems, spawns a population
//! and advances it with a fixed time step.

use std::f32::consts::TAU;

use keel_core::{EntityManager, FrameTime, SystemDispatcher, UsageStats};

use crate::components::{Audible, Collidable, GameSchema, Kinematic, Transformable};
use crate::config::SimulationConfig;
use crate::systems::{ArenaBounds, AudioTrigger, Collision, Movement};

/// Golden angle in radians, spreads spawn points evenly on a disc.
const GOLDEN_ANGLE: f32 = 2.399_963;

/// A running sample simulation.
pub struct Simulation {
    manager: EntityManager<GameSchema>,
    step: f32,
    frame: u64,
}

impl Simulation {
    /// Builds the manager and registers the systems.
    #[must_use]
    pub fn new(config: &SimulationConfig) -> Self {
        let dispatcher = SystemDispatcher::with_config(&config.ecs)
            .with_system(Movement::new())
            .with_system(Collision::new())
            .with_system(AudioTrigger::new())
            .with_system(ArenaBounds::new(config.arena_half_extent));

        Self {
            manager: EntityManager::with_config(&config.ecs, dispatcher),
            step: config.step(),
            frame: 0,
        }
    }

    /// Spawns `count` entities on a spiral, moving outwards.
    ///
    /// Every entity moves and collides; every third one also makes a sound
    /// and every fifth one is a static obstacle.
    #[allow(clippy::cast_precision_loss)]
    pub fn populate(&mut self, count: usize) {
        for i in 0..count {
            let angle = i as f32 * GOLDEN_ANGLE % TAU;
            let distance = (i as f32).sqrt() * 4.0;
            let (sin, cos) = angle.sin_cos();
            let transform = Transformable::at(cos * distance, sin * distance);
            let body = Collidable::sphere(1.5);

            let entity = if i % 5 == 0 {
                self.manager.create_entity((transform, body))
            } else {
                let kinematic = Kinematic {
                    velocity: [cos * 20.0, sin * 20.0],
                    acceleration: [0.0, 0.0],
                };
                self.manager.create_entity((transform, kinematic, body))
            };

            if i % 3 == 0 {
                self.manager.add_components(
                    entity,
                    (Audible {
                        pcm_unit: i32::try_from(i % 8).unwrap_or(0),
                        ..Audible::default()
                    },),
                );
            }
        }
        tracing::info!(entities = self.manager.entity_count(), "population spawned");
    }

    /// Advances one fixed step.
    pub fn tick(&mut self) {
        self.manager.update(self.step);
        self.frame += 1;
    }

    /// Runs `frames` fixed steps.
    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.tick();
        }
    }

    /// Frames advanced so far.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// The entity manager.
    #[must_use]
    pub fn manager(&self) -> &EntityManager<GameSchema> {
        &self.manager
    }

    /// Mutable access to the entity manager.
    pub fn manager_mut(&mut self) -> &mut EntityManager<GameSchema> {
        &mut self.manager
    }

    /// Per-system timings of the last frame.
    #[must_use]
    pub fn frame_times(&self) -> &[FrameTime] {
        self.manager.dispatcher().frame_times()
    }

    /// Storage usage of the entity table and every store.
    #[must_use]
    pub fn data_use(&self) -> Vec<UsageStats> {
        self.manager.data_use()
    }

    /// Logs frame times, storage use and system counters at `info`.
    pub fn report(&self) {
        tracing::info!(frame = self.frame, entities = self.manager.entity_count(), "report");
        for time in self.frame_times() {
            tracing::info!(system = time.name, micros = time.elapsed_micros(), "frame time");
        }
        for usage in self.data_use() {
            tracing::info!("{usage}");
        }
        if let Some(collision) = self.manager.system::<Collision>() {
            tracing::info!(contacts = collision.contacts(), "collision");
        }
        if let Some(audio) = self.manager.system::<AudioTrigger>() {
            tracing::info!(started = audio.started(), cut_off = audio.cut_off(), "audio");
        }
        if let Some(bounds) = self.manager.system::<ArenaBounds>() {
            tracing::info!(respawned = bounds.respawned(), "arena");
        }
    }
}
