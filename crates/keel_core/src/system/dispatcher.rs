//! # System Dispatcher
//!
//! Owns the systems of one entity manager, runs them in registration order
//! and records how long each one took.

use std::time::{Duration, Instant};

use super::commands::Commands;
use super::context::SystemContext;
use super::System;
use crate::config::EcsConfig;
use crate::ecs::{Aspect, Components, Entity, Schema};

/// Wall-clock time of one system's last update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameTime {
    /// [`System::name`] of the system.
    pub name: &'static str,
    /// Duration of its most recent update.
    pub elapsed: Duration,
}

impl FrameTime {
    /// Elapsed time in whole microseconds.
    #[inline]
    #[must_use]
    pub fn elapsed_micros(&self) -> u64 {
        u64::try_from(self.elapsed.as_micros()).unwrap_or(u64::MAX)
    }
}

/// Ordered, fixed list of systems.
///
/// Systems are added with [`SystemDispatcher::with_system`] before the
/// dispatcher is handed to an
/// [`EntityManager`](crate::ecs::EntityManager); the list cannot change
/// afterwards.
pub struct SystemDispatcher<S: Schema> {
    systems: Vec<Box<dyn System<S>>>,
    /// One entry per system, same order.
    frame_times: Vec<FrameTime>,
    slow_system_budget: Option<Duration>,
}

impl<S: Schema> SystemDispatcher<S> {
    /// Creates a dispatcher without systems.
    #[must_use]
    pub fn new() -> Self {
        Self {
            systems: Vec::new(),
            frame_times: Vec::new(),
            slow_system_budget: None,
        }
    }

    /// Creates a dispatcher that warns about systems over the configured budget.
    #[must_use]
    pub fn with_config(config: &EcsConfig) -> Self {
        Self {
            slow_system_budget: config.slow_system_budget(),
            ..Self::new()
        }
    }

    /// Sets the time above which a system's update is logged at `warn`.
    #[must_use]
    pub fn with_slow_system_budget(mut self, budget: Option<Duration>) -> Self {
        self.slow_system_budget = budget;
        self
    }

    /// Current slow-system budget.
    #[inline]
    #[must_use]
    pub fn slow_system_budget(&self) -> Option<Duration> {
        self.slow_system_budget
    }

    /// Appends `system`. Systems run in the order they are added.
    #[must_use]
    pub fn with_system<T: System<S>>(mut self, system: T) -> Self {
        self.frame_times.push(FrameTime {
            name: system.name(),
            elapsed: Duration::ZERO,
        });
        self.systems.push(Box::new(system));
        self
    }

    /// Number of systems.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether there are no systems.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Runs every system once, in order, timing each.
    pub fn update(&mut self, delta: f32, components: &mut Components<S>, commands: &mut Commands<S>) {
        for (system, frame_time) in self.systems.iter_mut().zip(&mut self.frame_times) {
            let mut ctx = SystemContext::new(components, commands);

            let start = Instant::now();
            system.update(delta, &mut ctx);
            let elapsed = start.elapsed();

            frame_time.elapsed = elapsed;
            tracing::trace!(
                system = frame_time.name,
                micros = frame_time.elapsed_micros(),
                "system updated"
            );

            if let Some(budget) = self.slow_system_budget {
                if elapsed > budget {
                    tracing::warn!(
                        system = frame_time.name,
                        micros = frame_time.elapsed_micros(),
                        budget_micros = u64::try_from(budget.as_micros()).unwrap_or(u64::MAX),
                        "system exceeded its time budget"
                    );
                }
            }
        }
    }

    /// Forwards an aspect change to every system, in order.
    ///
    /// `components` still holds the entity's data as of `new`, or as of
    /// `old` when the entity is being destroyed.
    ///
    /// A filter that is out of sync is a bug in whoever changed the entity
    /// without reporting it. It is logged, and panics in debug builds.
    pub fn broadcast_entity_changed(
        &mut self,
        entity: Entity,
        old: Aspect,
        new: Aspect,
        components: &Components<S>,
    ) {
        for system in &mut self.systems {
            if let Err(err) = system.on_entity_changed(entity, old, new, components) {
                tracing::error!(system = system.name(), %err, "filter membership out of sync");
                if cfg!(debug_assertions) {
                    panic!("{}: {err}", system.name());
                }
            }
        }
    }

    /// Timings of the last update, one per system in registration order.
    #[inline]
    #[must_use]
    pub fn frame_times(&self) -> &[FrameTime] {
        &self.frame_times
    }

    /// System at `index`.
    #[must_use]
    pub fn system(&self, index: usize) -> Option<&dyn System<S>> {
        self.systems.get(index).map(|system| &**system)
    }

    /// First system of concrete type `T`.
    #[must_use]
    pub fn system_of<T: System<S>>(&self) -> Option<&T> {
        self.systems
            .iter()
            .find_map(|system| (**system).as_any().downcast_ref::<T>())
    }

    /// Mutable first system of concrete type `T`.
    pub fn system_of_mut<T: System<S>>(&mut self) -> Option<&mut T> {
        self.systems
            .iter_mut()
            .find_map(|system| (**system).as_any_mut().downcast_mut::<T>())
    }
}

impl<S: Schema> Default for SystemDispatcher<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> std::fmt::Debug for SystemDispatcher<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemDispatcher")
            .field("systems", &self.frame_times.iter().map(|t| t.name).collect::<Vec<_>>())
            .finish()
    }
}
