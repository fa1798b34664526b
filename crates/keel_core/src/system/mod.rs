//! # Systems
//!
//! A system owns one or more [`AspectFilter`]s and an update routine. The
//! [`SystemDispatcher`] runs systems in registration order once per frame
//! and forwards every entity change notification to each of them.
//!
//! ```text
//! EntityManager ──notify(entity, old, new)──▶ SystemDispatcher
//!                                               │ for each system, in order
//!                                               ▼
//!                                        System::on_entity_changed
//!                                               │
//!                                               ▼
//!                                        FilterSet / AspectFilter
//! ```

mod commands;
mod context;
mod dispatcher;
mod filter;

pub use commands::Commands;
pub use context::SystemContext;
pub use dispatcher::{FrameTime, SystemDispatcher};
pub use filter::{AspectFilter, FilterSet, MembershipError};

use std::any::Any;

use crate::ecs::{Aspect, Components, Entity, Schema};

/// Upcast to [`Any`], used to look systems up by concrete type.
pub trait AsAny: Any {
    /// `self` as `&dyn Any`.
    fn as_any(&self) -> &dyn Any;
    /// `self` as `&mut dyn Any`.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Per-frame logic over the entities selected by its filters.
///
/// # Example
///
/// ```rust,ignore
/// struct Movement {
///     filters: FilterSet,
/// }
///
/// impl System<GameSchema> for Movement {
///     fn name(&self) -> &'static str {
///         "Movement"
///     }
///
///     fn filters(&self) -> &FilterSet {
///         &self.filters
///     }
///
///     fn filters_mut(&mut self) -> &mut FilterSet {
///         &mut self.filters
///     }
///
///     fn update(&mut self, delta: f32, ctx: &mut SystemContext<'_, GameSchema>) {
///         for &entity in self.filters.entities(0) {
///             let velocity = *ctx.get::<Velocity>(entity).unwrap();
///             ctx.get_mut::<Position>(entity).unwrap().advance(velocity, delta);
///         }
///     }
/// }
/// ```
pub trait System<S: Schema>: AsAny {
    /// Name used in frame timings and logs.
    fn name(&self) -> &'static str {
        "System"
    }

    /// The system's filters.
    fn filters(&self) -> &FilterSet;

    /// Mutable access to the filters, used for change notifications.
    fn filters_mut(&mut self) -> &mut FilterSet;

    /// Runs one frame. `delta` is the caller's time step.
    ///
    /// Structural changes (creating, destroying, adding or removing
    /// components) go through [`SystemContext::commands`] and are applied
    /// after every system has run.
    fn update(&mut self, delta: f32, ctx: &mut SystemContext<'_, S>);

    /// Called once for every change of an entity's aspect.
    ///
    /// The component view is read-only. On destruction (`new` empty) the entity's
    /// components are still present in it, so a system can release whatever
    /// it holds for them.
    ///
    /// # Errors
    ///
    /// Returns a [`MembershipError`] when a filter was out of sync.
    fn on_entity_changed(
        &mut self,
        entity: Entity,
        old: Aspect,
        new: Aspect,
        _components: &Components<S>,
    ) -> Result<(), MembershipError> {
        self.filters_mut().on_entity_changed(entity, old, new)
    }
}
