//! # Entity Manager
//!
//! The central container for all entities, their components and the systems
//! that process them.
//!
//! Every operation that changes which components an entity owns computes
//! the entity's aspect before and after, then broadcasts exactly one
//! `(entity, old, new)` notification to the dispatcher. Systems keep their
//! filter lists current from those notifications alone.

use super::aspect::{Aspect, ComponentType};
use super::bundle::{ComponentBundle, ComponentSet};
use super::component::{ComponentOf, Schema};
use super::entity::Entity;
use super::storage::Components;
use crate::config::EcsConfig;
use crate::memory::{PackedStore, UsageStats};
use crate::system::{Commands, System, SystemDispatcher};

/// Entities, component storage and systems of schema `S`.
///
/// # Example
///
/// ```rust,ignore
/// let dispatcher = SystemDispatcher::new().with_system(Movement::default());
/// let mut manager = EntityManager::<GameSchema>::new(dispatcher);
///
/// let ship = manager.create_entity((Position::default(), Velocity::new(1.0, 0.0)));
/// manager.update(1.0 / 60.0);
/// ```
pub struct EntityManager<S: Schema> {
    components: Components<S>,
    dispatcher: SystemDispatcher<S>,
    /// Structural changes queued by systems during `update`.
    commands: Commands<S>,
}

impl<S: Schema> EntityManager<S> {
    /// Creates a manager with default growth policies.
    #[must_use]
    pub fn new(dispatcher: SystemDispatcher<S>) -> Self {
        Self::with_config(&EcsConfig::default(), dispatcher)
    }

    /// Creates a manager sized by `config`.
    ///
    /// A slow-system budget set in `config` replaces the one `dispatcher`
    /// was built with.
    #[must_use]
    pub fn with_config(config: &EcsConfig, mut dispatcher: SystemDispatcher<S>) -> Self {
        if let Some(budget) = config.slow_system_budget() {
            dispatcher = dispatcher.with_slow_system_budget(Some(budget));
        }
        tracing::debug!(
            component_types = S::COMPONENT_COUNT,
            systems = dispatcher.len(),
            "entity manager created"
        );
        Self {
            components: Components::new(config),
            dispatcher,
            commands: Commands::new(),
        }
    }

    // =========================================================================
    // Structural changes
    // =========================================================================

    /// Creates an entity holding the components in `bundle`.
    ///
    /// Issues one notification `(entity, EMPTY, bundle aspect)`.
    pub fn create_entity<B: ComponentBundle<S>>(&mut self, bundle: B) -> Entity {
        let entity = self.components.alloc_entity();
        bundle.write_into(&mut self.components, entity);
        self.notify(entity, Aspect::EMPTY);
        entity
    }

    /// Creates an entity without components.
    ///
    /// No system is notified: an empty aspect never enters a filter.
    pub fn create_empty(&mut self) -> Entity {
        self.components.alloc_entity()
    }

    /// Creates a new entity with a copy of every component of `source`.
    ///
    /// Issues one notification `(copy, EMPTY, aspect of source)`. Returns
    /// [`Entity::INVALID`] without creating anything if `source` is not live.
    pub fn copy_entity(&mut self, source: Entity) -> Entity {
        if !self.expect_alive(source, "copy_entity") {
            return Entity::INVALID;
        }
        let aspect = self.components.aspect(source);
        let copy = self.components.alloc_entity();
        for ty in aspect.types() {
            self.components.attach(copy, ty);
            self.components.copy_component(source, copy, ty);
        }
        self.notify(copy, Aspect::EMPTY);
        copy
    }

    /// Attaches every value in `bundle` to `entity`.
    ///
    /// Components the entity already owns are replaced. Ignored if `entity`
    /// is not live.
    pub fn add_components<B: ComponentBundle<S>>(&mut self, entity: Entity, bundle: B) {
        if !self.expect_alive(entity, "add_components") {
            return;
        }
        let old = self.components.aspect(entity);
        bundle.write_into(&mut self.components, entity);
        self.notify(entity, old);
    }

    /// Attaches a default-initialised component for every bit of `aspect`.
    ///
    /// Bits outside the schema are ignored. Components the entity already
    /// owns are replaced by defaults.
    pub fn add_components_by_aspect(&mut self, entity: Entity, aspect: Aspect) {
        if !self.expect_alive(entity, "add_components_by_aspect") {
            return;
        }
        let old = self.components.aspect(entity);
        for ty in (aspect & S::full_aspect()).types() {
            self.components.attach(entity, ty);
        }
        self.notify(entity, old);
    }

    /// Detaches the component types in `T`. Absent ones are ignored.
    pub fn remove_components<T: ComponentSet<S>>(&mut self, entity: Entity) {
        self.remove_components_by_aspect(entity, T::ASPECT);
    }

    /// Detaches every component type whose bit is set in `aspect`.
    pub fn remove_components_by_aspect(&mut self, entity: Entity, aspect: Aspect) {
        if !self.expect_alive(entity, "remove_components_by_aspect") {
            return;
        }
        let old = self.components.aspect(entity);
        for ty in (aspect & old).types() {
            self.components.detach(entity, ty);
        }
        self.notify(entity, old);
    }

    /// Destroys `entity` and releases its components.
    ///
    /// Systems are notified `(entity, aspect, EMPTY)` while the component
    /// data is still readable through the [`Components`] passed to
    /// [`System::on_entity_changed`]. Returns `false`, and notifies nobody,
    /// if the handle is not live: never allocated, or already destroyed.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.components.is_alive(entity) {
            tracing::debug!(%entity, "destroy of a dead handle ignored");
            return false;
        }
        let old = self.components.aspect(entity);
        self.dispatcher
            .broadcast_entity_changed(entity, old, Aspect::EMPTY, &self.components);
        tracing::trace!(%entity, ?old, "entity destroyed");
        self.components.release_entity(entity)
    }

    // =========================================================================
    // Component access
    // =========================================================================

    /// Component `C` of `entity`.
    #[inline]
    #[must_use]
    pub fn get<C: ComponentOf<S>>(&self, entity: Entity) -> Option<&C> {
        self.components.get::<C>(entity)
    }

    /// Mutable component `C` of `entity`.
    #[inline]
    pub fn get_mut<C: ComponentOf<S>>(&mut self, entity: Entity) -> Option<&mut C> {
        self.components.get_mut::<C>(entity)
    }

    /// Whether `entity` owns component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: ComponentOf<S>>(&self, entity: Entity) -> bool {
        self.components.has::<C>(entity)
    }

    /// Whether `entity` owns the component with bit index `ty`.
    #[inline]
    #[must_use]
    pub fn has_component(&self, entity: Entity, ty: ComponentType) -> bool {
        self.components.has_type(entity, ty)
    }

    /// Whether `entity` is live.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.components.is_alive(entity)
    }

    /// Current aspect of `entity`, recomputed from storage.
    #[inline]
    #[must_use]
    pub fn aspect(&self, entity: Entity) -> Aspect {
        self.components.aspect(entity)
    }

    /// Bit index of component `C`.
    #[inline]
    #[must_use]
    pub const fn component_type<C: ComponentOf<S>>() -> ComponentType {
        C::TYPE
    }

    /// Aspect of the component types in `T`.
    #[inline]
    #[must_use]
    pub const fn aspect_of<T: ComponentSet<S>>() -> Aspect {
        T::ASPECT
    }

    /// Read-only view of all component data.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &Components<S> {
        &self.components
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    /// Live entities.
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.components.table().len()
    }

    /// Live component records across every store.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.components.stores().iter().map(PackedStore::len).sum()
    }

    /// Live records in the store of component `C`.
    #[must_use]
    pub fn component_count_of<C: ComponentOf<S>>(&self) -> usize {
        self.components.store(C::TYPE).map_or(0, PackedStore::len)
    }

    /// Usage of the store of component `C`.
    #[must_use]
    pub fn component_usage<C: ComponentOf<S>>(&self) -> Option<UsageStats> {
        self.components.store(C::TYPE).map(PackedStore::usage)
    }

    /// Usage of the entity table followed by every component store.
    #[must_use]
    pub fn data_use(&self) -> Vec<UsageStats> {
        self.components.usage()
    }

    // =========================================================================
    // Systems
    // =========================================================================

    /// Runs every system once, then applies the commands they queued.
    pub fn update(&mut self, delta: f32) {
        let mut commands = std::mem::take(&mut self.commands);
        self.dispatcher.update(delta, &mut self.components, &mut commands);
        commands.apply(self);
        self.commands = commands;
    }

    /// The dispatcher.
    #[inline]
    #[must_use]
    pub fn dispatcher(&self) -> &SystemDispatcher<S> {
        &self.dispatcher
    }

    /// First system of concrete type `T`.
    #[must_use]
    pub fn system<T: System<S>>(&self) -> Option<&T> {
        self.dispatcher.system_of::<T>()
    }

    /// Mutable first system of concrete type `T`.
    pub fn system_mut<T: System<S>>(&mut self) -> Option<&mut T> {
        self.dispatcher.system_of_mut::<T>()
    }

    fn notify(&mut self, entity: Entity, old: Aspect) {
        let new = self.components.aspect(entity);
        tracing::trace!(%entity, ?old, ?new, "entity changed");
        self.dispatcher
            .broadcast_entity_changed(entity, old, new, &self.components);
    }

    fn expect_alive(&self, entity: Entity, operation: &'static str) -> bool {
        let alive = self.components.is_alive(entity);
        if !alive {
            tracing::warn!(%entity, operation, "structural change on a dead handle ignored");
        }
        alive
    }
}

impl<S: Schema> std::fmt::Debug for EntityManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityManager")
            .field("components", &self.components)
            .field("dispatcher", &self.dispatcher)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Position {
        x: f32,
        y: f32,
    }

    impl Component for Position {
        const NAME: &'static str = "Position";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Velocity {
        x: f32,
        y: f32,
    }

    impl Component for Velocity {
        const NAME: &'static str = "Velocity";
    }

    crate::component_schema! {
        struct Motion { Position, Velocity }
    }

    fn manager() -> EntityManager<Motion> {
        EntityManager::new(SystemDispatcher::new())
    }

    #[test]
    fn test_create_and_read() {
        let mut manager = manager();
        let entity = manager.create_entity((Position { x: 1.0, y: 2.0 },));

        assert_eq!(manager.get::<Position>(entity), Some(&Position { x: 1.0, y: 2.0 }));
        assert!(manager.get::<Velocity>(entity).is_none());
        assert_eq!(manager.aspect(entity).bits(), 0b01);
        assert_eq!(manager.entity_count(), 1);
    }

    #[test]
    fn test_add_replaces_existing_component() {
        let mut manager = manager();
        let entity = manager.create_entity((Position { x: 1.0, y: 1.0 },));
        manager.add_components(entity, (Position { x: 5.0, y: 5.0 },));

        assert_eq!(manager.get::<Position>(entity).map(|p| p.x), Some(5.0));
        assert_eq!(manager.component_count_of::<Position>(), 1);
    }

    #[test]
    fn test_add_by_aspect_uses_defaults() {
        let mut manager = manager();
        let entity = manager.create_empty();
        manager.add_components_by_aspect(entity, Aspect::ALL);

        assert_eq!(manager.aspect(entity), Motion::full_aspect());
        assert_eq!(manager.get::<Velocity>(entity), Some(&Velocity::default()));
    }

    #[test]
    fn test_remove_absent_component_is_noop() {
        let mut manager = manager();
        let entity = manager.create_entity((Position::default(),));
        manager.remove_components::<(Velocity,)>(entity);

        assert!(manager.has::<Position>(entity));
        assert_eq!(manager.component_count_of::<Velocity>(), 0);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let mut manager = manager();
        let entity = manager.create_entity((Position::default(), Velocity::default()));

        assert!(manager.destroy_entity(entity));
        assert_eq!(manager.entity_count(), 0);
        assert_eq!(manager.component_count(), 0);
        assert_eq!(manager.aspect(entity), Aspect::EMPTY);
        assert!(!manager.destroy_entity(Entity::INVALID));
    }

    #[test]
    fn test_second_destroy_is_rejected() {
        let mut manager = manager();
        let doomed = manager.create_entity((Position { x: 1.0, y: 0.0 },));
        let survivor = manager.create_entity((Position { x: 2.0, y: 0.0 },));

        assert!(manager.destroy_entity(doomed));
        assert!(!manager.destroy_entity(doomed));
        assert!(!manager.is_alive(doomed));
        assert_eq!(manager.entity_count(), 1);

        let reused = manager.create_entity((Position { x: 3.0, y: 0.0 },));
        let fresh = manager.create_entity((Position { x: 4.0, y: 0.0 },));
        assert_eq!(reused, doomed);
        assert_ne!(fresh, reused);
        assert_ne!(fresh, survivor);
        assert_eq!(manager.entity_count(), 3);
        assert_eq!(manager.get::<Position>(reused).map(|p| p.x), Some(3.0));
        assert_eq!(manager.get::<Position>(fresh).map(|p| p.x), Some(4.0));
    }

    #[test]
    fn test_dead_handles_are_left_alone() {
        let mut manager = manager();
        let entity = manager.create_entity((Position::default(),));
        manager.destroy_entity(entity);

        manager.add_components(entity, (Velocity::default(),));
        manager.add_components_by_aspect(entity, Aspect::ALL);
        manager.remove_components::<(Position,)>(entity);
        assert_eq!(manager.copy_entity(entity), Entity::INVALID);

        assert_eq!(manager.aspect(entity), Aspect::EMPTY);
        assert_eq!(manager.entity_count(), 0);
        assert_eq!(manager.component_count(), 0);
    }

    #[test]
    fn test_config_budget_reaches_dispatcher() {
        let config = EcsConfig {
            slow_system_micros: Some(250),
            ..EcsConfig::default()
        };
        let manager = EntityManager::<Motion>::with_config(&config, SystemDispatcher::new());
        assert_eq!(
            manager.dispatcher().slow_system_budget(),
            Some(std::time::Duration::from_micros(250))
        );

        let unset = EntityManager::<Motion>::with_config(
            &EcsConfig::default(),
            SystemDispatcher::new().with_slow_system_budget(Some(std::time::Duration::from_millis(2))),
        );
        assert_eq!(
            unset.dispatcher().slow_system_budget(),
            Some(std::time::Duration::from_millis(2))
        );
    }

    #[test]
    fn test_copy_is_independent() {
        let mut manager = manager();
        let source = manager.create_entity((Position { x: 3.0, y: 4.0 }, Velocity { x: 1.0, y: 0.0 }));
        let copy = manager.copy_entity(source);

        assert_ne!(copy, source);
        assert_eq!(manager.aspect(copy), manager.aspect(source));
        assert_eq!(manager.get::<Position>(copy), Some(&Position { x: 3.0, y: 4.0 }));

        manager.get_mut::<Position>(copy).unwrap().x = 9.0;
        assert_eq!(manager.get::<Position>(source).map(|p| p.x), Some(3.0));
    }

    #[test]
    fn test_data_use_lists_entity_table_first() {
        let manager = manager();
        let names: Vec<_> = manager.data_use().iter().map(|u| u.name).collect();
        assert_eq!(names, ["Entity", "Position", "Velocity"]);
    }
}
