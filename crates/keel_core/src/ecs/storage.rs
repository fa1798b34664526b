//! # Component Storage
//!
//! The entity table plus one [`PackedStore`] per component type of a schema.
//!
//! Reads are public. Mutation is crate-internal: every change of an entity's
//! component set must go through the entity manager, which notifies systems.
//! Systems receive shared component access through
//! [`SystemContext`](crate::system::SystemContext) and can edit data in
//! place, but cannot attach or detach components behind the manager's back.

use std::marker::PhantomData;

use super::aspect::{Aspect, ComponentType};
use super::component::{ComponentOf, Schema};
use super::entity::Entity;
use super::entity_table::EntityTable;
use crate::config::EcsConfig;
use crate::memory::{PackedStore, SlotId, UsageStats};

/// Component data of every entity in schema `S`.
pub struct Components<S: Schema> {
    table: EntityTable,
    /// One store per component type, indexed by [`ComponentType`].
    stores: Vec<PackedStore>,
    _schema: PhantomData<fn() -> S>,
}

impl<S: Schema> Components<S> {
    pub(crate) fn new(config: &EcsConfig) -> Self {
        let stores = S::layouts()
            .into_iter()
            .map(|layout| PackedStore::new(layout, config.component_stores))
            .collect();

        Self {
            table: EntityTable::new(S::COMPONENT_COUNT, config.entity_table),
            stores,
            _schema: PhantomData,
        }
    }

    /// Component `C` of `entity`, `None` if the entity does not own one.
    #[inline]
    #[must_use]
    pub fn get<C: ComponentOf<S>>(&self, entity: Entity) -> Option<&C> {
        let slot = self.table.slot(entity, C::TYPE)?;
        Some(self.stores[C::TYPE as usize].get_as::<C>(slot))
    }

    /// Mutable component `C` of `entity`.
    #[inline]
    pub fn get_mut<C: ComponentOf<S>>(&mut self, entity: Entity) -> Option<&mut C> {
        let slot = self.table.slot(entity, C::TYPE)?;
        Some(self.stores[C::TYPE as usize].get_as_mut::<C>(slot))
    }

    /// Whether `entity` owns component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: ComponentOf<S>>(&self, entity: Entity) -> bool {
        self.has_type(entity, C::TYPE)
    }

    /// Whether `entity` owns the component with bit index `ty`.
    #[inline]
    #[must_use]
    pub fn has_type(&self, entity: Entity, ty: ComponentType) -> bool {
        self.table.slot(entity, ty).is_some()
    }

    /// Whether `entity` is live. Released handles are not.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.table.is_alive(entity)
    }

    /// Current aspect of `entity`, recomputed from its table row.
    #[inline]
    #[must_use]
    pub fn aspect(&self, entity: Entity) -> Aspect {
        self.table.aspect(entity)
    }

    /// The entity table.
    #[inline]
    #[must_use]
    pub fn table(&self) -> &EntityTable {
        &self.table
    }

    /// Store of the component with bit index `ty`.
    #[inline]
    #[must_use]
    pub fn store(&self, ty: ComponentType) -> Option<&PackedStore> {
        self.stores.get(ty as usize)
    }

    /// Every store, in bit order.
    #[inline]
    #[must_use]
    pub fn stores(&self) -> &[PackedStore] {
        &self.stores
    }

    /// Usage of the entity table followed by every store in bit order.
    #[must_use]
    pub fn usage(&self) -> Vec<UsageStats> {
        std::iter::once(self.table.usage())
            .chain(self.stores.iter().map(PackedStore::usage))
            .collect()
    }

    pub(crate) fn alloc_entity(&mut self) -> Entity {
        self.table.alloc()
    }

    /// Releases every component of `entity`, then the entity itself.
    ///
    /// Returns `false` if `entity` was not live.
    pub(crate) fn release_entity(&mut self, entity: Entity) -> bool {
        if !self.table.is_alive(entity) {
            return false;
        }
        for ty in self.table.aspect(entity).types() {
            self.detach(entity, ty);
        }
        self.table.release(entity)
    }

    /// Attaches a default-initialised component `ty`, replacing any existing one.
    pub(crate) fn attach(&mut self, entity: Entity, ty: ComponentType) -> SlotId {
        self.detach(entity, ty);
        let slot = self.stores[ty as usize].alloc_default();
        self.table.set_slot(entity, ty, Some(slot));
        slot
    }

    /// Attaches `value` as component `C`, replacing any existing one.
    pub(crate) fn write<C: ComponentOf<S>>(&mut self, entity: Entity, value: C) {
        self.detach(entity, C::TYPE);
        let slot = self.stores[C::TYPE as usize].alloc(Some(bytemuck::bytes_of(&value)));
        self.table.set_slot(entity, C::TYPE, Some(slot));
    }

    /// Detaches component `ty`. Does nothing if it is absent.
    pub(crate) fn detach(&mut self, entity: Entity, ty: ComponentType) {
        if let Some(slot) = self.table.slot(entity, ty) {
            self.stores[ty as usize].release(slot);
            self.table.set_slot(entity, ty, None);
        }
    }

    /// Copies record `ty` of `source` into the slot `target` already owns.
    pub(crate) fn copy_component(&mut self, source: Entity, target: Entity, ty: ComponentType) {
        if let (Some(src), Some(dst)) = (self.table.slot(source, ty), self.table.slot(target, ty)) {
            self.stores[ty as usize].copy_record(src, dst);
        }
    }
}

impl<S: Schema> std::fmt::Debug for Components<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Components")
            .field("entities", &self.table.len())
            .field("stores", &self.stores.len())
            .finish()
    }
}
