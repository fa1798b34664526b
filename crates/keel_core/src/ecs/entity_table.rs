//! # Entity Table
//!
//! One fixed-width row per entity holding, for every component type, the
//! slot id of that entity's record in the component's store (or "absent").
//!
//! ```text
//!              type 0   type 1   type 2
//! entity 0  [    3   |   --   |    0   ]   aspect 0b101
//! entity 1  [   --   |    7   |   --   ]   aspect 0b010
//! entity 2  [   --   |   --   |   --   ]   (released)
//! ```
//!
//! The aspect is always recomputed from the row, never cached. Each row also
//! carries a live flag, so a released handle is told apart from a live one
//! even though handles carry no generation.

use std::collections::VecDeque;

use super::aspect::{Aspect, ComponentType};
use super::entity::Entity;
use crate::config::GrowthPolicy;
use crate::memory::{SlotId, UsageStats};

/// Row value meaning "component absent".
const ABSENT: u32 = u32::MAX;

/// Per-entity table of component slot ids.
#[derive(Debug)]
pub struct EntityTable {
    /// Slots per row (component types in the schema).
    width: usize,
    /// `capacity * width` slot ids.
    rows: Vec<u32>,
    /// One flag per allocated row, set while the handle is live.
    alive: Vec<bool>,
    /// Rows allocated.
    capacity: usize,
    /// Rows ever handed out.
    high_water: usize,
    /// Live entities.
    live: usize,
    /// Rows added per growth.
    grow_step: usize,
    /// Released handles, oldest first.
    free: VecDeque<Entity>,
}

impl EntityTable {
    /// Creates a table with rows `width` slots wide.
    #[must_use]
    pub fn new(width: usize, policy: GrowthPolicy) -> Self {
        let mut rows = Vec::new();
        rows.resize(policy.initial_capacity * width, ABSENT);
        Self {
            width,
            rows,
            alive: vec![false; policy.initial_capacity],
            capacity: policy.initial_capacity,
            high_water: 0,
            live: 0,
            grow_step: policy.grow_step.max(1),
            free: VecDeque::new(),
        }
    }

    /// Allocates a handle with every component absent.
    ///
    /// Released handles are reused oldest-first.
    pub fn alloc(&mut self) -> Entity {
        let entity = match self.free.pop_front() {
            Some(entity) => entity,
            None => {
                if self.high_water == self.capacity {
                    self.grow();
                }
                let entity = match u32::try_from(self.high_water) {
                    Ok(raw) if raw != u32::MAX => Entity::from_raw(raw),
                    _ => panic!("entity table exhausted the handle space"),
                };
                self.high_water += 1;
                entity
            }
        };
        self.live += 1;
        self.alive[entity.index()] = true;
        self.row_mut(entity).fill(ABSENT);
        entity
    }

    /// Resets the row and returns the handle to the free list.
    ///
    /// Returns `false`, and leaves the table untouched, if `entity` is not
    /// live. A handle therefore never sits on the free list twice.
    pub fn release(&mut self, entity: Entity) -> bool {
        if !self.is_alive(entity) {
            return false;
        }
        self.row_mut(entity).fill(ABSENT);
        self.alive[entity.index()] = false;
        self.free.push_back(entity);
        self.live -= 1;
        true
    }

    /// Whether `entity` addresses a row that has been handed out.
    ///
    /// Released handles still count; use [`EntityTable::is_alive`] to tell
    /// them apart.
    #[inline]
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        !entity.is_invalid() && entity.index() < self.high_water
    }

    /// Whether `entity` is allocated and not yet released.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.contains(entity) && self.alive[entity.index()]
    }

    /// Records the slot of component `ty` for `entity`.
    ///
    /// # Panics
    ///
    /// Panics if `entity` is not live or `ty` is out of range.
    pub fn set_slot(&mut self, entity: Entity, ty: ComponentType, slot: Option<SlotId>) {
        assert!(self.is_alive(entity), "set_slot on dead {entity:?}");
        let width = self.width;
        assert!((ty as usize) < width, "component type {ty} outside schema");
        self.row_mut(entity)[ty as usize] = slot.map_or(ABSENT, SlotId::raw);
    }

    /// Slot of component `ty` for `entity`, `None` if absent or out of range.
    #[inline]
    #[must_use]
    pub fn slot(&self, entity: Entity, ty: ComponentType) -> Option<SlotId> {
        let raw = *self.row(entity)?.get(ty as usize)?;
        (raw != ABSENT).then_some(SlotId::from_raw(raw))
    }

    /// Recomputes the aspect of `entity` from its row.
    #[must_use]
    pub fn aspect(&self, entity: Entity) -> Aspect {
        let Some(row) = self.row(entity) else {
            return Aspect::EMPTY;
        };
        let mut aspect = Aspect::EMPTY;
        for (ty, &raw) in (0..).zip(row) {
            if raw != ABSENT {
                aspect.insert(ty);
            }
        }
        aspect
    }

    /// Component types per row.
    #[inline]
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Live entities.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether no entity is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocated rows.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes held by live rows.
    #[inline]
    #[must_use]
    pub const fn bytes_used(&self) -> usize {
        self.live * self.row_bytes()
    }

    /// Bytes reserved for rows.
    #[inline]
    #[must_use]
    pub const fn bytes_allocated(&self) -> usize {
        self.capacity * self.row_bytes()
    }

    /// Usage tuple for diagnostics, named `"Entity"`.
    #[must_use]
    pub fn usage(&self) -> UsageStats {
        UsageStats {
            name: "Entity",
            live: self.len(),
            capacity: self.capacity(),
            bytes_used: self.bytes_used(),
            bytes_allocated: self.bytes_allocated(),
        }
    }

    const fn row_bytes(&self) -> usize {
        self.width * std::mem::size_of::<u32>()
    }

    fn row(&self, entity: Entity) -> Option<&[u32]> {
        if !self.contains(entity) {
            return None;
        }
        let start = entity.index() * self.width;
        self.rows.get(start..start + self.width)
    }

    fn row_mut(&mut self, entity: Entity) -> &mut [u32] {
        let start = entity.index() * self.width;
        &mut self.rows[start..start + self.width]
    }

    /// Adds one growth step of rows. Reallocates the whole table.
    fn grow(&mut self) {
        let new_capacity = self.capacity + self.grow_step;
        let target = new_capacity * self.width;
        self.rows.reserve_exact(target - self.rows.len());
        self.rows.resize(target, ABSENT);
        self.alive.resize(new_capacity, false);

        tracing::debug!(from = self.capacity, to = new_capacity, "entity table grew");
        self.capacity = new_capacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> EntityTable {
        EntityTable::new(
            3,
            GrowthPolicy {
                initial_capacity: 2,
                grow_step: 2,
            },
        )
    }

    #[test]
    fn test_fresh_rows_are_absent() {
        let mut table = table();
        let entity = table.alloc();

        assert_eq!(table.aspect(entity), Aspect::EMPTY);
        for ty in 0..3 {
            assert_eq!(table.slot(entity, ty), None);
        }
    }

    #[test]
    fn test_aspect_follows_slots() {
        let mut table = table();
        let entity = table.alloc();

        table.set_slot(entity, 0, Some(SlotId::from_raw(4)));
        table.set_slot(entity, 2, Some(SlotId::from_raw(0)));
        assert_eq!(table.aspect(entity).bits(), 0b101);
        assert_eq!(table.slot(entity, 2), Some(SlotId::from_raw(0)));

        table.set_slot(entity, 0, None);
        assert_eq!(table.aspect(entity).bits(), 0b100);
    }

    #[test]
    fn test_release_resets_row_and_reuses_fifo() {
        let mut table = table();
        let a = table.alloc();
        let b = table.alloc();
        let c = table.alloc();
        table.set_slot(b, 1, Some(SlotId::from_raw(9)));

        assert!(table.release(b));
        assert!(table.release(a));
        assert_eq!(table.len(), 1);

        assert_eq!(table.alloc(), b);
        assert_eq!(table.aspect(b), Aspect::EMPTY);
        assert_eq!(table.alloc(), a);
        assert_ne!(c, a);
    }

    #[test]
    fn test_double_release_is_rejected() {
        let mut table = table();
        let a = table.alloc();
        let b = table.alloc();

        assert!(table.release(a));
        assert!(!table.is_alive(a));
        assert!(table.contains(a));
        assert!(!table.release(a));
        assert_eq!(table.len(), 1);

        // `a` comes back exactly once, then the table grows.
        assert_eq!(table.alloc(), a);
        let c = table.alloc();
        assert_ne!(c, a);
        assert_ne!(c, b);
        assert_eq!(table.len(), 3);
        assert!(!table.release(Entity::INVALID));
    }

    #[test]
    fn test_growth_and_usage() {
        let mut table = table();
        for _ in 0..5 {
            let _ = table.alloc();
        }
        assert_eq!(table.capacity(), 6);

        let usage = table.usage();
        assert_eq!(usage.name, "Entity");
        assert_eq!(usage.live, 5);
        assert_eq!(usage.bytes_used, 5 * 3 * 4);
        assert_eq!(usage.bytes_allocated, 6 * 3 * 4);
    }

    #[test]
    fn test_out_of_range_queries() {
        let table = table();
        assert_eq!(table.aspect(Entity::from_raw(40)), Aspect::EMPTY);
        assert_eq!(table.slot(Entity::INVALID, 0), None);
        assert!(!table.contains(Entity::INVALID));
    }
}
