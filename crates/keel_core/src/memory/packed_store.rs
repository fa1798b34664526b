//! # Packed Store
//!
//! Growable, type-erased array of fixed-size records with slot reuse.
//!
//! One store holds the data of one component type for every entity that owns
//! it. Records are plain bytes: the store knows only their size and
//! alignment, typed access happens at the edges through `bytemuck` casts.
//!
//! ```text
//! slot:    0      1      2      3      4      5   ...  capacity-1
//!        [ A0 ] [ -- ] [ A2 ] [ A3 ] [ -- ] [    ]    [    ]
//!                  ^                    ^      ^
//!         released (free list, FIFO)    |      high-water mark
//! ```
//!
//! Released slots are reused oldest-first before the high-water mark moves.
//! The buffer is never compacted; when it is full it grows by a fixed step,
//! which reallocates and may move every record. Borrows returned by
//! [`PackedStore::get`] and friends keep the store locked against that.

// SAFETY: This module owns a raw allocation sized by a runtime layout.
// All unsafe blocks are documented.
#![allow(unsafe_code)]

use std::alloc::{alloc_zeroed, dealloc, handle_alloc_error, realloc, Layout};
use std::collections::VecDeque;
use std::ops::Range;
use std::ptr::NonNull;

use bytemuck::Pod;

use super::usage::UsageStats;
use crate::config::GrowthPolicy;
use crate::ecs::Component;

/// Identifier of one record inside a [`PackedStore`].
///
/// Stable until released, then eligible for reuse by a later allocation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct SlotId(u32);

impl SlotId {
    /// Wraps a raw slot index.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Slot index as `usize`.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Self {
        match u32::try_from(index) {
            Ok(raw) if raw != u32::MAX => Self(raw),
            _ => panic!("packed store exhausted the slot id space"),
        }
    }
}

/// Size, alignment, name and default value of a record type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordLayout {
    name: &'static str,
    size: usize,
    align: usize,
    default: Box<[u8]>,
}

impl RecordLayout {
    /// Layout of component `C`, with `C::default()` as the default record.
    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self {
            name: C::NAME,
            size: std::mem::size_of::<C>(),
            align: std::mem::align_of::<C>(),
            default: bytemuck::bytes_of(&C::default()).into(),
        }
    }

    /// Builds a layout from raw parts.
    ///
    /// # Panics
    ///
    /// Panics if `align` is not a power of two, if `size` is not a multiple
    /// of `align`, or if `default` is not exactly `size` bytes long.
    #[must_use]
    pub fn from_parts(name: &'static str, size: usize, align: usize, default: Box<[u8]>) -> Self {
        assert!(align.is_power_of_two(), "record alignment must be a power of two");
        assert_eq!(size % align, 0, "record size must be a multiple of its alignment");
        assert_eq!(default.len(), size, "default record must be exactly one record long");
        Self {
            name,
            size,
            align,
            default,
        }
    }

    /// Human-readable record name.
    #[inline]
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Record size in bytes.
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Record alignment in bytes.
    #[inline]
    #[must_use]
    pub const fn align(&self) -> usize {
        self.align
    }

    /// The default record bytes.
    #[inline]
    #[must_use]
    pub fn default_record(&self) -> &[u8] {
        &self.default
    }

    fn buffer(&self, capacity: usize) -> Layout {
        let bytes = self
            .size
            .checked_mul(capacity)
            .unwrap_or_else(|| capacity_overflow(self.name));
        Layout::from_size_align(bytes, self.align).unwrap_or_else(|_| capacity_overflow(self.name))
    }
}

#[cold]
fn capacity_overflow(name: &str) -> ! {
    panic!("capacity overflow in packed store for {name}")
}

/// Packed, slot-reusing storage for one record type.
///
/// # Example
///
/// ```rust,ignore
/// let mut store = PackedStore::new(RecordLayout::of::<Position>(), GrowthPolicy::default());
/// let slot = store.alloc(Some(bytemuck::bytes_of(&Position::new(1.0, 2.0))));
/// assert_eq!(store.get_as::<Position>(slot).x, 1.0);
/// store.release(slot);
/// ```
pub struct PackedStore {
    /// Record description.
    layout: RecordLayout,
    /// Start of the record buffer (dangling but aligned when it has no bytes).
    data: NonNull<u8>,
    /// Slots the buffer can hold.
    capacity: usize,
    /// Slots ever handed out; everything below is live or on the free list.
    high_water: usize,
    /// Live records.
    live: usize,
    /// Slots added per growth.
    grow_step: usize,
    /// Released slots, oldest first.
    free: VecDeque<SlotId>,
}

impl PackedStore {
    /// Creates a store with `policy.initial_capacity` zeroed slots.
    #[must_use]
    pub fn new(layout: RecordLayout, policy: GrowthPolicy) -> Self {
        let capacity = policy.initial_capacity;
        let buffer = layout.buffer(capacity);
        let data = if buffer.size() == 0 {
            dangling(layout.align)
        } else {
            // SAFETY: the layout has a non-zero size.
            let ptr = unsafe { alloc_zeroed(buffer) };
            NonNull::new(ptr).unwrap_or_else(|| handle_alloc_error(buffer))
        };

        Self {
            layout,
            data,
            capacity,
            high_water: 0,
            live: 0,
            grow_step: policy.grow_step.max(1),
            free: VecDeque::new(),
        }
    }

    /// Creates a store for component `C`.
    #[must_use]
    pub fn for_component<C: Component>(policy: GrowthPolicy) -> Self {
        Self::new(RecordLayout::of::<C>(), policy)
    }

    /// The record layout.
    #[inline]
    #[must_use]
    pub fn layout(&self) -> &RecordLayout {
        &self.layout
    }

    /// Allocates a slot, copying `init` into it when given.
    ///
    /// Released slots are reused oldest-first. Otherwise the next fresh slot
    /// is used, growing the buffer by the configured step when it is full.
    /// Without `init` the slot holds whatever bytes were left in it.
    ///
    /// # Panics
    ///
    /// Panics if `init` is not exactly one record long.
    pub fn alloc(&mut self, init: Option<&[u8]>) -> SlotId {
        let slot = match self.free.pop_front() {
            Some(slot) => slot,
            None => {
                if self.high_water == self.capacity {
                    self.grow();
                }
                let slot = SlotId::from_index(self.high_water);
                self.high_water += 1;
                slot
            }
        };
        self.live += 1;

        if let Some(bytes) = init {
            self.set(slot, bytes);
        }
        slot
    }

    /// Allocates a slot holding the layout's default record.
    pub fn alloc_default(&mut self) -> SlotId {
        let slot = self.alloc(None);
        let default = std::mem::take(&mut self.layout.default);
        self.set(slot, &default);
        self.layout.default = default;
        slot
    }

    /// Returns `slot` to the free list. Its bytes are left untouched.
    pub fn release(&mut self, slot: SlotId) {
        debug_assert!(slot.index() < self.high_water, "release of never-allocated {slot:?}");
        debug_assert!(!self.free.contains(&slot), "double release of {slot:?}");
        self.free.push_back(slot);
        self.live -= 1;
    }

    /// Bytes of the record in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `slot` lies outside the allocated buffer.
    #[inline]
    #[must_use]
    pub fn get(&self, slot: SlotId) -> &[u8] {
        let range = self.range(slot);
        &self.bytes()[range]
    }

    /// Mutable bytes of the record in `slot`.
    #[inline]
    pub fn get_mut(&mut self, slot: SlotId) -> &mut [u8] {
        let range = self.range(slot);
        &mut self.bytes_mut()[range]
    }

    /// Overwrites the record in `slot` with `record`.
    ///
    /// # Panics
    ///
    /// Panics if `record` is not exactly one record long.
    #[inline]
    pub fn set(&mut self, slot: SlotId, record: &[u8]) {
        assert_eq!(
            record.len(),
            self.layout.size,
            "record size mismatch for {}: expected {}, got {}",
            self.layout.name,
            self.layout.size,
            record.len()
        );
        self.get_mut(slot).copy_from_slice(record);
    }

    /// Typed view of the record in `slot`.
    ///
    /// # Panics
    ///
    /// Panics if `T` does not have the record's size.
    #[inline]
    #[must_use]
    pub fn get_as<T: Pod>(&self, slot: SlotId) -> &T {
        bytemuck::from_bytes(self.get(slot))
    }

    /// Mutable typed view of the record in `slot`.
    #[inline]
    pub fn get_as_mut<T: Pod>(&mut self, slot: SlotId) -> &mut T {
        bytemuck::from_bytes_mut(self.get_mut(slot))
    }

    /// Copies the record in `src` over the record in `dst`.
    pub fn copy_record(&mut self, src: SlotId, dst: SlotId) {
        if src == dst {
            return;
        }
        let from = self.range(src);
        let to = self.range(dst).start;
        self.bytes_mut().copy_within(from, to);
    }

    /// Live records.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.live
    }

    /// Whether no record is live.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Allocated slots.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes held by live records.
    #[inline]
    #[must_use]
    pub const fn bytes_used(&self) -> usize {
        self.live * self.layout.size
    }

    /// Bytes reserved by the buffer.
    #[inline]
    #[must_use]
    pub const fn bytes_allocated(&self) -> usize {
        self.capacity * self.layout.size
    }

    /// Usage tuple for diagnostics.
    #[must_use]
    pub fn usage(&self) -> UsageStats {
        UsageStats {
            name: self.layout.name,
            live: self.len(),
            capacity: self.capacity(),
            bytes_used: self.bytes_used(),
            bytes_allocated: self.bytes_allocated(),
        }
    }

    fn range(&self, slot: SlotId) -> Range<usize> {
        let start = slot.index() * self.layout.size;
        start..start + self.layout.size
    }

    fn bytes(&self) -> &[u8] {
        // SAFETY: `data` points to `capacity * size` zero-initialised bytes
        // owned by this store (or is dangling but aligned when that is 0).
        unsafe { std::slice::from_raw_parts(self.data.as_ptr(), self.bytes_allocated()) }
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: as in `bytes`, and `&mut self` guarantees exclusivity.
        unsafe { std::slice::from_raw_parts_mut(self.data.as_ptr(), self.bytes_allocated()) }
    }

    /// Grows the buffer by one step. Moves every record.
    fn grow(&mut self) {
        let new_capacity = self
            .capacity
            .checked_add(self.grow_step)
            .unwrap_or_else(|| capacity_overflow(self.layout.name));
        let old_buffer = self.layout.buffer(self.capacity);
        let new_buffer = self.layout.buffer(new_capacity);

        if new_buffer.size() > 0 {
            let ptr = if old_buffer.size() == 0 {
                // SAFETY: the new layout has a non-zero size.
                unsafe { alloc_zeroed(new_buffer) }
            } else {
                // SAFETY: `data` was allocated with `old_buffer`, the new size
                // is non-zero and was validated by `Layout::from_size_align`.
                unsafe {
                    let ptr = realloc(self.data.as_ptr(), old_buffer, new_buffer.size());
                    if !ptr.is_null() {
                        // Zero the new tail so every slot is initialised.
                        std::ptr::write_bytes(
                            ptr.add(old_buffer.size()),
                            0,
                            new_buffer.size() - old_buffer.size(),
                        );
                    }
                    ptr
                }
            };
            self.data = NonNull::new(ptr).unwrap_or_else(|| handle_alloc_error(new_buffer));
        }

        tracing::debug!(
            store = self.layout.name,
            from = self.capacity,
            to = new_capacity,
            "packed store grew"
        );
        self.capacity = new_capacity;
    }
}

impl Drop for PackedStore {
    fn drop(&mut self) {
        let buffer = self.layout.buffer(self.capacity);
        if buffer.size() > 0 {
            // SAFETY: we allocated this memory with exactly this layout.
            unsafe {
                dealloc(self.data.as_ptr(), buffer);
            }
        }
    }
}

// SAFETY: PackedStore exclusively owns its buffer; it has no interior mutability.
unsafe impl Send for PackedStore {}
// SAFETY: shared access only ever reads.
unsafe impl Sync for PackedStore {}

impl std::fmt::Debug for PackedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackedStore")
            .field("name", &self.layout.name)
            .field("live", &self.live)
            .field("capacity", &self.capacity)
            .field("free", &self.free.len())
            .finish()
    }
}

/// Aligned, non-null pointer for buffers without bytes.
fn dangling(align: usize) -> NonNull<u8> {
    // An address equal to the alignment is non-null and aligned.
    NonNull::new(align as *mut u8).unwrap_or(NonNull::dangling())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Sample {
        a: u32,
        b: f32,
    }

    impl Component for Sample {
        const NAME: &'static str = "Sample";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq)]
    struct Marker;

    // SAFETY: zero-sized, no bytes to validate.
    unsafe impl Zeroable for Marker {}
    // SAFETY: as above.
    unsafe impl Pod for Marker {}

    impl Component for Marker {
        const NAME: &'static str = "Marker";
    }

    fn small_policy() -> GrowthPolicy {
        GrowthPolicy {
            initial_capacity: 4,
            grow_step: 2,
        }
    }

    #[test]
    fn test_alloc_copies_init() {
        let mut store = PackedStore::for_component::<Sample>(small_policy());
        let value = Sample { a: 7, b: 1.5 };
        let slot = store.alloc(Some(bytemuck::bytes_of(&value)));

        assert_eq!(*store.get_as::<Sample>(slot), value);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_alloc_default_overwrites_stale_bytes() {
        let mut store = PackedStore::for_component::<Sample>(small_policy());
        let slot = store.alloc(Some(bytemuck::bytes_of(&Sample { a: 9, b: 9.0 })));
        store.release(slot);

        let reused = store.alloc_default();
        assert_eq!(reused, slot);
        assert_eq!(*store.get_as::<Sample>(reused), Sample::default());
    }

    #[test]
    fn test_released_slots_are_reused_fifo() {
        let mut store = PackedStore::for_component::<Sample>(small_policy());
        let slots: Vec<SlotId> = (0..10).map(|_| store.alloc(None)).collect();

        let released: Vec<SlotId> = slots.iter().copied().step_by(2).collect();
        for &slot in &released {
            store.release(slot);
        }
        assert_eq!(store.len(), 5);

        let reused: Vec<SlotId> = (0..5).map(|_| store.alloc(None)).collect();
        assert_eq!(reused, released);
        assert_eq!(store.len(), 10);

        // Free list drained: next slot is fresh.
        assert_eq!(store.alloc(None), SlotId::from_raw(10));
    }

    #[test]
    fn test_growth_is_linear_and_preserves_records() {
        let mut store = PackedStore::for_component::<Sample>(small_policy());
        let slots: Vec<SlotId> = (0..4u32)
            .map(|i| store.alloc(Some(bytemuck::bytes_of(&Sample { a: i, b: 0.0 }))))
            .collect();
        assert_eq!(store.capacity(), 4);

        let extra = store.alloc(None);
        assert_eq!(store.capacity(), 6);
        assert_eq!(extra, SlotId::from_raw(4));

        for (i, slot) in (0u32..).zip(&slots) {
            assert_eq!(store.get_as::<Sample>(*slot).a, i);
        }
    }

    #[test]
    fn test_diagnostics() {
        let mut store = PackedStore::for_component::<Sample>(small_policy());
        let _ = store.alloc(None);
        let _ = store.alloc(None);

        let usage = store.usage();
        assert_eq!(usage.name, "Sample");
        assert_eq!(usage.live, 2);
        assert_eq!(usage.capacity, 4);
        assert_eq!(usage.bytes_used, 16);
        assert_eq!(usage.bytes_allocated, 32);
    }

    #[test]
    fn test_copy_record() {
        let mut store = PackedStore::for_component::<Sample>(small_policy());
        let src = store.alloc(Some(bytemuck::bytes_of(&Sample { a: 5, b: 2.0 })));
        let dst = store.alloc_default();

        store.copy_record(src, dst);
        store.get_as_mut::<Sample>(dst).a = 6;

        assert_eq!(store.get_as::<Sample>(src).a, 5);
        assert_eq!(store.get_as::<Sample>(dst).a, 6);
    }

    #[test]
    fn test_zero_sized_records() {
        let mut store = PackedStore::for_component::<Marker>(small_policy());
        let slots: Vec<SlotId> = (0..9).map(|_| store.alloc_default()).collect();

        assert_eq!(store.len(), 9);
        assert_eq!(store.bytes_allocated(), 0);
        assert_eq!(*store.get_as::<Marker>(slots[8]), Marker);
    }

    #[test]
    fn test_zero_initial_capacity() {
        let mut store = PackedStore::for_component::<Sample>(GrowthPolicy {
            initial_capacity: 0,
            grow_step: 3,
        });
        assert_eq!(store.capacity(), 0);

        let slot = store.alloc(Some(bytemuck::bytes_of(&Sample { a: 1, b: 1.0 })));
        assert_eq!(store.capacity(), 3);
        assert_eq!(store.get_as::<Sample>(slot).a, 1);
    }
}
