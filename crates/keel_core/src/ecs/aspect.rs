//! # Aspects
//!
//! An aspect is a 64-bit mask summarising which component types an entity
//! currently owns. Bit `i` is set when the entity holds a component whose
//! [`ComponentType`] is `i`.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign, Not};

/// Compile-time assigned bit index of a component type (0-63).
pub type ComponentType = u8;

/// Hard limit on component types per schema (one bit each in an [`Aspect`]).
pub const MAX_COMPONENT_TYPES: usize = 64;

/// Bitmask of component types.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(transparent)]
pub struct Aspect(u64);

impl Aspect {
    /// No component types.
    pub const EMPTY: Self = Self(0);

    /// Every component type.
    pub const ALL: Self = Self(u64::MAX);

    /// Wraps a raw mask.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw mask.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Aspect containing a single component type.
    ///
    /// # Panics
    ///
    /// Panics (at compile time when used in a `const`) if `ty >= 64`.
    #[inline]
    #[must_use]
    pub const fn of(ty: ComponentType) -> Self {
        assert!((ty as usize) < MAX_COMPONENT_TYPES, "component type out of range");
        Self(1u64 << ty)
    }

    /// Aspect covering the first `count` component types.
    #[inline]
    #[must_use]
    pub const fn first(count: usize) -> Self {
        if count >= MAX_COMPONENT_TYPES {
            Self::ALL
        } else {
            Self((1u64 << count) - 1)
        }
    }

    /// Whether no bit is set.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Whether component type `ty` is present.
    #[inline]
    #[must_use]
    pub const fn has(self, ty: ComponentType) -> bool {
        (ty as usize) < MAX_COMPONENT_TYPES && (self.0 >> ty) & 1 == 1
    }

    /// Whether every bit of `other` is also set in `self`.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Whether `self` and `other` share at least one bit.
    #[inline]
    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Bitwise union, usable in `const` contexts.
    #[inline]
    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Bits of `self` that are not in `other`.
    #[inline]
    #[must_use]
    pub const fn difference(self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Adds component type `ty`.
    #[inline]
    pub fn insert(&mut self, ty: ComponentType) {
        *self = self.union(Self::of(ty));
    }

    /// Removes component type `ty`.
    #[inline]
    pub fn remove(&mut self, ty: ComponentType) {
        *self = self.difference(Self::of(ty));
    }

    /// Number of component types present.
    #[inline]
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Iterates the set component types in ascending bit order.
    pub fn types(self) -> impl Iterator<Item = ComponentType> {
        let mut remaining = self.0;
        std::iter::from_fn(move || {
            if remaining == 0 {
                return None;
            }
            #[allow(clippy::cast_possible_truncation)]
            let ty = remaining.trailing_zeros() as ComponentType;
            remaining &= remaining - 1;
            Some(ty)
        })
    }
}

impl BitOr for Aspect {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Aspect {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Aspect {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl Not for Aspect {
    type Output = Self;

    fn not(self) -> Self {
        Self(!self.0)
    }
}

impl From<u64> for Aspect {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl fmt::Debug for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Aspect({:#b})", self.0)
    }
}

impl fmt::Binary for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Binary::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_bits() {
        let mut aspect = Aspect::EMPTY;
        assert!(aspect.is_empty());

        aspect.insert(5);
        assert!(aspect.has(5));
        assert!(!aspect.has(4));
        assert_eq!(aspect.bits(), 0b10_0000);

        aspect.remove(5);
        assert!(aspect.is_empty());
    }

    #[test]
    fn test_contains_and_intersects() {
        let ab = Aspect::of(0) | Aspect::of(1);
        assert!(ab.contains(Aspect::of(1)));
        assert!(!Aspect::of(1).contains(ab));
        assert!(ab.intersects(Aspect::of(0) | Aspect::of(7)));
        assert!(!ab.intersects(Aspect::of(7)));
        assert!(ab.contains(Aspect::EMPTY));
    }

    #[test]
    fn test_first() {
        assert_eq!(Aspect::first(0), Aspect::EMPTY);
        assert_eq!(Aspect::first(3).bits(), 0b111);
        assert_eq!(Aspect::first(64), Aspect::ALL);
    }

    #[test]
    fn test_types_iterates_in_bit_order() {
        let aspect = Aspect::of(63) | Aspect::of(2) | Aspect::of(9);
        let types: Vec<_> = aspect.types().collect();
        assert_eq!(types, vec![2, 9, 63]);
        assert_eq!(aspect.count(), 3);
    }

    #[test]
    fn test_has_out_of_range_is_false() {
        assert!(!Aspect::ALL.has(64));
    }
}
