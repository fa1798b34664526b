//! # Entity Handles
//!
//! Entities are plain indices into the entity table. There is no generation
//! counter: a destroyed handle's value is handed out again to the next
//! entity, so callers must drop handles when they destroy an entity.

use std::fmt;

/// Opaque entity handle.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Entity(u32);

impl Entity {
    /// Handle that never refers to an entity.
    pub const INVALID: Self = Self(u32::MAX);

    /// Wraps a raw index.
    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Row index in the entity table.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Checks if this is [`Entity::INVALID`].
    #[inline]
    #[must_use]
    pub const fn is_invalid(self) -> bool {
        self.0 == u32::MAX
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_invalid() {
            f.write_str("Entity(INVALID)")
        } else {
            write!(f, "Entity({})", self.0)
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_roundtrip() {
        let entity = Entity::from_raw(12345);
        assert_eq!(entity.raw(), 12345);
        assert_eq!(entity.index(), 12345);
        assert!(!entity.is_invalid());
    }

    #[test]
    fn test_default_is_invalid() {
        assert!(Entity::default().is_invalid());
        assert_eq!(format!("{:?}", Entity::INVALID), "Entity(INVALID)");
    }
}
