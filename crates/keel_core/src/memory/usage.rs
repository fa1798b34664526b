//! Resource usage tuples reported by stores and the entity table.

use std::fmt;

/// Live/allocated resource statistics for one store.
///
/// Fields follow the usual report order: name, live count, capacity, bytes
/// used, bytes allocated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UsageStats {
    /// Human-readable store name (component name, or `"Entity"`).
    pub name: &'static str,
    /// Live records.
    pub live: usize,
    /// Allocated record slots.
    pub capacity: usize,
    /// Bytes held by live records.
    pub bytes_used: usize,
    /// Bytes reserved.
    pub bytes_allocated: usize,
}

impl UsageStats {
    /// Fraction of allocated slots that are live, in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn occupancy(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }
        self.live as f32 / self.capacity as f32
    }
}

impl fmt::Display for UsageStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<16} {:>8} / {:<8} {:>10} B / {} B",
            self.name, self.live, self.capacity, self.bytes_used, self.bytes_allocated
        )
    }
}
