//! # Memory Management
//!
//! Packed record stores backing every component type.
//!
//! ## Design Philosophy
//!
//! Storage grows in fixed linear steps and is never compacted:
//! - No per-entity heap allocation
//! - Released slots are recycled oldest-first
//! - Growth may move records, so borrows never outlive a mutation

mod packed_store;
mod usage;

pub use packed_store::{PackedStore, RecordLayout, SlotId};
pub use usage::UsageStats;
