//! # KEEL Core
//!
//! Single-threaded Entity Component System with packed component storage
//! and aspect-filtered systems.
//!
//! ## Architecture Rules
//!
//! 1. **Schemas are static** - component types and their bits are fixed at compile time
//! 2. **No per-entity heap allocation** - component data lives in packed stores
//! 3. **One notification per change** - systems never scan storage for membership
//!
//! ## Example
//!
//! ```rust,ignore
//! use keel_core::{component_schema, EntityManager, SystemDispatcher};
//!
//! component_schema! {
//!     pub struct GameSchema { Position, Velocity }
//! }
//!
//! let dispatcher = SystemDispatcher::new().with_system(Movement::default());
//! let mut manager = EntityManager::<GameSchema>::new(dispatcher);
//! let entity = manager.create_entity((Position::default(), Velocity::default()));
//! manager.update(1.0 / 60.0);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;
pub mod system;

pub use config::{EcsConfig, GrowthPolicy};
pub use ecs::{
    Aspect, Component, ComponentBundle, ComponentOf, ComponentSet, ComponentType, Components,
    Entity, EntityManager, Schema, MAX_COMPONENT_TYPES,
};
pub use error::{KeelError, KeelResult};
pub use memory::{PackedStore, RecordLayout, SlotId, UsageStats};
pub use system::{
    AspectFilter, Commands, FilterSet, FrameTime, MembershipError, System, SystemContext,
    SystemDispatcher,
};
