//! # Entity Component System
//!
//! Packed, schema-driven ECS.
//!
//! ## Design Philosophy
//!
//! - Component types are fixed at compile time by a schema (max 64)
//! - Each component type lives in its own packed store with slot reuse
//! - An entity is a row of slot ids; its aspect is derived from that row
//! - Systems see entities through incrementally maintained filters

mod aspect;
mod bundle;
mod component;
mod entity;
mod entity_table;
mod storage;
mod world;

pub use aspect::{Aspect, ComponentType, MAX_COMPONENT_TYPES};
pub use bundle::{ComponentBundle, ComponentSet};
pub use component::{Component, ComponentOf, Schema};
pub use entity::Entity;
pub use entity_table::EntityTable;
pub use storage::Components;
pub use world::EntityManager;
