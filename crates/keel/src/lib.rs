//! # KEEL
//!
//! Sample simulation built on `keel_core`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │ Simulation                                                   │
//! │  ┌────────────────────────────┐   ┌───────────────────────┐  │
//! │  │ EntityManager<GameSchema>  │──>│ SystemDispatcher      │  │
//! │  │  • EntityTable             │   │  1. Movement          │  │
//! │  │  • PackedStore × 4         │   │  2. Collision         │  │
//! │  └────────────────────────────┘   │  3. AudioTrigger      │  │
//! │                                   │  4. ArenaBounds       │  │
//! │                                   └───────────────────────┘  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - `components`: Sample component types and their schema
//! - `systems`: Per-frame logic
//! - `simulation`: Fixed-step driver and reporting
//! - `config`: Run settings

pub mod components;
pub mod config;
pub mod simulation;
pub mod systems;

// Re-export the core
pub use keel_core as core;

pub use components::{Audible, Collidable, GameSchema, Kinematic, Transformable};
pub use config::SimulationConfig;
pub use simulation::Simulation;
