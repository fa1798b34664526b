//! # Sample Systems
//!
//! Registered in this order by [`crate::simulation::Simulation`]:
//!
//! 1. [`Movement`] integrates acceleration and velocity
//! 2. [`Collision`] flags overlapping sphere volumes
//! 3. [`AudioTrigger`] starts sounds on collision
//! 4. [`ArenaBounds`] respawns entities that leave the arena

mod audio;
mod bounds;
mod collision;
mod movement;

pub use audio::AudioTrigger;
pub use bounds::ArenaBounds;
pub use collision::Collision;
pub use movement::Movement;
