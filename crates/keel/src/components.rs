//! # Sample Components
//!
//! Plain-data components of the sample simulation and the schema that
//! assigns their aspect bits.

use bytemuck::{Pod, Zeroable};
use keel_core::{component_schema, Component};

/// Placement in the plane.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Transformable {
    /// World position.
    pub position: [f32; 2],
    /// Rotation in radians.
    pub rotation: f32,
    /// Per-axis scale.
    pub scale: [f32; 2],
}

impl Transformable {
    /// Unrotated, unscaled transform at `position`.
    #[must_use]
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            position: [x, y],
            rotation: 0.0,
            scale: [1.0, 1.0],
        }
    }
}

impl Default for Transformable {
    fn default() -> Self {
        Self::at(0.0, 0.0)
    }
}

impl Component for Transformable {
    const NAME: &'static str = "Transformable";
}

/// Linear motion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Kinematic {
    /// Units per second.
    pub velocity: [f32; 2],
    /// Units per second squared.
    pub acceleration: [f32; 2],
}

impl Component for Kinematic {
    const NAME: &'static str = "Kinematic";
}

/// Collision volume.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Collidable {
    /// Sphere radius.
    pub radius: f32,
    /// Offset of the volume from the transform's position.
    pub offset: [f32; 2],
    /// One of the `SHAPE_*` constants.
    pub shape: u32,
    /// Non-zero while overlapping another volume.
    pub collided: u32,
}

impl Collidable {
    /// Sphere volume.
    pub const SHAPE_SPHERE: u32 = 0;
    /// Volume that never collides.
    pub const SHAPE_UNKNOWN: u32 = 1;

    /// Sphere of `radius` centred on the transform.
    #[must_use]
    pub const fn sphere(radius: f32) -> Self {
        Self {
            radius,
            offset: [0.0, 0.0],
            shape: Self::SHAPE_SPHERE,
            collided: 0,
        }
    }

    /// Whether the last collision pass found an overlap.
    #[inline]
    #[must_use]
    pub const fn is_collided(&self) -> bool {
        self.collided != 0
    }
}

impl Default for Collidable {
    fn default() -> Self {
        Self {
            shape: Self::SHAPE_UNKNOWN,
            ..Self::sphere(0.0)
        }
    }
}

impl Component for Collidable {
    const NAME: &'static str = "Collidable";
}

/// Sound emitter.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Audible {
    /// Gain in `[0, 1]`.
    pub volume: f32,
    /// Sound bank unit, negative when unassigned.
    pub pcm_unit: i32,
    /// Mixer channel, negative when not playing.
    pub channel: i32,
    /// `PLAYING` / `LOOP` bits.
    pub flags: u32,
}

impl Audible {
    /// The sound is currently playing.
    pub const PLAYING: u32 = 1;
    /// The sound restarts when it ends.
    pub const LOOP: u32 = 1 << 1;

    /// Whether the `PLAYING` bit is set.
    #[inline]
    #[must_use]
    pub const fn is_playing(&self) -> bool {
        self.flags & Self::PLAYING != 0
    }
}

impl Default for Audible {
    fn default() -> Self {
        Self {
            volume: 1.0,
            pcm_unit: -1,
            channel: -1,
            flags: 0,
        }
    }
}

impl Component for Audible {
    const NAME: &'static str = "Audible";
}

component_schema! {
    /// Every component of the sample simulation, in aspect-bit order.
    pub struct GameSchema { Transformable, Kinematic, Collidable, Audible }
}
