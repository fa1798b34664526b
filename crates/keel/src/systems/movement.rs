//! Semi-implicit Euler integration of [`Kinematic`] into [`Transformable`].

use keel_core::{aspect_of, Aspect, FilterSet, System, SystemContext};

use crate::components::{GameSchema, Kinematic, Transformable};

/// Moves every entity with a transform and kinematics.
#[derive(Debug)]
pub struct Movement {
    filters: FilterSet,
}

impl Movement {
    /// Entities this system moves.
    pub const ASPECT: Aspect = aspect_of!(GameSchema; Transformable, Kinematic);

    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSet::single(Self::ASPECT, Aspect::EMPTY),
        }
    }

    /// Number of entities currently moved.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.filters.entities(0).len()
    }
}

impl Default for Movement {
    fn default() -> Self {
        Self::new()
    }
}

impl System<GameSchema> for Movement {
    fn name(&self) -> &'static str {
        "Movement"
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    fn update(&mut self, delta: f32, ctx: &mut SystemContext<'_, GameSchema>) {
        for &entity in self.filters.entities(0) {
            let Some(kinematic) = ctx.get_mut::<Kinematic>(entity) else {
                continue;
            };
            kinematic.velocity[0] += kinematic.acceleration[0] * delta;
            kinematic.velocity[1] += kinematic.acceleration[1] * delta;
            let velocity = kinematic.velocity;

            if let Some(transform) = ctx.get_mut::<Transformable>(entity) {
                transform.position[0] += velocity[0] * delta;
                transform.position[1] += velocity[1] * delta;
            }
        }
    }
}
