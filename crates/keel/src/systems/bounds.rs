//! Keeps the population inside a square arena.

use keel_core::{aspect_of, Aspect, FilterSet, System, SystemContext};

use crate::components::{GameSchema, Transformable};

/// Replaces entities that leave the arena with a copy at the origin.
///
/// The replacement is queued as a command, so it happens after the frame's
/// systems have all run.
#[derive(Debug)]
pub struct ArenaBounds {
    filters: FilterSet,
    half_extent: f32,
    respawned: u64,
}

impl ArenaBounds {
    /// Entities this system watches.
    pub const ASPECT: Aspect = aspect_of!(GameSchema; Transformable);

    /// Arena spanning `[-half_extent, half_extent]` on both axes.
    #[must_use]
    pub fn new(half_extent: f32) -> Self {
        Self {
            filters: FilterSet::single(Self::ASPECT, Aspect::EMPTY),
            half_extent,
            respawned: 0,
        }
    }

    /// Entities respawned since creation.
    #[must_use]
    pub fn respawned(&self) -> u64 {
        self.respawned
    }
}

impl System<GameSchema> for ArenaBounds {
    fn name(&self) -> &'static str {
        "ArenaBounds"
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    fn update(&mut self, _delta: f32, ctx: &mut SystemContext<'_, GameSchema>) {
        for &entity in self.filters.entities(0) {
            let outside = ctx.get::<Transformable>(entity).is_some_and(|transform| {
                transform.position[0].abs() > self.half_extent
                    || transform.position[1].abs() > self.half_extent
            });
            if !outside {
                continue;
            }

            self.respawned += 1;
            ctx.commands().push(move |manager| {
                let copy = manager.copy_entity(entity);
                manager.destroy_entity(entity);
                if let Some(transform) = manager.get_mut::<Transformable>(copy) {
                    transform.position = [0.0, 0.0];
                }
            });
        }
    }
}
