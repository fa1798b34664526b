//! Brute-force sphere overlap test.

use keel_core::{aspect_of, Aspect, Entity, FilterSet, System, SystemContext};

use crate::components::{Collidable, GameSchema, Transformable};

/// Sphere snapshot taken before the pair test.
#[derive(Clone, Copy, Debug)]
struct Body {
    entity: Entity,
    center: [f32; 2],
    radius: f32,
    collided: bool,
}

/// Sets [`Collidable::collided`] on every pair of overlapping spheres.
///
/// Quadratic in the number of collidable entities.
#[derive(Debug)]
pub struct Collision {
    filters: FilterSet,
    /// Reused across frames.
    bodies: Vec<Body>,
    contacts: usize,
}

impl Collision {
    /// Entities this system tests.
    pub const ASPECT: Aspect = aspect_of!(GameSchema; Transformable, Collidable);

    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSet::single(Self::ASPECT, Aspect::EMPTY),
            bodies: Vec::new(),
            contacts: 0,
        }
    }

    /// Overlapping pairs found in the last update.
    #[must_use]
    pub fn contacts(&self) -> usize {
        self.contacts
    }
}

impl Default for Collision {
    fn default() -> Self {
        Self::new()
    }
}

impl System<GameSchema> for Collision {
    fn name(&self) -> &'static str {
        "Collision"
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    fn update(&mut self, _delta: f32, ctx: &mut SystemContext<'_, GameSchema>) {
        self.bodies.clear();
        for &entity in self.filters.entities(0) {
            let (Some(transform), Some(collidable)) =
                (ctx.get::<Transformable>(entity), ctx.get::<Collidable>(entity))
            else {
                continue;
            };
            if collidable.shape != Collidable::SHAPE_SPHERE {
                continue;
            }
            self.bodies.push(Body {
                entity,
                center: [
                    transform.position[0] + collidable.offset[0],
                    transform.position[1] + collidable.offset[1],
                ],
                radius: collidable.radius,
                collided: false,
            });
        }

        self.contacts = 0;
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                let (a, b) = (self.bodies[i], self.bodies[j]);
                let dx = a.center[0] - b.center[0];
                let dy = a.center[1] - b.center[1];
                let reach = a.radius + b.radius;
                if dx * dx + dy * dy <= reach * reach {
                    self.bodies[i].collided = true;
                    self.bodies[j].collided = true;
                    self.contacts += 1;
                }
            }
        }

        for body in &self.bodies {
            if let Some(collidable) = ctx.get_mut::<Collidable>(body.entity) {
                collidable.collided = u32::from(body.collided);
            }
        }
    }
}
