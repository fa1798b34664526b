//! Starts and stops one-shot sounds from collision state.

use keel_core::{
    aspect_of, Aspect, Components, Entity, FilterSet, MembershipError, System, SystemContext,
};

use crate::components::{Audible, Collidable, GameSchema};

/// Mixer channels handed out round-robin.
const CHANNELS: i32 = 16;

/// Plays an entity's sound while it is colliding.
#[derive(Debug)]
pub struct AudioTrigger {
    filters: FilterSet,
    next_channel: i32,
    started: u64,
    /// Sounds still playing when their entity was destroyed.
    cut_off: u64,
}

impl AudioTrigger {
    /// Entities this system listens to.
    pub const ASPECT: Aspect = aspect_of!(GameSchema; Collidable, Audible);

    /// Creates the system.
    #[must_use]
    pub fn new() -> Self {
        Self {
            filters: FilterSet::single(Self::ASPECT, Aspect::EMPTY),
            next_channel: 0,
            started: 0,
            cut_off: 0,
        }
    }

    /// Sounds started since creation.
    #[must_use]
    pub fn started(&self) -> u64 {
        self.started
    }

    /// Sounds stopped because their entity was destroyed mid-play.
    #[must_use]
    pub fn cut_off(&self) -> u64 {
        self.cut_off
    }
}

impl Default for AudioTrigger {
    fn default() -> Self {
        Self::new()
    }
}

impl System<GameSchema> for AudioTrigger {
    fn name(&self) -> &'static str {
        "AudioTrigger"
    }

    fn filters(&self) -> &FilterSet {
        &self.filters
    }

    fn filters_mut(&mut self) -> &mut FilterSet {
        &mut self.filters
    }

    fn update(&mut self, _delta: f32, ctx: &mut SystemContext<'_, GameSchema>) {
        for &entity in self.filters.entities(0) {
            let collided = ctx
                .get::<Collidable>(entity)
                .is_some_and(Collidable::is_collided);
            let Some(audible) = ctx.get_mut::<Audible>(entity) else {
                continue;
            };

            if collided && !audible.is_playing() {
                audible.flags |= Audible::PLAYING;
                audible.channel = self.next_channel;
                self.next_channel = (self.next_channel + 1) % CHANNELS;
                self.started += 1;
            } else if !collided && audible.is_playing() && audible.flags & Audible::LOOP == 0 {
                audible.flags &= !Audible::PLAYING;
                audible.channel = -1;
            }
        }
    }

    fn on_entity_changed(
        &mut self,
        entity: Entity,
        old: Aspect,
        new: Aspect,
        components: &Components<GameSchema>,
    ) -> Result<(), MembershipError> {
        if new.is_empty()
            && components
                .get::<Audible>(entity)
                .is_some_and(Audible::is_playing)
        {
            tracing::trace!(%entity, "sound cut off by destroy");
            self.cut_off += 1;
        }
        self.filters.on_entity_changed(entity, old, new)
    }
}
