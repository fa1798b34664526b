//! Component access handed to systems during an update.

use super::commands::Commands;
use crate::ecs::{Aspect, ComponentOf, Components, Entity, Schema};

/// What a system may touch while it runs.
///
/// Component data can be read and written in place. Changes to the set of
/// components an entity owns are queued on [`SystemContext::commands`].
pub struct SystemContext<'a, S: Schema> {
    components: &'a mut Components<S>,
    commands: &'a mut Commands<S>,
}

impl<'a, S: Schema> SystemContext<'a, S> {
    pub(crate) fn new(components: &'a mut Components<S>, commands: &'a mut Commands<S>) -> Self {
        Self {
            components,
            commands,
        }
    }

    /// Component `C` of `entity`.
    #[inline]
    #[must_use]
    pub fn get<C: ComponentOf<S>>(&self, entity: Entity) -> Option<&C> {
        self.components.get::<C>(entity)
    }

    /// Mutable component `C` of `entity`.
    #[inline]
    pub fn get_mut<C: ComponentOf<S>>(&mut self, entity: Entity) -> Option<&mut C> {
        self.components.get_mut::<C>(entity)
    }

    /// Whether `entity` owns component `C`.
    #[inline]
    #[must_use]
    pub fn has<C: ComponentOf<S>>(&self, entity: Entity) -> bool {
        self.components.has::<C>(entity)
    }

    /// Current aspect of `entity`.
    #[inline]
    #[must_use]
    pub fn aspect(&self, entity: Entity) -> Aspect {
        self.components.aspect(entity)
    }

    /// Read-only view of all component data.
    #[inline]
    #[must_use]
    pub fn components(&self) -> &Components<S> {
        self.components
    }

    /// Queue of structural changes, applied after the frame's systems ran.
    #[inline]
    pub fn commands(&mut self) -> &mut Commands<S> {
        self.commands
    }
}
