//! Deferred structural changes.
//!
//! Systems cannot create or destroy entities while the dispatcher iterates
//! them, since that would edit filter lists mid-iteration. They queue the
//! change here instead; the entity manager applies the queue, in order,
//! after the last system of the frame has run.

use crate::ecs::{Aspect, ComponentBundle, ComponentSet, Entity, EntityManager, Schema};

type Command<S> = Box<dyn FnOnce(&mut EntityManager<S>)>;

/// FIFO queue of changes to apply to an [`EntityManager`].
pub struct Commands<S: Schema> {
    queue: Vec<Command<S>>,
}

impl<S: Schema> Commands<S> {
    /// Creates an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Queues creation of an entity holding `bundle`.
    pub fn create<B: ComponentBundle<S> + 'static>(&mut self, bundle: B) {
        self.push(move |manager| {
            manager.create_entity(bundle);
        });
    }

    /// Queues a copy of `source`.
    pub fn copy(&mut self, source: Entity) {
        self.push(move |manager| {
            manager.copy_entity(source);
        });
    }

    /// Queues destruction of `entity`.
    pub fn destroy(&mut self, entity: Entity) {
        self.push(move |manager| {
            manager.destroy_entity(entity);
        });
    }

    /// Queues attaching `bundle` to `entity`.
    pub fn add<B: ComponentBundle<S> + 'static>(&mut self, entity: Entity, bundle: B) {
        self.push(move |manager| manager.add_components(entity, bundle));
    }

    /// Queues attaching default components for every bit of `aspect`.
    pub fn add_by_aspect(&mut self, entity: Entity, aspect: Aspect) {
        self.push(move |manager| manager.add_components_by_aspect(entity, aspect));
    }

    /// Queues detaching the component types in `T`.
    pub fn remove<T: ComponentSet<S>>(&mut self, entity: Entity) {
        self.remove_by_aspect(entity, T::ASPECT);
    }

    /// Queues detaching every bit of `aspect`.
    pub fn remove_by_aspect(&mut self, entity: Entity, aspect: Aspect) {
        self.push(move |manager| manager.remove_components_by_aspect(entity, aspect));
    }

    /// Queues an arbitrary change.
    pub fn push(&mut self, command: impl FnOnce(&mut EntityManager<S>) + 'static) {
        self.queue.push(Box::new(command));
    }

    /// Number of queued changes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether nothing is queued.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Applies and drains every queued change, oldest first.
    pub(crate) fn apply(&mut self, manager: &mut EntityManager<S>) {
        if self.queue.is_empty() {
            return;
        }
        let applied = self.queue.len();
        for command in self.queue.drain(..) {
            command(manager);
        }
        tracing::trace!(applied, "applied deferred commands");
    }
}

impl<S: Schema> Default for Commands<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> std::fmt::Debug for Commands<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Commands").field("queued", &self.queue.len()).finish()
    }
}
