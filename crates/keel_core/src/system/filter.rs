//! # Aspect Filters
//!
//! A filter keeps the list of entities whose aspect has every bit of its
//! inclusive mask and no bit of its exclusive mask. Membership is maintained
//! incrementally from change notifications; filters never scan storage.

use thiserror::Error;

use crate::ecs::{Aspect, Entity};

/// Filter membership fell out of sync with entity aspects.
///
/// Raised when an entity's previous aspect matched the filter but the entity
/// was not a member. This can only happen if a change was not reported.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipError {
    /// The entity should have been a member but was not found.
    #[error("{entity:?} matched filter (inclusive {inclusive:?}, exclusive {exclusive:?}) but was not a member")]
    MissingMember {
        /// The changed entity.
        entity: Entity,
        /// Inclusive mask of the filter.
        inclusive: Aspect,
        /// Exclusive mask of the filter.
        exclusive: Aspect,
    },
}

/// Incrementally maintained entity list for one inclusive/exclusive pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AspectFilter {
    inclusive: Aspect,
    exclusive: Aspect,
    /// Members in insertion order.
    entities: Vec<Entity>,
}

impl AspectFilter {
    /// Creates an empty filter.
    #[must_use]
    pub const fn new(inclusive: Aspect, exclusive: Aspect) -> Self {
        Self {
            inclusive,
            exclusive,
            entities: Vec::new(),
        }
    }

    /// Filter matching every entity that owns at least one component.
    #[must_use]
    pub const fn any() -> Self {
        Self::new(Aspect::EMPTY, Aspect::EMPTY)
    }

    /// Filter requiring `inclusive` and excluding nothing.
    #[must_use]
    pub const fn including(inclusive: Aspect) -> Self {
        Self::new(inclusive, Aspect::EMPTY)
    }

    /// `(aspect & inclusive) == inclusive && (aspect & exclusive) == 0`
    #[inline]
    #[must_use]
    pub const fn matches(&self, aspect: Aspect) -> bool {
        aspect.contains(self.inclusive) && !aspect.intersects(self.exclusive)
    }

    /// Updates membership after `entity` changed from `old` to `new`.
    ///
    /// If `old` matched, the entity is removed; if `new` is non-empty and
    /// matches, it is appended. An empty `new` never (re-)enters the filter,
    /// so destroyed entities always leave.
    ///
    /// # Errors
    ///
    /// Returns [`MembershipError::MissingMember`] when `old` matched a filter
    /// with a non-empty inclusive mask but the entity was not a member. The
    /// add step still runs.
    pub fn on_entity_changed(
        &mut self,
        entity: Entity,
        old: Aspect,
        new: Aspect,
    ) -> Result<(), MembershipError> {
        let mut result = Ok(());

        if self.matches(old) {
            if let Some(position) = self.entities.iter().position(|&member| member == entity) {
                self.entities.remove(position);
            } else if !self.inclusive.is_empty() {
                result = Err(MembershipError::MissingMember {
                    entity,
                    inclusive: self.inclusive,
                    exclusive: self.exclusive,
                });
            }
        }

        if !new.is_empty() && self.matches(new) {
            self.entities.push(entity);
        }

        result
    }

    /// Members in insertion order.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Number of members.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the filter has no members.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Whether `entity` is a member. Linear scan.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entities.contains(&entity)
    }

    /// Required component types.
    #[inline]
    #[must_use]
    pub const fn inclusive(&self) -> Aspect {
        self.inclusive
    }

    /// Forbidden component types.
    #[inline]
    #[must_use]
    pub const fn exclusive(&self) -> Aspect {
        self.exclusive
    }
}

impl Default for AspectFilter {
    /// The "no filter" construction: inclusive empty, exclusive all-ones.
    ///
    /// It matches only the empty aspect, which never enters a filter, so a
    /// default filter stays empty. Use [`AspectFilter::any`] to track every
    /// entity.
    fn default() -> Self {
        Self::new(Aspect::EMPTY, Aspect::ALL)
    }
}

/// The ordered filters of one system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    filters: Vec<AspectFilter>,
}

impl FilterSet {
    /// No filters: the system sees no entities through membership.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// A single filter.
    #[must_use]
    pub fn single(inclusive: Aspect, exclusive: Aspect) -> Self {
        Self {
            filters: vec![AspectFilter::new(inclusive, exclusive)],
        }
    }

    /// Several filters, kept in the given order.
    #[must_use]
    pub fn new(filters: Vec<AspectFilter>) -> Self {
        Self { filters }
    }

    /// Forwards a change notification to every filter.
    ///
    /// Every filter is updated even if an earlier one reports an error.
    ///
    /// # Errors
    ///
    /// Returns the first [`MembershipError`] raised.
    pub fn on_entity_changed(
        &mut self,
        entity: Entity,
        old: Aspect,
        new: Aspect,
    ) -> Result<(), MembershipError> {
        let mut result = Ok(());
        for filter in &mut self.filters {
            if let Err(err) = filter.on_entity_changed(entity, old, new) {
                if result.is_ok() {
                    result = Err(err);
                }
            }
        }
        result
    }

    /// Filter at `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&AspectFilter> {
        self.filters.get(index)
    }

    /// Members of the filter at `index`, empty if there is no such filter.
    #[inline]
    #[must_use]
    pub fn entities(&self, index: usize) -> &[Entity] {
        match self.filters.get(index) {
            Some(filter) => filter.entities(),
            None => &[],
        }
    }

    /// Number of filters.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// Whether there are no filters.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Iterates the filters in order.
    pub fn iter(&self) -> std::slice::Iter<'_, AspectFilter> {
        self.filters.iter()
    }
}

impl std::ops::Index<usize> for FilterSet {
    type Output = AspectFilter;

    fn index(&self, index: usize) -> &AspectFilter {
        &self.filters[index]
    }
}
