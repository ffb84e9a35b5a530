//! Entity views.
//!
//! An entity view is a transient record synthesized from a set of
//! component keys for one entity. It is never stored; queries build it
//! on demand and only when every requested component is present.

use tessera_foundation::{Component, EntityId, Schema};

/// A query result: one entity's values for the requested components.
#[derive(Clone, Debug, PartialEq)]
pub struct Entity<S: Schema> {
    id: EntityId,
    components: im::OrdMap<S::Key, S>,
}

impl<S: Schema> Entity<S> {
    pub(crate) fn new(id: EntityId, components: im::OrdMap<S::Key, S>) -> Self {
        Self { id, components }
    }

    /// Returns the entity id.
    #[must_use]
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    /// Gets the value of a requested component.
    ///
    /// Returns `None` only for keys that were not part of the query.
    #[must_use]
    pub fn get(&self, key: S::Key) -> Option<&S> {
        self.components.get(&key)
    }

    /// Gets a requested component by type.
    #[must_use]
    pub fn component<C: Component<S>>(&self) -> Option<&C> {
        self.get(C::KEY).and_then(C::from_value)
    }

    /// Iterates the component keys of this view, in key order.
    pub fn keys(&self) -> impl Iterator<Item = S::Key> + '_ {
        self.components.keys().copied()
    }

    /// Iterates the component values of this view, in key order.
    pub fn values(&self) -> impl Iterator<Item = &S> + '_ {
        self.components.values()
    }

    /// Returns the number of components in this view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Returns true if the view holds no components.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Splits the view into its id and components.
    #[must_use]
    pub fn into_parts(self) -> (EntityId, im::OrdMap<S::Key, S>) {
        (self.id, self.components)
    }
}
