//! Queries and middleware-routed mutations.
//!
//! The service owns the [`Store`] and the middleware chain. Reads go
//! straight to the store. Every individual set or delete is first offered
//! to each middleware in registration order and then applied to the store
//! immediately, whatever the eventual outcome of the transaction.

use std::fmt;

use tessera_foundation::{Component, ComponentKey, EntityId, Schema};
use tessera_storage::Store;
use tracing::{debug, trace};

use crate::entity::Entity;
use crate::middleware::Middleware;
use crate::patch::Patch;

/// Query and mutation surface handed to system functions.
pub struct Service<S: Schema> {
    store: Store<S>,
    middlewares: Vec<Box<dyn Middleware<S>>>,
}

impl<S: Schema> Service<S> {
    /// Creates a service over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(Store::new())
    }

    /// Creates a service over an existing store.
    #[must_use]
    pub fn with_store(store: Store<S>) -> Self {
        Self {
            store,
            middlewares: Vec::new(),
        }
    }

    /// Returns read-only access to the underlying store.
    #[must_use]
    pub fn store(&self) -> &Store<S> {
        &self.store
    }

    /// Iterates views of every entity holding all of `signature`.
    ///
    /// Candidates come from the first key only and are then filtered on
    /// the full signature, so putting the rarest key first is fastest. An
    /// empty signature yields nothing.
    pub fn entities<'a>(&'a self, signature: &'a [S::Key]) -> impl Iterator<Item = Entity<S>> + 'a {
        signature
            .first()
            .into_iter()
            .flat_map(move |&first| self.store.entity_ids(first))
            .filter_map(move |entity| self.entity(entity, signature))
    }

    /// Builds a view of one entity from `signature`.
    ///
    /// Returns `None` if any requested component is missing; partial
    /// views are never produced.
    #[must_use]
    pub fn entity(&self, entity: &EntityId, signature: &[S::Key]) -> Option<Entity<S>> {
        let mut components = im::OrdMap::new();
        for &key in signature {
            let value = self.store.value(entity, key)?;
            components.insert(key, value.clone());
        }
        Some(Entity::new(entity.clone(), components))
    }

    /// Gets a component value for an entity.
    #[must_use]
    pub fn value(&self, entity: &EntityId, key: S::Key) -> Option<&S> {
        self.store.value(entity, key)
    }

    /// Gets a component of an entity by type.
    #[must_use]
    pub fn component<C: Component<S>>(&self, entity: &EntityId) -> Option<&C> {
        self.store.value(entity, C::KEY).and_then(C::from_value)
    }

    /// Applies a patch: `Some` entries set, `None` entries delete.
    ///
    /// Each change passes through the full middleware chain on its own.
    pub fn patch_entity(&mut self, entity: &EntityId, patch: Patch<S>) {
        for (key, change) in patch {
            match change {
                Some(value) => self.set_value(entity, value),
                None => self.delete_value(entity, key),
            }
        }
    }

    /// Deletes every component an entity currently holds.
    pub fn delete_entity(&mut self, entity: &EntityId) {
        let keys: Vec<_> = self.store.signature(entity).collect();
        for key in keys {
            self.delete_value(entity, key);
        }
    }

    /// Registers a middleware after all existing ones.
    pub fn use_middleware<M: Middleware<S> + 'static>(&mut self, middleware: M) {
        debug!(
            middleware = middleware.name(),
            position = self.middlewares.len(),
            "middleware registered"
        );
        self.middlewares.push(Box::new(middleware));
    }

    /// Returns the number of registered middlewares.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    pub(crate) fn commit(&mut self) {
        debug!(middlewares = self.middlewares.len(), "commit");
        for middleware in &mut self.middlewares {
            middleware.commit();
        }
    }

    pub(crate) fn revert(&mut self) {
        debug!(middlewares = self.middlewares.len(), "revert");
        for middleware in &mut self.middlewares {
            middleware.revert();
        }
    }

    fn set_value(&mut self, entity: &EntityId, value: S) {
        trace!(entity = %entity, component = value.key().name(), "set");
        for middleware in &mut self.middlewares {
            middleware.set_value(&self.store, entity, &value);
        }
        self.store.set_value(entity.clone(), value);
    }

    fn delete_value(&mut self, entity: &EntityId, key: S::Key) {
        trace!(entity = %entity, component = key.name(), "delete");
        for middleware in &mut self.middlewares {
            middleware.delete_value(&self.store, entity, key);
        }
        self.store.delete_value(entity, key);
    }
}

impl<S: Schema> Default for Service<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> fmt::Debug for Service<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("store", &self.store)
            .field("middlewares", &self.middlewares.len())
            .finish()
    }
}
