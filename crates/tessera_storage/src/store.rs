//! Component storage keyed by component, then entity.
//!
//! The store knows nothing about transactions, middleware or queries
//! beyond single-key lookups. Every operation is total over well-typed
//! keys.

use std::collections::HashMap;

use tessera_foundation::{EntityId, Schema};

/// Stores all component data for entities.
///
/// Components are stored as maps from entity ID to value, one map per
/// component key. A key's map is created lazily on its first write; an
/// absent map reads as an empty one. Deleting a value removes the entry,
/// so a present entry always holds a value.
///
/// The per-key maps are persistent, so cloning a store is cheap and
/// shares structure with the original.
#[derive(Clone, Debug)]
pub struct Store<S: Schema> {
    /// Component data: component -> entity -> value.
    data: HashMap<S::Key, im::HashMap<EntityId, S>>,
}

impl<S: Schema> Store<S> {
    /// Creates a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Iterates the ids of entities holding a component.
    ///
    /// Each call starts a fresh pass over the current contents.
    pub fn entity_ids(&self, key: S::Key) -> impl Iterator<Item = &EntityId> + '_ {
        self.data
            .get(&key)
            .into_iter()
            .flat_map(|entities| entities.keys())
    }

    /// Iterates the component keys an entity currently holds, in
    /// [`Schema::KEYS`] order.
    pub fn signature<'a>(&'a self, entity: &'a EntityId) -> impl Iterator<Item = S::Key> + 'a {
        S::KEYS
            .iter()
            .copied()
            .filter(move |key| self.contains(entity, *key))
    }

    /// Gets a component value for an entity.
    #[must_use]
    pub fn value(&self, entity: &EntityId, key: S::Key) -> Option<&S> {
        self.data.get(&key)?.get(entity)
    }

    /// Checks if an entity has a component.
    #[must_use]
    pub fn contains(&self, entity: &EntityId, key: S::Key) -> bool {
        self.data
            .get(&key)
            .is_some_and(|entities| entities.contains_key(entity))
    }

    /// Sets a component on an entity, under the key the value belongs to.
    ///
    /// Returns the value it replaced, if any.
    pub fn set_value(&mut self, entity: EntityId, value: S) -> Option<S> {
        self.data.entry(value.key()).or_default().insert(entity, value)
    }

    /// Removes a component from an entity.
    ///
    /// Returns the removed value if it existed.
    pub fn delete_value(&mut self, entity: &EntityId, key: S::Key) -> Option<S> {
        self.data.get_mut(&key)?.remove(entity)
    }

    /// Returns the number of entities holding a component.
    #[must_use]
    pub fn count(&self, key: S::Key) -> usize {
        self.data.get(&key).map_or(0, im::HashMap::len)
    }

    /// Returns true if no entity holds any component.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.values().all(im::HashMap::is_empty)
    }
}

impl<S: Schema> Default for Store<S> {
    fn default() -> Self {
        Self::new()
    }
}
