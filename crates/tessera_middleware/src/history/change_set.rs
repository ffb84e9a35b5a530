//! Forward/backward patches produced by one transaction.

use tessera_engine::Patch;
use tessera_foundation::{EntityId, Schema};

// =============================================================================
// Entity Snapshot
// =============================================================================

/// The net effect of one transaction on one entity.
///
/// The forward patch holds the final value (or delete) per component. The
/// backward patch holds the value each component had before its first
/// change in the transaction, or a delete if it did not exist; values
/// written in between are not kept.
#[derive(Clone, Debug, PartialEq)]
pub struct EntitySnapshot<S: Schema> {
    forward: Patch<S>,
    backward: Patch<S>,
}

impl<S: Schema> EntitySnapshot<S> {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            forward: Patch::new(),
            backward: Patch::new(),
        }
    }

    /// Returns the patch that replays the transaction.
    #[must_use]
    pub fn forward(&self) -> &Patch<S> {
        &self.forward
    }

    /// Returns the patch that undoes the transaction.
    #[must_use]
    pub fn backward(&self) -> &Patch<S> {
        &self.backward
    }

    pub(crate) fn record_set(&mut self, value: &S, prior: Option<&S>) {
        self.backward.record_first(value.key(), prior.cloned());
        self.forward.insert(value.clone());
    }

    pub(crate) fn record_delete(&mut self, key: S::Key, prior: Option<&S>) {
        self.backward.record_first(key, prior.cloned());
        self.forward.remove(key);
    }
}

impl<S: Schema> Default for EntitySnapshot<S> {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Change Set
// =============================================================================

/// Per-entity snapshots of one committed transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct ChangeSet<S: Schema> {
    snapshots: im::OrdMap<EntityId, EntitySnapshot<S>>,
}

impl<S: Schema> ChangeSet<S> {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: im::OrdMap::new(),
        }
    }

    /// Gets the snapshot of one entity.
    #[must_use]
    pub fn get(&self, entity: &EntityId) -> Option<&EntitySnapshot<S>> {
        self.snapshots.get(entity)
    }

    /// Iterates the snapshots in entity id order.
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &EntitySnapshot<S>)> + '_ {
        self.snapshots.iter()
    }

    /// Returns the number of entities touched.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Returns true if no entity was touched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub(crate) fn snapshot_mut(&mut self, entity: &EntityId) -> &mut EntitySnapshot<S> {
        self.snapshots
            .entry(entity.clone())
            .or_insert_with(EntitySnapshot::new)
    }
}

impl<S: Schema> Default for ChangeSet<S> {
    fn default() -> Self {
        Self::new()
    }
}
