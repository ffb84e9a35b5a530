//! Per-transaction signature deltas.

use tessera_foundation::ComponentKey;
use tessera_storage::Signature;

/// Keys added and deleted on one entity during the in-flight transaction.
///
/// A key is never in both sets: a later add cancels a pending delete and
/// the reverse.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Diff<K: ComponentKey> {
    added: Signature<K>,
    deleted: Signature<K>,
}

impl<K: ComponentKey> Diff<K> {
    pub(crate) fn new() -> Self {
        Self {
            added: Signature::new(),
            deleted: Signature::new(),
        }
    }

    pub(crate) fn add(&mut self, key: K) {
        self.added.insert(key);
        self.deleted.remove(key);
    }

    pub(crate) fn delete(&mut self, key: K) {
        self.deleted.insert(key);
        self.added.remove(key);
    }

    pub(crate) fn added(&self) -> &Signature<K> {
        &self.added
    }

    pub(crate) fn deleted(&self) -> &Signature<K> {
        &self.deleted
    }

    /// True if any added or deleted key appears in `watched`.
    pub(crate) fn overlaps(&self, watched: &Signature<K>) -> bool {
        self.added.overlaps(watched) || self.deleted.overlaps(watched)
    }
}

impl<K: ComponentKey> Default for Diff<K> {
    fn default() -> Self {
        Self::new()
    }
}
