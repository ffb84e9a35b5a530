//! Partial component records.
//!
//! A patch maps component keys to either a new value (set) or `None`
//! (delete). Keys absent from the patch are left untouched when it is
//! applied. Changes apply in key order.

use tessera_foundation::Schema;

use crate::entity::Entity;

/// A partial record of component sets and deletes for one entity.
#[derive(Clone, Debug, PartialEq)]
pub struct Patch<S: Schema> {
    changes: im::OrdMap<S::Key, Option<S>>,
}

impl<S: Schema> Patch<S> {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self {
            changes: im::OrdMap::new(),
        }
    }

    /// Builder method to set a component.
    #[must_use]
    pub fn set(mut self, value: impl Into<S>) -> Self {
        self.insert(value.into());
        self
    }

    /// Builder method to delete a component.
    #[must_use]
    pub fn delete(mut self, key: S::Key) -> Self {
        self.remove(key);
        self
    }

    /// Records a set, replacing any earlier change to the same key.
    pub fn insert(&mut self, value: S) {
        self.changes.insert(value.key(), Some(value));
    }

    /// Records a delete, replacing any earlier change to the same key.
    pub fn remove(&mut self, key: S::Key) {
        self.changes.insert(key, None);
    }

    /// Records a change only if the key has no change yet.
    ///
    /// `value` is the change for `key`: `Some` to set, `None` to delete.
    pub fn record_first(&mut self, key: S::Key, value: Option<S>) {
        debug_assert!(value.as_ref().is_none_or(|v| v.key() == key));
        if !self.changes.contains_key(&key) {
            self.changes.insert(key, value);
        }
    }

    /// Gets the change for a key.
    ///
    /// `None` means the key is untouched; `Some(None)` means delete.
    #[must_use]
    pub fn get(&self, key: S::Key) -> Option<Option<&S>> {
        self.changes.get(&key).map(Option::as_ref)
    }

    /// Checks if the patch touches a key.
    #[must_use]
    pub fn contains_key(&self, key: S::Key) -> bool {
        self.changes.contains_key(&key)
    }

    /// Iterates the changes in key order.
    pub fn iter(&self) -> impl Iterator<Item = (S::Key, Option<&S>)> + '_ {
        self.changes.iter().map(|(key, value)| (*key, value.as_ref()))
    }

    /// Returns the number of touched keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns true if the patch touches no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

impl<S: Schema> Default for Patch<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Schema> IntoIterator for Patch<S> {
    type Item = (S::Key, Option<S>);
    type IntoIter = <im::OrdMap<S::Key, Option<S>> as IntoIterator>::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.changes.into_iter()
    }
}

impl<S: Schema> FromIterator<S> for Patch<S> {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut patch = Self::new();
        for value in iter {
            patch.insert(value);
        }
        patch
    }
}

impl<S: Schema> From<Entity<S>> for Patch<S> {
    /// A patch that sets every component of the view.
    fn from(entity: Entity<S>) -> Self {
        let (_, components) = entity.into_parts();
        components.into_iter().map(|(_, value)| value).collect()
    }
}
