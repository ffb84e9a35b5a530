//! Sorted sets of component keys.
//!
//! A signature describes the shape of an entity (the keys it holds) or a
//! filter over shapes (the keys a query or observer requires).

use std::fmt;

use tessera_foundation::ComponentKey;

/// A set of component keys, kept sorted for consistent identity.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature<K: ComponentKey> {
    keys: Vec<K>,
}

impl<K: ComponentKey> Signature<K> {
    /// Creates a new empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self { keys: Vec::new() }
    }

    /// Creates a signature from a list of keys.
    #[must_use]
    pub fn from_keys(mut keys: Vec<K>) -> Self {
        keys.sort_unstable();
        keys.dedup();
        Self { keys }
    }

    /// Returns the keys in sorted order.
    #[must_use]
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Iterates the keys in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = K> + '_ {
        self.keys.iter().copied()
    }

    /// Returns the number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the signature holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Checks if this signature contains a key.
    #[must_use]
    pub fn contains(&self, key: K) -> bool {
        self.keys.binary_search(&key).is_ok()
    }

    /// Checks if this signature contains every key of `other`.
    #[must_use]
    pub fn contains_all(&self, other: &Self) -> bool {
        other.keys.iter().all(|key| self.contains(*key))
    }

    /// Checks if the two signatures share at least one key.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        other.keys.iter().any(|key| self.contains(*key))
    }

    /// Adds a key. Returns true if it was not already present.
    pub fn insert(&mut self, key: K) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(pos) => {
                self.keys.insert(pos, key);
                true
            }
        }
    }

    /// Removes a key. Returns true if it was present.
    pub fn remove(&mut self, key: K) -> bool {
        match self.keys.binary_search(&key) {
            Ok(pos) => {
                self.keys.remove(pos);
                true
            }
            Err(_) => false,
        }
    }

    /// Adds every key of `other`.
    pub fn insert_all(&mut self, other: &Self) {
        for key in &other.keys {
            self.insert(*key);
        }
    }

    /// Removes every key of `other`.
    pub fn remove_all(&mut self, other: &Self) {
        self.keys.retain(|key| !other.contains(*key));
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        self.keys.clear();
    }
}

impl<K: ComponentKey> Default for Signature<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: ComponentKey> FromIterator<K> for Signature<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::from_keys(iter.into_iter().collect())
    }
}

impl<K: ComponentKey> Extend<K> for Signature<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: ComponentKey> From<&[K]> for Signature<K> {
    fn from(keys: &[K]) -> Self {
        Self::from_keys(keys.to_vec())
    }
}

impl<K: ComponentKey, const N: usize> From<[K; N]> for Signature<K> {
    fn from(keys: [K; N]) -> Self {
        Self::from_keys(keys.to_vec())
    }
}

impl<K: ComponentKey> fmt::Debug for Signature<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.keys.iter().map(|key| key.name()))
            .finish()
    }
}
