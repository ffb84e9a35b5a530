//! Opaque entity identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Opaque entity identifier.
///
/// An id is never interpreted, only compared and hashed. There is no
/// central entity registry: an entity exists as long as at least one
/// component map holds its id.
///
/// Cloning is O(1); the string is shared.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct EntityId(Arc<str>);

impl EntityId {
    /// Creates a new entity ID from anything string-like.
    #[must_use]
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for EntityId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl From<&EntityId> for EntityId {
    fn from(id: &EntityId) -> Self {
        id.clone()
    }
}

impl Borrow<str> for EntityId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for EntityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({:?})", &*self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
