//! Explicit two-state relationship collections.
//!
//! A one-to-many relationship starts as an unresolved placeholder and only
//! becomes readable once a loading strategy has materialized it. Reading an
//! unloaded collection is an explicit [`Error::NotLoaded`] rather than
//! silent extra I/O, which makes the N+1 pattern observable in tests.

use crate::entity::Entity;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// A collection of related child entities (one-to-many).
///
/// Two states:
/// - **Unloaded**: the collection has not been fetched yet; any read via
///   [`HasMany::try_get`] fails with `NotLoaded`.
/// - **Loaded**: the children have been fetched and cached; loading is
///   one-shot per instance.
pub struct HasMany<T: Entity> {
    /// The loaded children (set at most once).
    loaded: OnceLock<Vec<T>>,
    /// The relationship field name, used in NotLoaded errors.
    relationship: &'static str,
}

impl<T: Entity> HasMany<T> {
    /// Create a new unloaded collection for the named relationship.
    #[must_use]
    pub fn unloaded(relationship: &'static str) -> Self {
        Self {
            loaded: OnceLock::new(),
            relationship,
        }
    }

    /// Create an already-loaded collection.
    #[must_use]
    pub fn loaded(relationship: &'static str, children: Vec<T>) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(children);
        Self {
            loaded: cell,
            relationship,
        }
    }

    /// Check if the collection has been loaded.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Read the loaded children, failing with `NotLoaded` on a placeholder.
    ///
    /// A strategy that completes must leave every collection loaded, so a
    /// `NotLoaded` here means a strategy bug, not a recoverable state.
    pub fn try_get(&self) -> Result<&[T]> {
        self.loaded
            .get()
            .map(Vec::as_slice)
            .ok_or_else(|| Error::not_loaded(T::TABLE_NAME, self.relationship))
    }

    /// Read the loaded children without error detail (None if unloaded).
    #[must_use]
    pub fn get(&self) -> Option<&[T]> {
        self.loaded.get().map(Vec::as_slice)
    }

    /// Number of loaded children (0 if unloaded).
    #[must_use]
    pub fn len(&self) -> usize {
        self.loaded.get().map_or(0, Vec::len)
    }

    /// True when unloaded or loaded empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.loaded.get().is_none_or(Vec::is_empty)
    }

    /// Iterate over the loaded children.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.loaded.get().into_iter().flatten()
    }

    /// Set the loaded children (used by loading strategies and the store).
    ///
    /// Fails if the collection was already loaded, returning the rejected
    /// children.
    pub fn set_loaded(&self, children: Vec<T>) -> std::result::Result<(), Vec<T>> {
        self.loaded.set(children)
    }

    /// The relationship field name.
    #[must_use]
    pub fn relationship(&self) -> &'static str {
        self.relationship
    }
}

impl<T: Entity + Clone> Clone for HasMany<T> {
    fn clone(&self) -> Self {
        let cloned = Self {
            loaded: OnceLock::new(),
            relationship: self.relationship,
        };
        if let Some(children) = self.loaded.get() {
            let _ = cloned.loaded.set(children.clone());
        }
        cloned
    }
}

impl<T: Entity + fmt::Debug> fmt::Debug for HasMany<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.is_loaded() {
            "loaded"
        } else {
            "unloaded"
        };
        f.debug_struct("HasMany")
            .field("relationship", &self.relationship)
            .field("state", &state)
            .field("children", &self.loaded.get())
            .finish()
    }
}

impl<T: Entity + PartialEq> PartialEq for HasMany<T> {
    fn eq(&self, other: &Self) -> bool {
        self.relationship == other.relationship && self.loaded.get() == other.loaded.get()
    }
}

impl<'a, T: Entity> IntoIterator for &'a HasMany<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.loaded.get().map_or([].iter(), |v| v.iter())
    }
}

impl<T> Serialize for HasMany<T>
where
    T: Entity + Serialize,
{
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        // Unloaded serializes as null so the placeholder state stays
        // distinguishable from a loaded-empty list.
        match self.loaded.get() {
            Some(children) => children.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de, T> Deserialize<'de> for HasMany<T>
where
    T: Entity + Deserialize<'de>,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let opt = Option::<Vec<T>>::deserialize(deserializer)?;
        Ok(match opt {
            Some(children) => Self::loaded("", children),
            None => Self::unloaded(""),
        })
    }
}
