//! The catalog data model: authors owning books.
//!
//! The store holds a single foreign key on the book side; the author side's
//! `books` collection exists only at the object level and is resolved at
//! read time by a loading strategy.

use crate::Result;
use crate::entity::Entity;
use crate::relation::HasMany;
use crate::row::Row;
use crate::value::Value;
use serde::{Deserialize, Serialize};

/// An author with a store-generated identity and a one-to-many
/// relationship to [`Book`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub id: Option<i64>,
    pub name: String,
    /// Resolved per-query by a loading strategy; starts unloaded.
    pub books: HasMany<Book>,
}

impl Author {
    /// The relationship field name, as used in NotLoaded errors.
    pub const BOOKS: &'static str = "books";

    /// Create a new, not-yet-inserted author.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            books: HasMany::unloaded(Self::BOOKS),
        }
    }
}

impl Entity for Author {
    const TABLE_NAME: &'static str = "authors";

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("name", Value::from(self.name.clone())),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            name: row.get_named("name")?,
            books: HasMany::unloaded(Self::BOOKS),
        })
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }
}

/// A book owning exactly one author reference (the foreign key side).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Option<i64>,
    pub name: String,
    pub author_id: Option<i64>,
}

impl Book {
    /// The foreign key column referencing `authors.id`.
    pub const AUTHOR_FK: &'static str = "author_id";

    /// Create a new, not-yet-inserted book for the given author.
    #[must_use]
    pub fn new(name: impl Into<String>, author_id: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            author_id: Some(author_id),
        }
    }
}

impl Entity for Book {
    const TABLE_NAME: &'static str = "books";

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::from(self.id)),
            ("name", Value::from(self.name.clone())),
            (Self::AUTHOR_FK, Value::from(self.author_id)),
        ]
    }

    fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row.get_named("id")?,
            name: row.get_named("name")?,
            author_id: row.get_named(Self::AUTHOR_FK)?,
        })
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }
}
