//! Core types for Folio.
//!
//! `folio-core` holds everything the store and the loading strategies share:
//!
//! - [`Value`] / [`Row`] — dynamically-typed store rows with shared column
//!   metadata and `table__column` alias projection for joined results.
//! - [`Entity`] — struct-to-row mapping for the two catalog tables.
//! - [`HasMany`] — the explicit Unloaded/Loaded relationship collection;
//!   reading a placeholder is an [`Error::NotLoaded`], never silent I/O.
//! - [`Author`] / [`Book`] — the catalog data model (one-to-many, single
//!   foreign key on the book side).
//! - [`Error`] / [`Result`] — the workspace-wide error taxonomy.

pub mod catalog;
pub mod entity;
pub mod error;
pub mod relation;
pub mod row;
pub mod value;

pub use catalog::{Author, Book};
pub use entity::Entity;
pub use error::{
    ConstraintError, Error, NotLoadedError, QueryError, Result, TypeError, UnavailableError,
};
pub use relation::HasMany;
pub use row::{ColumnInfo, FromValue, Row, aliased};
pub use value::Value;
