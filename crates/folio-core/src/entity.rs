//! Entity trait for struct-to-row mapping.

use crate::Result;
use crate::row::Row;
use crate::value::Value;

/// Trait for types stored as rows in the entity store.
///
/// Provides table metadata and conversion in both directions. Relationship
/// fields are excluded from the row form; they are resolved by loading
/// strategies, not persisted.
pub trait Entity: Sized + Send + Sync {
    /// The name of the store table.
    const TABLE_NAME: &'static str;

    /// The primary key column name.
    const PRIMARY_KEY: &'static str = "id";

    /// Convert this entity to a row of (column, value) pairs.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Construct an entity from a store row.
    fn from_row(row: &Row) -> Result<Self>;

    /// Get the store-assigned identity, if the entity has been inserted.
    fn primary_key(&self) -> Option<i64>;

    /// Check if this is a new record (no identity assigned yet).
    fn is_new(&self) -> bool {
        self.primary_key().is_none()
    }
}
