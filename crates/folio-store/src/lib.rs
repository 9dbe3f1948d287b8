//! Entity storage for the Folio catalog.
//!
//! [`EntityStore`] is the fetch boundary the loading strategies are measured
//! against: every read operation declares how many fetch operations it
//! issues, and the store keeps a running count. [`MemoryStore`] is the
//! row-backed in-memory implementation, with fault injection for exercising
//! failure paths.

pub mod memory;
pub mod store;

pub use memory::MemoryStore;
pub use store::EntityStore;
