//! Folio - an author/book catalog with observable relationship loading costs.
//!
//! Folio demonstrates the N+1 query problem and its fixes over a small
//! one-to-many data model. The same authors-with-books result is loaded
//! three ways, each with a measurable fetch cost:
//!
//! - naive: one fetch for the authors, one more per author (1 + N)
//! - eager: authors, then all books in one batch (2)
//! - joined: a single outer join, coalesced in memory (1)
//!
//! # Quick Start
//!
//! ```
//! use folio::prelude::*;
//!
//! fn main_example() -> Result<()> {
//!     let store = MemoryStore::new();
//!     store.seed("George Orwell", &["1984", "Animal Farm"])?;
//!     store.seed("Franz Kafka", &[])?;
//!
//!     let mut service = LoaderService::new(store);
//!     let authors = service.list_authors_with_books(None)?;
//!
//!     for author in &authors {
//!         // Loaded by the strategy; reading it never fetches.
//!         println!("{}: {} books", author.name, author.books.try_get()?.len());
//!     }
//!
//!     // naive cost grew with the author count, the others did not.
//!     assert_eq!(service.tracker().fetches_for("naive"), 3);
//!     assert_eq!(service.tracker().fetches_for("eager"), 2);
//!     assert_eq!(service.tracker().fetches_for("joined"), 1);
//!     Ok(())
//! }
//! # main_example().unwrap();
//! ```

pub use folio_core::{
    Author,
    Book,
    ColumnInfo,
    ConstraintError,
    Entity,
    Error,
    FromValue,
    HasMany,
    NotLoadedError,
    QueryError,
    Result,
    Row,
    TypeError,
    UnavailableError,
    Value,
    aliased,
};

pub use folio_store::{EntityStore, MemoryStore};

pub use folio_loader::{
    EagerFetch, FetchStrategy, JoinedFetch, LoaderService, NaiveFetch, Phase, QueryTracker,
    StrategyRun, TrackerStats,
};

pub mod prelude {
    pub use crate::{
        Author,
        Book,
        // Store
        EntityStore,
        Error,
        // Strategies
        FetchStrategy,
        HasMany,
        // Service
        LoaderService,
        MemoryStore,
        Phase,
        QueryTracker,
        Result,
        Row,
        Value,
    };
}
