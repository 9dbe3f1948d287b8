//! The entity store trait.

use folio_core::{Author, Book, Result, Row};

/// Durable, queryable storage for the author/book catalog.
///
/// The three `authors_*` operations return the same logical content in
/// different shapes; they differ only in how many fetch operations they
/// issue. [`EntityStore::fetches`] exposes the running count so callers can
/// observe the round-trip cost of each loading strategy.
///
/// Every call is all-or-nothing: a failing operation returns an error and
/// no partial result.
pub trait EntityStore: Send + Sync {
    /// Insert an author, assigning and returning its identity.
    fn insert_author(&self, author: Author) -> Result<Author>;

    /// Insert a book, assigning and returning its identity.
    ///
    /// Fails with [`folio_core::Error::Constraint`] when the book's
    /// `author_id` does not reference an existing author.
    fn insert_book(&self, book: Book) -> Result<Book>;

    /// Every author, with the `books` relationship left unloaded.
    ///
    /// One fetch operation.
    fn authors_basic(&self) -> Result<Vec<Author>>;

    /// Every author with `books` pre-resolved via two coordinated scans:
    /// one over authors, one over all books keyed by author id.
    ///
    /// Two fetch operations regardless of the author count; an empty
    /// author table needs no book scan and costs one.
    fn authors_with_books_eager(&self) -> Result<Vec<Author>>;

    /// The raw result set of a single left outer join between authors and
    /// books, with every column aliased as `table__column`.
    ///
    /// One row per (author, book) pair; an author with no books yields one
    /// row whose `books__*` columns are all NULL. Duplicated author rows
    /// are the caller's to coalesce. Exactly one fetch operation.
    fn authors_with_books_joined(&self) -> Result<Vec<Row>>;

    /// The books belonging to one author — the follow-up query a naive
    /// per-parent loader issues.
    ///
    /// One fetch operation. Fails with [`folio_core::Error::Query`] for a
    /// non-positive author id.
    fn books_for_author(&self, author_id: i64) -> Result<Vec<Book>>;

    /// Number of fetch operations issued so far.
    fn fetches(&self) -> u64;
}
