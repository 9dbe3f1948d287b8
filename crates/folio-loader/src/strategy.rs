//! The three relationship loading strategies.
//!
//! Every strategy produces the same logical result: all authors with their
//! `books` relationship resolved to a loaded collection. They differ only in
//! how many fetch operations they issue against the store:
//!
//! | strategy | fetches for N authors |
//! |----------|-----------------------|
//! | naive    | 1 + N                 |
//! | eager    | 2                     |
//! | joined   | 1                     |

use folio_core::{Author, Book, Entity, Error, Result};
use folio_store::EntityStore;

/// A way of loading all authors with their books resolved.
///
/// Implementations must return every author with `books` in the loaded
/// state, including authors with no books (loaded-empty, not unloaded).
pub trait FetchStrategy {
    /// Short name used in logs and tracker records.
    fn name(&self) -> &'static str;

    /// Load all authors with their books resolved.
    fn load(&self, store: &dyn EntityStore) -> Result<Vec<Author>>;
}

/// The N+1 anti-pattern: one fetch for the authors, then one follow-up
/// fetch per author for its books.
#[derive(Debug, Default, Clone, Copy)]
pub struct NaiveFetch;

/// Two coordinated fetches: authors, then all books batched by author id.
#[derive(Debug, Default, Clone, Copy)]
pub struct EagerFetch;

/// One left-outer-join fetch; duplicated parent rows are coalesced here,
/// in first-seen order.
#[derive(Debug, Default, Clone, Copy)]
pub struct JoinedFetch;

impl FetchStrategy for NaiveFetch {
    fn name(&self) -> &'static str {
        "naive"
    }

    fn load(&self, store: &dyn EntityStore) -> Result<Vec<Author>> {
        let authors = store.authors_basic()?;
        for author in &authors {
            let id = author.id.ok_or_else(|| {
                Error::Custom(format!("author '{}' has no identity", author.name))
            })?;
            // One round-trip per parent. This is the point.
            let books = store.books_for_author(id)?;
            let _ = author.books.set_loaded(books);
        }
        Ok(authors)
    }
}

impl FetchStrategy for EagerFetch {
    fn name(&self) -> &'static str {
        "eager"
    }

    fn load(&self, store: &dyn EntityStore) -> Result<Vec<Author>> {
        store.authors_with_books_eager()
    }
}

impl FetchStrategy for JoinedFetch {
    fn name(&self) -> &'static str {
        "joined"
    }

    fn load(&self, store: &dyn EntityStore) -> Result<Vec<Author>> {
        let rows = store.authors_with_books_joined()?;
        let author_prefix = format!("{}__", Author::TABLE_NAME);
        let book_prefix = format!("{}__", Book::TABLE_NAME);

        // Coalesce duplicated parent rows, preserving first-seen order.
        let mut authors: Vec<Author> = Vec::new();
        let mut books: Vec<Vec<Book>> = Vec::new();
        let mut index_of: std::collections::HashMap<i64, usize> =
            std::collections::HashMap::new();

        for row in &rows {
            let author_half = row.strip_prefix(&author_prefix).ok_or_else(|| {
                Error::Custom("joined row is missing its author columns".to_string())
            })?;
            let author = Author::from_row(&author_half)?;
            let id = author.id.ok_or_else(|| {
                Error::Custom(format!("author '{}' has no identity", author.name))
            })?;

            let slot = *index_of.entry(id).or_insert_with(|| {
                authors.push(author);
                books.push(Vec::new());
                authors.len() - 1
            });

            // An outer-join row for a bookless author carries NULL book
            // columns; there is no child to decode.
            if let Some(book_half) = row.strip_prefix(&book_prefix) {
                if book_half.get_named::<Option<i64>>("id")?.is_some() {
                    books[slot].push(Book::from_row(&book_half)?);
                }
            }
        }

        for (author, list) in authors.iter().zip(books) {
            let _ = author.books.set_loaded(list);
        }
        Ok(authors)
    }
}
