//! In-memory entity store.

use crate::store::EntityStore;
use folio_core::{Author, Book, ColumnInfo, Entity, Error, Result, Row, Value, aliased};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

/// Row-backed tables with monotonically assigned identities.
#[derive(Debug, Default)]
struct Tables {
    authors: Vec<Row>,
    books: Vec<Row>,
    next_author_id: i64,
    next_book_id: i64,
}

/// An in-memory [`EntityStore`] with fetch-operation accounting and fault
/// injection.
///
/// Inserts are not fetch operations; only the read paths count against
/// [`EntityStore::fetches`]. The store enforces referential integrity on
/// `insert_book` and can simulate lost connectivity via
/// [`MemoryStore::set_unavailable`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fetches: AtomicU64,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate lost connectivity: while set, every call fails with
    /// [`Error::Unavailable`].
    pub fn set_unavailable(&self, unavailable: bool) {
        if unavailable {
            tracing::warn!(target: "folio::store", "store marked unavailable");
        }
        self.unavailable.store(unavailable, Ordering::Release);
    }

    /// Reset the fetch-operation counter.
    pub fn reset_fetches(&self) {
        self.fetches.store(0, Ordering::Release);
    }

    /// Insert an author with the given books in one call. Test/demo helper.
    pub fn seed(&self, name: &str, book_names: &[&str]) -> Result<Author> {
        let author = self.insert_author(Author::new(name))?;
        let author_id = author
            .id
            .ok_or_else(|| Error::Custom("insert did not assign an identity".to_string()))?;
        for book_name in book_names {
            self.insert_book(Book::new(*book_name, author_id))?;
        }
        Ok(author)
    }

    fn guard(&self) -> Result<()> {
        if self.unavailable.load(Ordering::Acquire) {
            return Err(Error::unavailable("connection to the entity store lost"));
        }
        Ok(())
    }

    fn record_fetch(&self) {
        self.fetches.fetch_add(1, Ordering::Relaxed);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Tables> {
        match self.tables.lock() {
            Ok(guard) => guard,
            // The store holds plain rows; a poisoned lock cannot leave them
            // half-written, so recover the data.
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn row_for<E: Entity>(entity: &E) -> Row {
        let (names, values): (Vec<_>, Vec<_>) = entity
            .to_row()
            .into_iter()
            .map(|(n, v)| (n.to_string(), v))
            .unzip();
        Row::new(names, values)
    }
}

impl EntityStore for MemoryStore {
    fn insert_author(&self, mut author: Author) -> Result<Author> {
        self.guard()?;
        let mut tables = self.lock();
        tables.next_author_id += 1;
        author.id = Some(tables.next_author_id);
        let row = Self::row_for(&author);
        tables.authors.push(row);
        tracing::debug!(target: "folio::store", id = author.id, name = %author.name, "author inserted");
        Ok(author)
    }

    fn insert_book(&self, mut book: Book) -> Result<Book> {
        self.guard()?;
        let mut tables = self.lock();
        if let Some(author_id) = book.author_id {
            let exists = tables
                .authors
                .iter()
                .any(|row| row.get_named::<i64>(Author::PRIMARY_KEY).ok() == Some(author_id));
            if !exists {
                return Err(Error::constraint(
                    Book::TABLE_NAME,
                    Book::AUTHOR_FK,
                    format!("author {} does not exist", author_id),
                ));
            }
        }
        tables.next_book_id += 1;
        book.id = Some(tables.next_book_id);
        let row = Self::row_for(&book);
        tables.books.push(row);
        tracing::debug!(target: "folio::store", id = book.id, name = %book.name, "book inserted");
        Ok(book)
    }

    fn authors_basic(&self) -> Result<Vec<Author>> {
        self.guard()?;
        self.record_fetch();
        let tables = self.lock();
        tables.authors.iter().map(Author::from_row).collect()
    }

    fn authors_with_books_eager(&self) -> Result<Vec<Author>> {
        self.guard()?;

        // First coordinated query: the authors themselves.
        self.record_fetch();
        let authors: Vec<Author> = {
            let tables = self.lock();
            tables
                .authors
                .iter()
                .map(Author::from_row)
                .collect::<Result<_>>()?
        };
        if authors.is_empty() {
            // No parents, nothing to batch; skip the second scan.
            return Ok(authors);
        }

        // Second coordinated query: all related books, keyed by author id.
        self.record_fetch();
        let mut by_author: HashMap<i64, Vec<Book>> = HashMap::new();
        {
            let tables = self.lock();
            for row in &tables.books {
                let book = Book::from_row(row)?;
                if let Some(author_id) = book.author_id {
                    by_author.entry(author_id).or_default().push(book);
                }
            }
        }

        for author in &authors {
            let books = author
                .id
                .and_then(|id| by_author.remove(&id))
                .unwrap_or_default();
            // Fresh from from_row, so the one-shot set cannot have fired.
            let _ = author.books.set_loaded(books);
        }
        Ok(authors)
    }

    fn authors_with_books_joined(&self) -> Result<Vec<Row>> {
        self.guard()?;
        self.record_fetch();
        let tables = self.lock();

        let columns = Arc::new(ColumnInfo::new(vec![
            aliased(Author::TABLE_NAME, "id"),
            aliased(Author::TABLE_NAME, "name"),
            aliased(Book::TABLE_NAME, "id"),
            aliased(Book::TABLE_NAME, "name"),
            aliased(Book::TABLE_NAME, Book::AUTHOR_FK),
        ]));

        let mut joined = Vec::new();
        for author_row in &tables.authors {
            let author_id = author_row.get_named::<i64>(Author::PRIMARY_KEY)?;
            let author_name = author_row.get_named::<String>("name")?;

            let matches: Vec<&Row> = tables
                .books
                .iter()
                .filter(|row| {
                    row.get_named::<Option<i64>>(Book::AUTHOR_FK).ok().flatten()
                        == Some(author_id)
                })
                .collect();

            if matches.is_empty() {
                // Left outer join: the author survives with NULL book columns.
                joined.push(Row::with_columns(
                    Arc::clone(&columns),
                    vec![
                        Value::BigInt(author_id),
                        Value::Text(author_name.clone()),
                        Value::Null,
                        Value::Null,
                        Value::Null,
                    ],
                ));
                continue;
            }

            for book_row in matches {
                joined.push(Row::with_columns(
                    Arc::clone(&columns),
                    vec![
                        Value::BigInt(author_id),
                        Value::Text(author_name.clone()),
                        book_row.get("id").cloned().unwrap_or(Value::Null),
                        book_row.get("name").cloned().unwrap_or(Value::Null),
                        book_row.get(Book::AUTHOR_FK).cloned().unwrap_or(Value::Null),
                    ],
                ));
            }
        }
        Ok(joined)
    }

    fn books_for_author(&self, author_id: i64) -> Result<Vec<Book>> {
        self.guard()?;
        if author_id <= 0 {
            return Err(Error::query(
                format!("author id must be positive, got {}", author_id),
                Some("books_for_author".to_string()),
            ));
        }
        self.record_fetch();
        let tables = self.lock();
        tables
            .books
            .iter()
            .filter(|row| {
                row.get_named::<Option<i64>>(Book::AUTHOR_FK).ok().flatten() == Some(author_id)
            })
            .map(Book::from_row)
            .collect()
    }

    fn fetches(&self) -> u64 {
        self.fetches.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_assigns_sequential_identities() {
        let store = MemoryStore::new();
        let a = store.insert_author(Author::new("Orwell")).unwrap();
        let b = store.insert_author(Author::new("Kafka")).unwrap();
        assert_eq!(a.id, Some(1));
        assert_eq!(b.id, Some(2));
        assert_eq!(store.fetches(), 0);
    }

    #[test]
    fn insert_book_enforces_referential_integrity() {
        let store = MemoryStore::new();
        let err = store.insert_book(Book::new("Orphan", 999)).unwrap_err();
        assert!(err.is_constraint());

        // The failed insert must not have committed anything.
        let author = store.insert_author(Author::new("Orwell")).unwrap();
        let book = store
            .insert_book(Book::new("1984", author.id.unwrap()))
            .unwrap();
        assert_eq!(book.id, Some(1));
    }

    #[test]
    fn basic_fetch_leaves_books_unloaded() {
        let store = MemoryStore::new();
        store.seed("Orwell", &["1984"]).unwrap();

        let authors = store.authors_basic().unwrap();
        assert_eq!(authors.len(), 1);
        assert!(!authors[0].books.is_loaded());
        assert!(authors[0].books.try_get().unwrap_err().is_not_loaded());
        assert_eq!(store.fetches(), 1);
    }

    #[test]
    fn eager_fetch_costs_two_operations() {
        let store = MemoryStore::new();
        store.seed("Orwell", &["1984", "Animal Farm"]).unwrap();
        store.seed("Kafka", &[]).unwrap();

        let authors = store.authors_with_books_eager().unwrap();
        assert_eq!(store.fetches(), 2);
        assert_eq!(authors.len(), 2);
        assert_eq!(authors[0].books.try_get().unwrap().len(), 2);
        // Zero-book author resolves to loaded-empty, not a placeholder.
        assert!(authors[1].books.is_loaded());
        assert!(authors[1].books.try_get().unwrap().is_empty());
    }

    #[test]
    fn joined_fetch_is_one_operation_with_duplicated_parents() {
        let store = MemoryStore::new();
        store.seed("Orwell", &["1984", "Animal Farm"]).unwrap();
        store.seed("Kafka", &[]).unwrap();

        let rows = store.authors_with_books_joined().unwrap();
        assert_eq!(store.fetches(), 1);
        // Two book rows for Orwell plus one all-NULL-books row for Kafka.
        assert_eq!(rows.len(), 3);

        let orwell_rows: Vec<_> = rows
            .iter()
            .filter(|r| r.get_named::<i64>("authors__id").unwrap() == 1)
            .collect();
        assert_eq!(orwell_rows.len(), 2);

        let kafka_row = rows
            .iter()
            .find(|r| r.get_named::<i64>("authors__id").unwrap() == 2)
            .unwrap();
        assert!(kafka_row.get("books__id").unwrap().is_null());
    }

    #[test]
    fn books_for_author_filters_by_owner() {
        let store = MemoryStore::new();
        let orwell = store.seed("Orwell", &["1984"]).unwrap();
        store.seed("Kafka", &["The Trial"]).unwrap();

        let books = store.books_for_author(orwell.id.unwrap()).unwrap();
        assert_eq!(books.len(), 1);
        assert_eq!(books[0].name, "1984");

        // Unknown but well-formed id: empty result, not an error.
        assert!(store.books_for_author(42).unwrap().is_empty());
    }

    #[test]
    fn books_for_author_rejects_malformed_id() {
        let store = MemoryStore::new();
        let before = store.fetches();
        let err = store.books_for_author(0).unwrap_err();
        assert!(matches!(err, Error::Query(_)));
        // A rejected query never reaches the store.
        assert_eq!(store.fetches(), before);
    }

    #[test]
    fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.seed("Orwell", &["1984"]).unwrap();
        store.set_unavailable(true);

        assert!(store.authors_basic().unwrap_err().is_unavailable());
        assert!(store.authors_with_books_eager().unwrap_err().is_unavailable());
        assert!(store.authors_with_books_joined().unwrap_err().is_unavailable());
        assert!(store.books_for_author(1).unwrap_err().is_unavailable());
        assert!(
            store
                .insert_author(Author::new("Kafka"))
                .unwrap_err()
                .is_unavailable()
        );
        // No fetch operation was issued while unavailable.
        assert_eq!(store.fetches(), 0);

        store.set_unavailable(false);
        assert_eq!(store.authors_basic().unwrap().len(), 1);
    }

    #[test]
    fn empty_store_returns_empty_sequences() {
        let store = MemoryStore::new();
        assert!(store.authors_basic().unwrap().is_empty());
        assert!(store.authors_with_books_joined().unwrap().is_empty());

        store.reset_fetches();
        assert!(store.authors_with_books_eager().unwrap().is_empty());
        // No authors means no book scan.
        assert_eq!(store.fetches(), 1);
    }

    #[test]
    fn reset_fetches_zeroes_the_counter() {
        let store = MemoryStore::new();
        store.seed("Orwell", &[]).unwrap();
        store.authors_basic().unwrap();
        assert_eq!(store.fetches(), 1);
        store.reset_fetches();
        assert_eq!(store.fetches(), 0);
    }
}
