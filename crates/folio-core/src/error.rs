//! Error types for Folio operations.

use std::fmt;

/// The primary error type for all Folio operations.
///
/// Every store call is all-or-nothing: when an operation fails, no partial
/// result accompanies the error.
#[derive(Debug)]
pub enum Error {
    /// Store connectivity lost. Fatal, never retried.
    Unavailable(UnavailableError),
    /// Malformed or incompatible query. Fatal.
    Query(QueryError),
    /// Referential integrity broken on write.
    Constraint(ConstraintError),
    /// An unloaded relationship was read outside a loading strategy.
    NotLoaded(NotLoadedError),
    /// Row-to-entity decode mismatch.
    Type(TypeError),
    /// Custom error with message.
    Custom(String),
}

#[derive(Debug)]
pub struct UnavailableError {
    pub message: String,
}

#[derive(Debug)]
pub struct QueryError {
    pub message: String,
    /// The offending query text or operation name, if known.
    pub query: Option<String>,
}

#[derive(Debug)]
pub struct ConstraintError {
    pub table: &'static str,
    pub column: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct NotLoadedError {
    /// The parent entity's table name.
    pub entity: &'static str,
    /// The relationship field that was still a placeholder.
    pub relationship: &'static str,
}

#[derive(Debug)]
pub struct TypeError {
    pub expected: &'static str,
    pub actual: String,
    pub column: Option<String>,
}

impl Error {
    /// Shorthand for a connectivity failure.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Error::Unavailable(UnavailableError {
            message: message.into(),
        })
    }

    /// Shorthand for a malformed-query failure.
    pub fn query(message: impl Into<String>, query: Option<String>) -> Self {
        Error::Query(QueryError {
            message: message.into(),
            query,
        })
    }

    /// Shorthand for a referential-integrity failure.
    pub fn constraint(table: &'static str, column: &'static str, message: impl Into<String>) -> Self {
        Error::Constraint(ConstraintError {
            table,
            column,
            message: message.into(),
        })
    }

    /// Shorthand for an unloaded-relationship read.
    pub fn not_loaded(entity: &'static str, relationship: &'static str) -> Self {
        Error::NotLoaded(NotLoadedError {
            entity,
            relationship,
        })
    }

    /// Is this a store-unreachable error?
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }

    /// Is this a referential-integrity violation?
    pub fn is_constraint(&self) -> bool {
        matches!(self, Error::Constraint(_))
    }

    /// Is this an unloaded-relationship read?
    pub fn is_not_loaded(&self) -> bool {
        matches!(self, Error::NotLoaded(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Unavailable(e) => write!(f, "Store unavailable: {}", e.message),
            Error::Query(e) => {
                if let Some(query) = &e.query {
                    write!(f, "Query error in '{}': {}", query, e.message)
                } else {
                    write!(f, "Query error: {}", e.message)
                }
            }
            Error::Constraint(e) => write!(
                f,
                "Constraint violation on {}.{}: {}",
                e.table, e.column, e.message
            ),
            Error::NotLoaded(e) => write!(
                f,
                "Relationship '{}' on '{}' is not loaded; run a loading strategy before reading it",
                e.relationship, e.entity
            ),
            Error::Type(e) => {
                if let Some(col) = &e.column {
                    write!(
                        f,
                        "Type error in column '{}': expected {}, found {}",
                        col, e.expected, e.actual
                    )
                } else {
                    write!(f, "Type error: expected {}, found {}", e.expected, e.actual)
                }
            }
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<UnavailableError> for Error {
    fn from(err: UnavailableError) -> Self {
        Error::Unavailable(err)
    }
}

impl From<QueryError> for Error {
    fn from(err: QueryError) -> Self {
        Error::Query(err)
    }
}

impl From<ConstraintError> for Error {
    fn from(err: ConstraintError) -> Self {
        Error::Constraint(err)
    }
}

impl From<NotLoadedError> for Error {
    fn from(err: NotLoadedError) -> Self {
        Error::NotLoaded(err)
    }
}

impl From<TypeError> for Error {
    fn from(err: TypeError) -> Self {
        Error::Type(err)
    }
}

/// Result type alias for Folio operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_match_variants() {
        assert!(Error::unavailable("connection refused").is_unavailable());
        assert!(Error::constraint("books", "author_id", "no such author").is_constraint());
        assert!(Error::not_loaded("authors", "books").is_not_loaded());
        assert!(!Error::Custom("other".to_string()).is_unavailable());
    }

    #[test]
    fn display_includes_context() {
        let err = Error::constraint("books", "author_id", "author 7 does not exist");
        let s = err.to_string();
        assert!(s.contains("books.author_id"));
        assert!(s.contains("author 7 does not exist"));

        let err = Error::not_loaded("authors", "books");
        assert!(err.to_string().contains("not loaded"));
    }

    #[test]
    fn query_error_carries_operation_name() {
        let err = Error::query("author id must be positive", Some("books_for_author".to_string()));
        let s = err.to_string();
        assert!(s.contains("books_for_author"));
        assert!(s.contains("must be positive"));
    }

    #[test]
    fn payload_structs_convert_into_error() {
        let err: Error = TypeError {
            expected: "BIGINT",
            actual: "TEXT".to_string(),
            column: Some("id".to_string()),
        }
        .into();
        assert!(err.to_string().contains("expected BIGINT"));
    }
}
