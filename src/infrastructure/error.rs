//! Infrastructure-level errors (persistence failures)

use std::path::PathBuf;

use thiserror::Error;

use crate::domain::DomainError;

/// Failure of the persistence layer. This is the only error kind that
/// reaches the `Tree` boundary.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("database error: {context}")]
    Sqlite {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("cannot open database {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("stored tree is malformed: {0}")]
    Integrity(#[from] DomainError),
}

impl StoreError {
    /// Create a database error with context.
    pub fn sqlite(context: impl Into<String>, source: rusqlite::Error) -> Self {
        Self::Sqlite {
            context: context.into(),
            source,
        }
    }

    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type for persistence operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Extension trait for attaching context to `rusqlite` results.
pub trait SqliteResultExt<T> {
    fn with_context(self, action: &str, tree_name: &str) -> StoreResult<T>;
}

impl<T> SqliteResultExt<T> for rusqlite::Result<T> {
    fn with_context(self, action: &str, tree_name: &str) -> StoreResult<T> {
        self.map_err(|e| StoreError::sqlite(format!("{}: {}", action, tree_name), e))
    }
}
