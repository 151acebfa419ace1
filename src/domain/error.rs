//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Integrity violations found while assembling a tree from flat rows.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("duplicate node name in row set: {0}")]
    DuplicateNode(String),

    #[error("no root: every node is referenced as a child")]
    NoRoot,

    #[error("multiple roots: {}", .0.join(", "))]
    MultipleRoots(Vec<String>),

    #[error("node referenced by more than one parent: {0}")]
    SharedNode(String),

    #[error("nodes not reachable from root: {}", .0.join(", "))]
    Unreachable(Vec<String>),
}

pub type DomainResult<T> = Result<T, DomainError>;
