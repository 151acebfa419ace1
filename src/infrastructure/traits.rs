//! Port traits for testability
//!
//! `Tree` talks to storage and to the warning sink only through these
//! traits, so services can be tested with stub implementations.

use colored::Colorize;
use tracing::warn;

use crate::domain::TreeNode;
use crate::infrastructure::StoreResult;

/// Read side of the persistence port.
pub trait TreeLoader: Send + Sync {
    /// Load the tree stored under `tree_name`; `None` when no rows exist.
    fn load_tree(&self, tree_name: &str) -> StoreResult<Option<TreeNode>>;

    /// Check whether any rows exist under `tree_name`.
    fn tree_exists(&self, tree_name: &str) -> StoreResult<bool>;
}

/// Write side of the persistence port.
pub trait TreeSaver: Send + Sync {
    /// Replace everything stored under `tree_name` with `root`.
    ///
    /// All-or-nothing: on error the previous rows are left intact.
    /// Saving `None` deletes the tree.
    fn save_tree(&self, tree_name: &str, root: Option<&TreeNode>) -> StoreResult<()>;
}

/// Sink for human-readable operational warnings.
pub trait Notifier: Send + Sync {
    /// Fire-and-forget; must not panic.
    fn send_warning(&self, message: &str);
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Warnings to stderr (yellow "Warning:" prefix) and to the trace log.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn send_warning(&self, message: &str) {
        warn!("{}", message);
        eprintln!("{}: {}", "Warning".yellow(), message);
    }
}
