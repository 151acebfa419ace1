//! Service container for dependency injection
//!
//! Wires the persistence and notification ports into `Tree` instances.

use std::sync::Arc;

use crate::application::Tree;
use crate::config::Settings;
use crate::infrastructure::traits::{ConsoleNotifier, Notifier, TreeLoader, TreeSaver};
use crate::infrastructure::SqliteTreeStore;

/// Container holding the configured ports.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    pub loader: Arc<dyn TreeLoader>,

    pub saver: Arc<dyn TreeSaver>,

    pub notifier: Arc<dyn Notifier>,
}

impl ServiceContainer {
    /// Create a container backed by the configured SQLite database.
    pub fn new(settings: Settings) -> Self {
        let store = Arc::new(SqliteTreeStore::new(
            settings.database_path.clone(),
            settings.busy_timeout(),
        ));
        Self::with_deps(settings, store.clone(), store, Arc::new(ConsoleNotifier))
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        loader: Arc<dyn TreeLoader>,
        saver: Arc<dyn TreeSaver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        let settings = Arc::new(settings);

        Self {
            settings,
            loader,
            saver,
            notifier,
        }
    }

    /// An empty tree bound to `name`, wired to this container's ports.
    pub fn tree(&self, name: &str) -> Tree {
        Tree::new(
            name,
            Arc::clone(&self.loader),
            Arc::clone(&self.saver),
            Arc::clone(&self.notifier),
        )
    }

    /// Like [`tree`](Self::tree), then loaded from the store.
    pub fn load_tree(&self, name: &str) -> Tree {
        let mut tree = self.tree(name);
        tree.load();
        tree
    }
}
