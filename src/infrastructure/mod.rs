//! Infrastructure layer: persistence adapters, ports and DI container
//!
//! This layer implements the port traits and wires up services.

pub mod di;
pub mod error;
pub mod sqlite;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteTreeStore;
pub use traits::{ConsoleNotifier, Notifier, TreeLoader, TreeSaver};
