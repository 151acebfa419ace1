//! Application layer: the name-bound tree and its use cases
//!
//! This layer orchestrates domain logic and depends on the port traits.

pub mod error;
pub mod error_ext;
pub mod transfer;
pub mod tree;

pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use transfer::{backup_name, parse_row_set, read_row_file, render_row_set};
pub use tree::{Tree, EXISTS_FAILED, LOAD_FAILED, SAVE_FAILED};
