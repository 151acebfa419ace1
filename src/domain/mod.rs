//! Domain layer: tree entities and algorithms
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod error;
pub mod node;
pub mod render;
pub mod rows;
pub mod search;

pub use error::{DomainError, DomainResult};
pub use node::{Side, TreeNode};
pub use render::TreeNodeConvert;
pub use rows::{assemble, flatten, NodeRow, RowSet};
pub use search::{depth_of, distance, edges_between, find_lca, find_node, NOT_FOUND};
