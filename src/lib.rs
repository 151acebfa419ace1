//! Name-keyed binary trees with lowest-common-ancestor and path-length
//! queries, persisted to a relational store.
//!
//! Layers:
//! - [`domain`]: nodes, search algorithms, row mapping
//! - [`application`]: the name-bound [`application::Tree`] and row files
//! - [`infrastructure`]: port traits, SQLite adapter, DI container
//! - [`cli`]: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::Tree;
pub use domain::TreeNode;
