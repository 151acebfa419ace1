//! Name-bound binary tree with persistence orchestration
//!
//! `Tree` owns an optional root and delegates storage to the injected ports.
//! Store failures never escape: each persistence operation reports exactly
//! one warning through the `Notifier` and falls back to a safe result.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::search::to_sentinel;
use crate::domain::{edges_between, find_lca, find_node, TreeNode, NOT_FOUND};
use crate::infrastructure::traits::{Notifier, TreeLoader, TreeSaver};

pub const LOAD_FAILED: &str = "Failed to build tree from database";
pub const SAVE_FAILED: &str = "Failed to save tree to database";
pub const EXISTS_FAILED: &str = "Failed to check tree existence in database";

pub struct Tree {
    name: String,
    root: Option<TreeNode>,
    loader: Arc<dyn TreeLoader>,
    saver: Arc<dyn TreeSaver>,
    notifier: Arc<dyn Notifier>,
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl Tree {
    /// Create an empty tree bound to `name`.
    pub fn new(
        name: impl Into<String>,
        loader: Arc<dyn TreeLoader>,
        saver: Arc<dyn TreeSaver>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            name: name.into(),
            root: None,
            loader,
            saver,
            notifier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_ref()
    }

    /// Replace the whole in-memory structure.
    pub fn set_root(&mut self, root: Option<TreeNode>) {
        self.root = root;
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn find_node(&self, name: &str) -> Option<&TreeNode> {
        find_node(self.root(), name)
    }

    pub fn find_lca(&self, x: &str, y: &str) -> Option<&TreeNode> {
        find_lca(self.root(), x, y)
    }

    /// Edges between `x` and `y`, or `NOT_FOUND` (-1) when the tree is empty
    /// or either node is missing.
    #[instrument(level = "debug", skip(self), fields(tree = %self.name))]
    pub fn path_length(&self, x: &str, y: &str) -> i32 {
        if self.root.is_none() {
            debug!("the tree is empty");
            return NOT_FOUND;
        }
        match edges_between(self.root(), x, y) {
            Some(edges) => to_sentinel(edges),
            None => {
                debug!("one or both of the nodes were not found");
                NOT_FOUND
            }
        }
    }

    /// In-order listing, one `Node: <name>, Weight: <weight>` line per node.
    pub fn inorder_listing(&self) -> Vec<String> {
        match &self.root {
            Some(root) => root
                .inorder()
                .map(|node| format!("Node: {}, Weight: {}", node.name, node.weight))
                .collect(),
            None => vec!["The tree is empty.".to_string()],
        }
    }

    /// Replace the root with the tree stored under this tree's name.
    ///
    /// On failure a warning is sent and the current root is kept.
    /// Returns whether the store answered.
    #[instrument(level = "debug", skip(self), fields(tree = %self.name))]
    pub fn load(&mut self) -> bool {
        match self.loader.load_tree(&self.name) {
            Ok(root) => {
                if root.is_none() {
                    info!("No tree found with name: {}", self.name);
                }
                self.root = root;
                true
            }
            Err(e) => {
                warn!("load {} failed: {}", self.name, e);
                self.notifier.send_warning(LOAD_FAILED);
                false
            }
        }
    }

    /// Store the current structure under `target`, replacing what was there.
    ///
    /// On failure a warning is sent; memory and storage stay as they were.
    /// Returns whether the rows were replaced.
    #[instrument(level = "debug", skip(self), fields(tree = %self.name))]
    pub fn save(&self, target: &str) -> bool {
        let outcome = self
            .loader
            .tree_exists(target)
            .and_then(|existed| self.saver.save_tree(target, self.root()).map(|()| existed));

        match outcome {
            Ok(true) => {
                info!("Updated existing tree: {}", target);
                true
            }
            Ok(false) => {
                info!("Created new tree: {}", target);
                true
            }
            Err(e) => {
                warn!("save {} as {} failed: {}", self.name, target, e);
                self.notifier.send_warning(SAVE_FAILED);
                false
            }
        }
    }

    /// Whether rows exist under `target`; `false` also when the store fails.
    #[instrument(level = "debug", skip(self), fields(tree = %self.name))]
    pub fn exists(&self, target: &str) -> bool {
        self.loader.tree_exists(target).unwrap_or_else(|e| {
            warn!("existence check for {} failed: {}", target, e);
            self.notifier.send_warning(EXISTS_FAILED);
            false
        })
    }
}
