//! Row files and backup naming
//!
//! A row file is TOML with one `[[node]]` table per node, using the same
//! columns as the database rows.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{assemble, flatten, RowSet, TreeNode};

/// Name for a timestamped copy of `tree_name`, e.g. `tree1_backup_1700000000000`.
pub fn backup_name(tree_name: &str, now: DateTime<Utc>) -> String {
    format!("{}_backup_{}", tree_name, now.timestamp_millis())
}

/// Parse row-file text and assemble the tree it describes.
pub fn parse_row_set(text: &str, origin: &str) -> ApplicationResult<Option<TreeNode>> {
    let set: RowSet = toml::from_str(text).map_err(|e| ApplicationError::RowFile {
        path: origin.to_string(),
        message: e.to_string(),
    })?;
    debug!("parsed {} rows from {}", set.nodes.len(), origin);
    Ok(assemble(set.nodes)?)
}

#[instrument(level = "debug")]
pub fn read_row_file(path: &Path) -> ApplicationResult<Option<TreeNode>> {
    let text = std::fs::read_to_string(path).with_path_context("read row file", path)?;
    parse_row_set(&text, &path.display().to_string())
}

/// Render a tree as row-file text (pre-order).
pub fn render_row_set(root: Option<&TreeNode>) -> ApplicationResult<String> {
    let set = RowSet {
        nodes: flatten(root),
    };
    toml::to_string_pretty(&set).map_err(|e| ApplicationError::OperationFailed {
        context: "serialize row set".to_string(),
        source: Box::new(e),
    })
}
