//! SQLite implementation of the persistence port
//!
//! Every operation opens its own connection, so the connection (and any
//! open transaction) is released on every exit path. An uncommitted
//! transaction rolls back when dropped.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{params, Connection};
use tracing::{debug, info, instrument};

use crate::domain::{assemble, flatten, NodeRow, TreeNode};
use crate::infrastructure::error::SqliteResultExt;
use crate::infrastructure::traits::{TreeLoader, TreeSaver};
use crate::infrastructure::{StoreError, StoreResult};

/// Table holding one row per node per tree.
pub const TABLE: &str = "tree_nodes";

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS tree_nodes (
    tree_name   TEXT    NOT NULL,
    node_name   TEXT    NOT NULL,
    weight      INTEGER NOT NULL,
    left_child  TEXT,
    right_child TEXT,
    PRIMARY KEY (tree_name, node_name)
)";

const SELECT_ROWS: &str = "SELECT node_name, weight, left_child, right_child
    FROM tree_nodes WHERE tree_name = ?1 ORDER BY rowid";
const COUNT_ROWS: &str = "SELECT COUNT(*) FROM tree_nodes WHERE tree_name = ?1";
const DELETE_ROWS: &str = "DELETE FROM tree_nodes WHERE tree_name = ?1";
const INSERT_ROW: &str = "INSERT INTO tree_nodes
    (tree_name, node_name, weight, left_child, right_child)
    VALUES (?1, ?2, ?3, ?4, ?5)";

/// Tree store backed by a single SQLite database file.
#[derive(Debug, Clone)]
pub struct SqliteTreeStore {
    path: PathBuf,
    busy_timeout: Duration,
}

impl SqliteTreeStore {
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Self {
            path: path.into(),
            busy_timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection and make sure the schema exists.
    #[instrument(level = "trace", skip(self), fields(path = %self.path.display()))]
    fn connect(&self) -> StoreResult<Connection> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::io(format!("create directory {}", parent.display()), e)
                })?;
            }
        }

        let conn = Connection::open(&self.path).map_err(|source| StoreError::Open {
            path: self.path.clone(),
            source,
        })?;
        conn.busy_timeout(self.busy_timeout)
            .with_context("set busy timeout", TABLE)?;
        conn.execute_batch(SCHEMA)
            .with_context("create schema", TABLE)?;
        Ok(conn)
    }

    /// All rows stored under `tree_name`, in insertion order.
    #[instrument(level = "debug", skip(self))]
    pub fn rows(&self, tree_name: &str) -> StoreResult<Vec<NodeRow>> {
        let conn = self.connect()?;
        let mut stmt = conn
            .prepare(SELECT_ROWS)
            .with_context("prepare select", tree_name)?;
        let rows = stmt
            .query_map(params![tree_name], |row| {
                Ok(NodeRow {
                    node_name: row.get(0)?,
                    weight: row.get(1)?,
                    left_child: row.get(2)?,
                    right_child: row.get(3)?,
                })
            })
            .with_context("select rows", tree_name)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .with_context("read rows", tree_name)?;
        debug!("read {} rows for {}", rows.len(), tree_name);
        Ok(rows)
    }

    /// Atomically replace the rows stored under `tree_name`.
    #[instrument(level = "debug", skip(self, rows), fields(rows = rows.len()))]
    pub fn replace_rows(&self, tree_name: &str, rows: &[NodeRow]) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn
            .transaction()
            .with_context("begin transaction", tree_name)?;

        let deleted = tx
            .execute(DELETE_ROWS, params![tree_name])
            .with_context("delete rows", tree_name)?;
        debug!("deleted {} existing rows for {}", deleted, tree_name);

        {
            let mut stmt = tx
                .prepare(INSERT_ROW)
                .with_context("prepare insert", tree_name)?;
            for row in rows {
                stmt.execute(params![
                    tree_name,
                    row.node_name,
                    row.weight,
                    row.left_child,
                    row.right_child
                ])
                .with_context("insert row", tree_name)?;
            }
        }

        tx.commit().with_context("commit", tree_name)?;
        info!("stored {} nodes for {}", rows.len(), tree_name);
        Ok(())
    }
}

impl TreeLoader for SqliteTreeStore {
    #[instrument(level = "debug", skip(self))]
    fn load_tree(&self, tree_name: &str) -> StoreResult<Option<TreeNode>> {
        let rows = self.rows(tree_name)?;
        Ok(assemble(rows)?)
    }

    #[instrument(level = "debug", skip(self))]
    fn tree_exists(&self, tree_name: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        let count: i64 = conn
            .query_row(COUNT_ROWS, params![tree_name], |row| row.get(0))
            .with_context("count rows", tree_name)?;
        Ok(count > 0)
    }
}

impl TreeSaver for SqliteTreeStore {
    #[instrument(level = "debug", skip(self, root))]
    fn save_tree(&self, tree_name: &str, root: Option<&TreeNode>) -> StoreResult<()> {
        self.replace_rows(tree_name, &flatten(root))
    }
}
