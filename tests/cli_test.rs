//! Tests for command dispatch against a temporary database

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tempfile::TempDir;

use treestore::cli::{execute_command, Cli, CliError};
use treestore::domain::TreeNode;
use treestore::exitcode;
use treestore::infrastructure::traits::{TreeLoader, TreeSaver};
use treestore::infrastructure::SqliteTreeStore;
use treestore::util::testing;

const SAMPLE_ROWS: &str = r#"
[[node]]
node_name = "A"
weight = 10
left_child = "B"
right_child = "C"

[[node]]
node_name = "B"
weight = 20
left_child = "D"

[[node]]
node_name = "C"
weight = 5

[[node]]
node_name = "D"
weight = 10
"#;

struct Fixture {
    _dir: TempDir,
    db: PathBuf,
    rows: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        testing::init_test_setup();
        let dir = TempDir::new().unwrap();
        let db = dir.path().join("trees.db");
        let rows = dir.path().join("tree1.toml");
        fs::write(&rows, SAMPLE_ROWS).unwrap();
        Self {
            _dir: dir,
            db,
            rows,
        }
    }

    fn run(&self, args: &[&str]) -> Result<(), CliError> {
        let db = self.db.to_string_lossy().to_string();
        let mut argv = vec!["treestore", "--database", db.as_str()];
        argv.extend_from_slice(args);
        execute_command(&Cli::parse_from(argv))
    }

    fn store(&self) -> SqliteTreeStore {
        SqliteTreeStore::new(&self.db, Duration::from_millis(200))
    }

    fn import_sample(&self) {
        let rows = self.rows.to_string_lossy().to_string();
        self.run(&["import", "tree1", rows.as_str()]).unwrap();
    }
}

fn sample() -> TreeNode {
    TreeNode::new("A", 10)
        .with_left(TreeNode::new("B", 20).with_left(TreeNode::new("D", 10)))
        .with_right(TreeNode::new("C", 5))
}

#[test]
fn given_row_file_when_import_then_tree_is_stored() {
    let fx = Fixture::new();
    fx.import_sample();
    assert_eq!(fx.store().load_tree("tree1").unwrap(), Some(sample()));
}

#[test]
fn given_imported_tree_when_querying_then_commands_succeed() {
    let fx = Fixture::new();
    fx.import_sample();

    fx.run(&["show", "tree1"]).unwrap();
    fx.run(&["list", "tree1"]).unwrap();
    fx.run(&["find", "tree1", "D"]).unwrap();
    fx.run(&["lca", "tree1", "D", "C"]).unwrap();
    fx.run(&["path", "tree1", "D", "C"]).unwrap();
    fx.run(&["exists", "tree1"]).unwrap();
    fx.run(&["export", "tree1"]).unwrap();
}

#[test]
fn given_missing_node_when_find_then_not_found_exit_code() {
    let fx = Fixture::new();
    fx.import_sample();

    let err = fx.run(&["find", "tree1", "Z"]).unwrap_err();
    assert_eq!(err.exit_code(), exitcode::NOINPUT);

    let err = fx.run(&["lca", "tree1", "A", "Z"]).unwrap_err();
    assert!(matches!(err, CliError::NotFound(_)));
}

#[test]
fn given_imported_tree_when_copy_then_target_holds_same_tree() {
    let fx = Fixture::new();
    fx.import_sample();

    fx.run(&["copy", "tree1", "tree2"]).unwrap();

    assert_eq!(fx.store().load_tree("tree2").unwrap(), Some(sample()));
}

#[test]
fn given_imported_tree_when_delete_then_no_rows_remain() {
    let fx = Fixture::new();
    fx.import_sample();

    fx.run(&["delete", "tree1"]).unwrap();

    assert!(!fx.store().tree_exists("tree1").unwrap());
}

#[test]
fn given_unknown_tree_when_copy_then_not_found_and_target_untouched() {
    let fx = Fixture::new();
    fx.store()
        .save_tree("target", Some(&TreeNode::new("keep", 1)))
        .unwrap();

    let err = fx.run(&["copy", "nope", "target"]).unwrap_err();

    assert!(matches!(err, CliError::NotFound(_)));
    assert_eq!(
        fx.store().load_tree("target").unwrap(),
        Some(TreeNode::new("keep", 1))
    );
}

#[test]
fn given_row_file_with_two_roots_when_import_then_data_error() {
    let fx = Fixture::new();
    let bad = fx.rows.with_file_name("bad.toml");
    fs::write(
        &bad,
        "[[node]]\nnode_name = \"A\"\nweight = 1\n\n[[node]]\nnode_name = \"B\"\nweight = 2\n",
    )
    .unwrap();

    let bad = bad.to_string_lossy().to_string();
    let err = fx.run(&["import", "tree1", bad.as_str()]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::DATAERR);
    assert!(!fx.store().tree_exists("tree1").unwrap());
}

#[test]
fn given_missing_row_file_when_import_then_io_error() {
    let fx = Fixture::new();
    let missing = fx.rows.with_file_name("missing.toml");
    let missing = missing.to_string_lossy().to_string();

    let err = fx.run(&["import", "tree1", missing.as_str()]).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::IOERR);
}

#[test]
fn given_config_template_when_run_then_succeeds() {
    let fx = Fixture::new();
    fx.run(&["config", "template"]).unwrap();
    fx.run(&["config", "show"]).unwrap();
}
