//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueHint};

/// Name-keyed binary trees: lookup, LCA and path length, persisted to SQLite
#[derive(Parser, Debug)]
#[command(name = "treestore")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// SQLite database file (overrides configuration)
    #[arg(long, global = true, env = "TREESTORE_DATABASE", value_hint = ValueHint::FilePath)]
    pub database: Option<PathBuf>,

    /// Additional config file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a stored tree as a diagram
    Show {
        /// Tree name
        tree: String,
    },

    /// List nodes in order (left, node, right)
    List {
        /// Tree name
        tree: String,
    },

    /// Look up a node by name
    Find {
        /// Tree name
        tree: String,
        /// Node name
        node: String,
    },

    /// Lowest common ancestor of two nodes
    Lca {
        /// Tree name
        tree: String,
        x: String,
        y: String,
    },

    /// Number of edges between two nodes (-1 if either is missing)
    Path {
        /// Tree name
        tree: String,
        x: String,
        y: String,
    },

    /// Check whether a tree is stored
    Exists {
        /// Tree name
        tree: String,
    },

    /// Store a copy of a tree under another name (replaces the target)
    Copy {
        /// Source tree name
        source: String,
        /// Target tree name
        target: String,
    },

    /// Store a timestamped copy of a tree
    Backup {
        /// Tree name
        tree: String,
    },

    /// Remove all rows of a tree
    Delete {
        /// Tree name
        tree: String,
    },

    /// Replace a tree with the rows of a TOML row file
    Import {
        /// Tree name
        tree: String,
        /// Row file with [[node]] tables
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print a tree as a TOML row file
    Export {
        /// Tree name
        tree: String,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show the global config file path
    Path,
    /// Print a template config file
    Template,
}
