//! Command dispatch

use std::io;

use chrono::Utc;
use clap::CommandFactory;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::{backup_name, read_row_file, render_row_set, Tree};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::TreeNodeConvert;
use crate::infrastructure::di::ServiceContainer;
use crate::util::path::expand_path;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Ok(());
    };

    match command {
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        Commands::Config { command } => execute_config(cli, command),
        command => {
            let container = ServiceContainer::new(load_settings(cli)?);
            execute_tree(&container, command)
        }
    }
}

/// Settings from config layers, with `--database` applied last.
pub fn load_settings(cli: &Cli) -> CliResult<Settings> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(database) = &cli.database {
        settings.database_path = expand_path(database);
    }
    debug!("database: {}", settings.database_path.display());
    Ok(settings)
}

/// Run a tree command against the container's ports.
#[instrument(level = "debug", skip(container))]
pub fn execute_tree(container: &ServiceContainer, command: &Commands) -> CliResult<()> {
    match command {
        Commands::Show { tree } => _show(container, tree),
        Commands::List { tree } => {
            for line in open(container, tree)?.inorder_listing() {
                output::info(&line);
            }
            Ok(())
        }
        Commands::Find { tree, node } => {
            let tree = open(container, tree)?;
            let found = tree
                .find_node(node)
                .ok_or_else(|| CliError::NotFound(format!("node {} in {}", node, tree.name())))?;
            output::info(&format!("{}\t{}", found.name, found.weight));
            Ok(())
        }
        Commands::Lca { tree, x, y } => _lca(container, tree, x, y),
        Commands::Path { tree, x, y } => {
            output::info(&open(container, tree)?.path_length(x, y));
            Ok(())
        }
        Commands::Exists { tree } => {
            output::info(&container.tree(tree).exists(tree));
            Ok(())
        }
        Commands::Copy { source, target } => {
            let tree = open_non_empty(container, source)?;
            save(&tree, target)?;
            output::action("Copied", &format!("{} -> {}", source, target));
            Ok(())
        }
        Commands::Backup { tree } => {
            let tree = open_non_empty(container, tree)?;
            let target = backup_name(tree.name(), Utc::now());
            save(&tree, &target)?;
            output::action("Backup", &target);
            Ok(())
        }
        Commands::Delete { tree } => {
            save(&container.tree(tree), tree)?;
            output::success(&format!("deleted {}", tree));
            Ok(())
        }
        Commands::Import { tree, file } => {
            let mut bound = container.tree(tree);
            bound.set_root(read_row_file(file)?);
            save(&bound, tree)?;
            output::success(&format!("imported {} from {}", tree, file.display()));
            Ok(())
        }
        Commands::Export { tree } => {
            let tree = open(container, tree)?;
            output::info(&render_row_set(tree.root())?);
            Ok(())
        }
        Commands::Config { .. } | Commands::Completion { .. } => Err(CliError::Usage(
            "not a tree command".to_string(),
        )),
    }
}

fn execute_config(cli: &Cli, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&load_settings(cli)?.to_toml()?);
        }
        ConfigCommands::Path => match global_config_path() {
            Some(path) => output::info(&path.display()),
            None => return Err(CliError::NotFound("config directory".to_string())),
        },
        ConfigCommands::Template => output::info(&Settings::template()),
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn _show(container: &ServiceContainer, name: &str) -> CliResult<()> {
    let tree = open(container, name)?;
    output::header(tree.name());
    output::info(&tree.root().to_tree_string());
    if let Some(root) = tree.root() {
        output::detail(&format!("nodes: {}, depth: {}", root.len(), root.depth()));
        output::detail(&format!("leaves: {}", root.leaf_names().iter().join(", ")));
    }
    Ok(())
}

#[instrument(level = "debug", skip(container))]
fn _lca(container: &ServiceContainer, name: &str, x: &str, y: &str) -> CliResult<()> {
    let tree = open(container, name)?;
    // the LCA is only meaningful when both nodes exist
    for node in [x, y] {
        if tree.find_node(node).is_none() {
            return Err(CliError::NotFound(format!("node {} in {}", node, name)));
        }
    }
    let lca = tree
        .find_lca(x, y)
        .ok_or_else(|| CliError::NotFound(format!("common ancestor of {} and {}", x, y)))?;
    output::info(&lca.name);
    Ok(())
}

fn open(container: &ServiceContainer, name: &str) -> CliResult<Tree> {
    let mut tree = container.tree(name);
    if tree.load() {
        Ok(tree)
    } else {
        Err(CliError::Failed(format!("load tree {}", name)))
    }
}

fn open_non_empty(container: &ServiceContainer, name: &str) -> CliResult<Tree> {
    let tree = open(container, name)?;
    if tree.is_empty() {
        return Err(CliError::NotFound(format!("tree {}", name)));
    }
    Ok(tree)
}

fn save(tree: &Tree, target: &str) -> CliResult<()> {
    if tree.save(target) {
        Ok(())
    } else {
        Err(CliError::Failed(format!("save tree {}", target)))
    }
}
