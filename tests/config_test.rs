//! Integration tests for Settings file layering.
//!
//! Both the global and the explicit config file live in temp directories and
//! are passed to `Settings::load_files`, so neither the developer's own
//! config nor `TREESTORE_*` variables take part.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use treestore::application::ApplicationError;
use treestore::config::Settings;

#[test]
fn given_config_file_with_database_when_load_then_overrides_default() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestore.toml");
    fs::write(&path, "database_path = \"/srv/trees/main.db\"\n").unwrap();

    let settings = Settings::load_files(None, Some(path.as_path())).expect("load settings");

    assert_eq!(settings.database_path, PathBuf::from("/srv/trees/main.db"));
    assert_eq!(settings.busy_timeout_ms, Settings::default().busy_timeout_ms);
}

#[test]
fn given_config_file_with_tilde_when_load_then_path_is_expanded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestore.toml");
    fs::write(
        &path,
        "database_path = \"~/trees.db\"\nbusy_timeout_ms = 250\n",
    )
    .unwrap();

    let settings = Settings::load_files(None, Some(path.as_path())).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    assert!(settings.database_path.starts_with(&home));
    assert_eq!(settings.busy_timeout_ms, 250);
}

#[test]
fn given_missing_config_file_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let result = Settings::load_files(None, Some(dir.path().join("absent.toml").as_path()));
    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_invalid_toml_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("treestore.toml");
    fs::write(&path, "busy_timeout_ms = \"soon\"\n").unwrap();

    let result = Settings::load_files(None, Some(path.as_path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_global_and_explicit_file_when_load_then_explicit_wins_per_field() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("global.toml");
    let explicit = dir.path().join("explicit.toml");
    fs::write(
        &global,
        "database_path = \"/srv/global.db\"\nbusy_timeout_ms = 100\n",
    )
    .unwrap();
    fs::write(&explicit, "busy_timeout_ms = 900\n").unwrap();

    let settings = Settings::load_files(Some(global.as_path()), Some(explicit.as_path()))
        .expect("load settings");

    assert_eq!(settings.database_path, PathBuf::from("/srv/global.db"));
    assert_eq!(settings.busy_timeout_ms, 900);
}

#[test]
fn given_absent_global_file_when_load_then_defaults_apply() {
    let dir = TempDir::new().unwrap();
    let global = dir.path().join("missing.toml");

    let settings = Settings::load_files(Some(global.as_path()), None).expect("load settings");

    assert_eq!(settings.busy_timeout_ms, Settings::default().busy_timeout_ms);
    assert!(settings.database_path.ends_with("trees.db"));
}

#[test]
fn given_template_when_parsed_then_is_valid_toml() {
    let template = Settings::template();
    let parsed: Result<toml::Table, _> = toml::from_str(&template);
    assert!(parsed.is_ok());
}
