use std::path::Path;

/// Expand `~`, `$VAR` and `${VAR}`; unresolvable input is returned unchanged.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

/// Expand a path-like value, see [`expand_env_vars`].
pub fn expand_path(path: &Path) -> std::path::PathBuf {
    expand_env_vars(path.to_string_lossy().as_ref()).into()
}
