//! Configuration utility functions.

use std::path::{Path, PathBuf};

/// Find config file by searching upward from `start`
///
/// Walks up parent directories until finding `config_name`.
/// An absolute `config_name` is only checked for existence.
///
/// # Example
/// ```text
/// /home/user/quark/HelpSource/Classes/  ← start
/// /home/user/quark/schelp-watch.toml    ← found!
/// ```
pub fn find_config_file(start: &Path, config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    start
        .ancestors()
        .map(|dir| dir.join(config_name))
        .find(|candidate| candidate.is_file())
}

/// Expand `~` and anchor relative paths at `base`.
pub fn expand_path(path: &Path, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned());
    if expanded.is_relative() {
        base.join(expanded)
    } else {
        expanded
    }
}

/// True if `command` names a file rather than something to look up on PATH.
pub fn is_path_like(command: &str) -> bool {
    command.contains('/') || command.contains(std::path::MAIN_SEPARATOR) || command.starts_with('~')
}

// ============================================================================
// tests
// ============================================================================
