//! Configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving what to watch and how to run sclang.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("settings file parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("couldn't find any .schelp file in {}", .0.display())]
    NoSources(PathBuf),

    #[error("sclang command `{command}` not found in PATH")]
    ExecutableNotFound {
        command: String,
        #[source]
        source: which::Error,
    },

    #[error("{what} not found at `{}`", path.display())]
    MissingPath { what: &'static str, path: PathBuf },
}
