//! Error types for the change watcher.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WatchError {
    #[error("failed to create file watcher")]
    Init(#[from] notify::Error),

    #[error("cannot watch `{}`: {reason}", path.display())]
    PathWatchFailed { path: PathBuf, reason: String },

    #[error("file watcher stopped delivering events")]
    ChannelClosed,
}
