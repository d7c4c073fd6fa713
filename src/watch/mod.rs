//! Change watch loop.
//!
//! Watches the help source tree recursively and hands every changed
//! `.schelp` file to a dispatch callback, once per batch.
//!
//! ```text
//! notify ──channel──▶ Batcher (filter + dedup + timing) ──sorted batch──▶ dispatch(path)
//! ```
//!
//! The watcher is created before the session is initialized so edits made
//! while SCDoc indexes are buffered rather than lost.

mod batcher;
mod error;
mod types;


pub use error::WatchError;
pub use types::DOC_EXTENSION;

use std::path::{Path, PathBuf};

use crossbeam::channel::{self, Receiver, select};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};

use crate::core::is_shutdown;
use crate::{debug, log};
use batcher::Batcher;

type NotifyResult = notify::Result<notify::Event>;

/// Recursive watcher over one root directory.
pub struct ChangeWatcher {
    root: PathBuf,
    events: Receiver<NotifyResult>,
    /// Must stay alive for events to keep flowing
    _watcher: RecommendedWatcher,
}

impl ChangeWatcher {
    /// Start watching `root` immediately; events buffer until [`run`](Self::run).
    pub fn new(root: &Path) -> Result<Self, WatchError> {
        let (tx, events) = channel::unbounded();

        let mut watcher = notify::recommended_watcher(move |res: NotifyResult| {
            let _ = tx.send(res);
        })?;

        watcher
            .watch(root, RecursiveMode::Recursive)
            .map_err(|e| WatchError::PathWatchFailed {
                path: root.to_path_buf(),
                reason: e.to_string(),
            })?;

        debug!("watch"; "watching {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            events,
            _watcher: watcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Dispatch changed paths until `shutdown` fires or `dispatch` fails.
    pub fn run<F>(self, shutdown: &Receiver<()>, dispatch: F) -> anyhow::Result<()>
    where
        F: FnMut(&Path) -> anyhow::Result<()>,
    {
        run_loop(&self.events, shutdown, dispatch)
    }
}

/// The watch loop proper, independent of the notify backend.
///
/// Returns `Ok(())` on shutdown. A dispatch error ends the loop and is
/// returned as-is; notify errors are logged and skipped.
pub(crate) fn run_loop<F>(
    events: &Receiver<NotifyResult>,
    shutdown: &Receiver<()>,
    mut dispatch: F,
) -> anyhow::Result<()>
where
    F: FnMut(&Path) -> anyhow::Result<()>,
{
    let mut batcher = Batcher::new();

    loop {
        select! {
            recv(shutdown) -> _ => return Ok(()),
            recv(events) -> msg => match msg {
                Ok(Ok(event)) => batcher.add_event(&event),
                Ok(Err(e)) => log!("warning"; "notify error: {}", e),
                Err(_) => return Err(WatchError::ChannelClosed.into()),
            },
            default(batcher.sleep_duration()) => {}
        }

        let Some(paths) = batcher.take_if_ready() else {
            continue;
        };

        debug!("watch"; "batch of {} change(s)", paths.len());
        for path in &paths {
            if is_shutdown() {
                return Ok(());
            }
            dispatch(path)?;
        }
    }
}
