use std::path::PathBuf;
use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;

use super::types::{admits, changes};
use crate::utils::path::absolute_path;

/// Quiet period that closes a batch.
pub(super) const STEP_MS: u64 = 50;
/// Upper bound on how long a batch may stay open.
pub(super) const MAX_DEBOUNCE_MS: u64 = 1600;

/// Idle wait when nothing is pending.
const IDLE: Duration = Duration::from_secs(86400);

/// Groups admitted changes into batches of distinct paths.
///
/// Pure timing and dedup; dispatching is the loop's job.
pub(super) struct Batcher {
    pub(super) pending: FxHashSet<PathBuf>,
    pub(super) first_event: Option<Instant>,
    pub(super) last_event: Option<Instant>,
}

impl Batcher {
    pub(super) fn new() -> Self {
        Self {
            pending: FxHashSet::default(),
            first_event: None,
            last_event: None,
        }
    }

    /// Add a notify event. Changes that aren't admitted leave the timers alone.
    pub(super) fn add_event(&mut self, event: &notify::Event) {
        crate::debug!("watch"; "raw notify: {:?} {:?}", event.kind, event.paths);

        for (kind, path) in changes(event) {
            if !admits(kind, &path) {
                continue;
            }

            let path = absolute_path(&path);
            crate::debug!("watch"; "event {}: {}", kind.label(), path.display());
            self.pending.insert(path);

            let now = Instant::now();
            self.first_event.get_or_insert(now);
            self.last_event = Some(now);
        }
    }

    /// Ready once the stream has been quiet for a step, or the batch has
    /// been open for the maximum debounce.
    pub(super) fn is_ready(&self) -> bool {
        let (Some(first), Some(last)) = (self.first_event, self.last_event) else {
            return false;
        };

        if self.pending.is_empty() {
            return false;
        }

        last.elapsed() >= Duration::from_millis(STEP_MS)
            || first.elapsed() >= Duration::from_millis(MAX_DEBOUNCE_MS)
    }

    /// Take the batch, sorted by path, if it is ready.
    pub(super) fn take_if_ready(&mut self) -> Option<Vec<PathBuf>> {
        if !self.is_ready() {
            return None;
        }

        self.first_event = None;
        self.last_event = None;

        let mut paths: Vec<_> = std::mem::take(&mut self.pending).into_iter().collect();
        paths.sort();
        Some(paths)
    }

    /// Precise sleep duration until the batch could become ready.
    pub(super) fn sleep_duration(&self) -> Duration {
        let (Some(first), Some(last)) = (self.first_event, self.last_event) else {
            return IDLE;
        };

        let step_remaining = Duration::from_millis(STEP_MS).saturating_sub(last.elapsed());
        let max_remaining =
            Duration::from_millis(MAX_DEBOUNCE_MS).saturating_sub(first.elapsed());

        step_remaining
            .min(max_remaining)
            .max(Duration::from_millis(1))
    }
}
