use std::path::{Path, PathBuf};

use notify::EventKind;
use notify::event::{ModifyKind, RenameMode};

/// Extension of documentation sources.
pub const DOC_EXTENSION: &str = "schelp";

/// What happened to a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

impl ChangeKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }
}

/// Flatten a notify event into per-path changes.
///
/// Metadata-only and access events yield nothing. Renames count as a
/// removal of the old name and a creation of the new one.
pub fn changes(event: &notify::Event) -> Vec<(ChangeKind, PathBuf)> {
    let uniform = |kind: ChangeKind| -> Vec<(ChangeKind, PathBuf)> {
        event.paths.iter().map(|p| (kind, p.clone())).collect()
    };

    match event.kind {
        EventKind::Create(_) => uniform(ChangeKind::Created),
        EventKind::Remove(_) => uniform(ChangeKind::Removed),
        EventKind::Modify(ModifyKind::Metadata(_)) => Vec::new(),
        EventKind::Modify(ModifyKind::Name(mode)) => match mode {
            RenameMode::To => uniform(ChangeKind::Created),
            RenameMode::From => uniform(ChangeKind::Removed),
            RenameMode::Both => {
                let mut out = Vec::with_capacity(2);
                if let Some(from) = event.paths.first() {
                    out.push((ChangeKind::Removed, from.clone()));
                }
                if let Some(to) = event.paths.get(1) {
                    out.push((ChangeKind::Created, to.clone()));
                }
                out
            }
            // Backends that can't tell the two ends apart
            RenameMode::Any | RenameMode::Other => event
                .paths
                .iter()
                .map(|p| {
                    let kind = if p.exists() {
                        ChangeKind::Created
                    } else {
                        ChangeKind::Removed
                    };
                    (kind, p.clone())
                })
                .collect(),
        },
        EventKind::Modify(_) => uniform(ChangeKind::Modified),
        EventKind::Access(_) | EventKind::Any | EventKind::Other => Vec::new(),
    }
}

/// True for changes worth recompiling: a `.schelp` file that still exists.
pub fn admits(kind: ChangeKind, path: &Path) -> bool {
    kind != ChangeKind::Removed && path.extension().is_some_and(|ext| ext == DOC_EXTENSION)
}
