//! SCDoc session on top of a running interpreter.
//!
//! Sets up SCDoc's source/target directories once, then turns changed
//! `.schelp` paths into re-render requests.

pub mod script;


use std::path::{Path, PathBuf};

use crate::config::Mode;
use crate::interpreter::{Echo, Evaluator, InterpreterError};
use crate::log;
use crate::utils::path::{relative_to, to_slash};

/// What the session has told SCDoc so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Absolute documentation source directory.
    pub source_dir: PathBuf,
    /// Explicit render target. `None` means a scratch copy under `PathName.tmp`.
    pub target_dir: Option<PathBuf>,
    pub extension: bool,
    pub preview_shown: bool,
}

pub struct DocSession<E: Evaluator> {
    evaluator: E,
    echo: Echo,
    state: SessionState,
}

impl<E: Evaluator> DocSession<E> {
    pub fn new(evaluator: E) -> Self {
        Self {
            evaluator,
            echo: Echo::Verbose,
            state: SessionState::default(),
        }
    }

    /// Terminator used for every request. Defaults to [`Echo::Verbose`].
    pub fn with_echo(mut self, echo: Echo) -> Self {
        self.echo = echo;
        self
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn evaluator_mut(&mut self) -> &mut E {
        &mut self.evaluator
    }

    /// Point SCDoc at `source_dir` and build the index.
    ///
    /// Requests, in order:
    /// 1. extension mode adds an include path, build mode replaces the
    ///    help source directory
    /// 2. explicit target, or a scratch copy of the current target
    /// 3. incremental index
    pub fn initialize(
        &mut self,
        source_dir: &Path,
        target_dir: Option<&Path>,
        mode: Mode,
    ) -> Result<(), InterpreterError> {
        self.state.source_dir = source_dir.to_path_buf();
        self.state.target_dir = target_dir.map(Path::to_path_buf);
        self.state.extension = mode == Mode::Extension;

        let source_request = match mode {
            Mode::Extension => script::add_include_path(source_dir),
            Mode::Build => script::set_help_source_dir(source_dir),
        };
        self.send(&source_request)?;

        match target_dir {
            Some(target) => self.send(&script::set_help_target_dir(target))?,
            None => self.send(&script::temporary_help_target())?,
        }

        self.send(script::index_all_documents())
    }

    /// Re-render the document for `path`.
    ///
    /// `path` may lie outside the source directory; the relative path then
    /// contains `..` and the lookup is left to SCDoc.
    pub fn recompile(&mut self, path: &Path) -> Result<(), InterpreterError> {
        let rel = to_slash(&relative_to(path, &self.state.source_dir));
        log!("watch"; "reloading {}", rel);

        let request =
            script::recompile_entry(&self.state.source_dir, &rel, self.state.preview_shown);
        self.send(&request)
    }

    /// Show the help browser; later recompiles navigate it.
    pub fn open_preview(&mut self) -> Result<(), InterpreterError> {
        self.state.preview_shown = true;
        self.send(script::open_help_browser())
    }

    fn send(&mut self, code: &str) -> Result<(), InterpreterError> {
        self.evaluator.evaluate(code, self.echo)
    }
}
