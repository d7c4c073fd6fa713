//! Error types for the sclang process controller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors from driving the interpreter subprocess.
#[derive(Debug, Error)]
pub enum InterpreterError {
    #[error("failed to launch `{}`", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("sclang is not running")]
    NotRunning,

    #[error("sclang I/O error")]
    Io(#[from] io::Error),
}
