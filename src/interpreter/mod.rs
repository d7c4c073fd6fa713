//! sclang process controller.
//!
//! Owns at most one interpreter subprocess and feeds it evaluation requests
//! over stdin. The channel is one-way: requests are fire-and-forget and no
//! reply is ever read back.
//!
//! ```text
//! Interpreter::start ──spawn──▶ sclang -i schelp-watch [-al <config>]
//! Interpreter::evaluate ──stdin──▶ <code><ESC|FF>
//! Interpreter::stop ──close stdin, wait──▶ exit
//! ```

mod error;
mod protocol;


pub use error::InterpreterError;
pub use protocol::Echo;

use std::io::{self, BufRead, BufReader, PipeReader, Read};
use std::path::PathBuf;
use std::process::{Child, ChildStdin, Command, Stdio};
use std::thread::JoinHandle;

use crate::debug;

/// Identifying token passed to sclang with `-i`.
pub const IDE_TOKEN: &str = "schelp-watch";

/// Where the interpreter's output goes. Fixed when the process starts.
///
/// stderr is always merged into stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Write to the parent's stdout.
    Inherit,
    /// Capture and drop (lines still reach the debug log).
    Discard,
}

impl OutputMode {
    pub const fn from_quiet(quiet: bool) -> Self {
        if quiet { Self::Discard } else { Self::Inherit }
    }
}

/// Sink for evaluation requests.
///
/// Implemented by [`Interpreter`]; the documentation session only talks to
/// this trait.
pub trait Evaluator {
    fn evaluate(&mut self, code: &str, echo: Echo) -> Result<(), InterpreterError>;
}

/// A spawned interpreter and the handles we keep for it.
struct Running {
    child: Child,
    stdin: ChildStdin,
    drain: Option<JoinHandle<()>>,
}

impl Running {
    /// Close stdin (end-of-input for sclang), wait for exit, join drains.
    fn finish(self) -> Result<(), InterpreterError> {
        let Self {
            mut child,
            stdin,
            drain,
        } = self;

        drop(stdin);
        let status = child.wait()?;
        debug!("sclang"; "exited with {}", status);

        if let Some(drain) = drain {
            let _ = drain.join();
        }
        Ok(())
    }
}

/// Controller for the sclang subprocess.
pub struct Interpreter {
    executable: PathBuf,
    config: Option<PathBuf>,
    process: Option<Running>,
}

impl Interpreter {
    pub fn new(executable: impl Into<PathBuf>, config: Option<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
            config,
            process: None,
        }
    }

    /// Build the spawn command for the given output mode.
    ///
    /// stdout and stderr share one destination. In `Discard` mode that is a
    /// single pipe whose read end is returned. The command holds the write
    /// ends, so it must be dropped after spawning for the reader to see EOF.
    fn command(&self, output: OutputMode) -> io::Result<(Command, Option<PipeReader>)> {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-i").arg(IDE_TOKEN);
        if let Some(config) = &self.config {
            cmd.arg("-al").arg(config);
        }

        cmd.stdin(Stdio::piped());
        let reader = match output {
            OutputMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(io::stdout());
                None
            }
            OutputMode::Discard => {
                let (reader, writer) = io::pipe()?;
                cmd.stderr(writer.try_clone()?).stdout(writer);
                Some(reader)
            }
        };
        Ok((cmd, reader))
    }

    /// Spawn sclang unless one is already alive.
    ///
    /// A handle whose process has already exited is reaped and replaced.
    pub fn start(&mut self, output: OutputMode) -> Result<(), InterpreterError> {
        if self.is_running() {
            return Ok(());
        }
        if let Some(stale) = self.process.take() {
            stale.finish()?;
        }

        let (mut cmd, output) = self.command(output)?;
        let spawned = cmd.spawn();
        // release our copies of the output pipe's write ends
        drop(cmd);
        let mut child = spawned.map_err(|source| InterpreterError::Spawn {
            program: self.executable.clone(),
            source,
        })?;

        let Some(stdin) = child.stdin.take() else {
            let _ = child.kill();
            let _ = child.wait();
            return Err(InterpreterError::NotRunning);
        };

        let drain = match output.map(|reader| spawn_drain("sclang-output", reader)) {
            None => None,
            Some(Ok(handle)) => Some(handle),
            Some(Err(e)) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };

        debug!("sclang"; "started (pid {})", child.id());
        self.process = Some(Running {
            child,
            stdin,
            drain,
        });
        Ok(())
    }

    /// Close sclang's stdin and block until it exits. No-op when not started.
    pub fn stop(&mut self) -> Result<(), InterpreterError> {
        match self.process.take() {
            Some(running) => running.finish(),
            None => Ok(()),
        }
    }

    /// True iff a process handle exists and the process has not exited.
    pub fn is_running(&mut self) -> bool {
        self.process
            .as_mut()
            .is_some_and(|running| matches!(running.child.try_wait(), Ok(None)))
    }

    #[cfg(test)]
    fn pid(&self) -> Option<u32> {
        self.process.as_ref().map(|running| running.child.id())
    }
}

impl Evaluator for Interpreter {
    /// Write `code` plus the terminator for `echo`. Nothing is read back.
    fn evaluate(&mut self, code: &str, echo: Echo) -> Result<(), InterpreterError> {
        if !self.is_running() {
            return Err(InterpreterError::NotRunning);
        }
        let running = self.process.as_mut().ok_or(InterpreterError::NotRunning)?;
        protocol::write_request(&mut running.stdin, code, echo)?;
        Ok(())
    }
}

impl Drop for Interpreter {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            debug!("sclang"; "stop on drop failed: {}", e);
        }
    }
}

/// Read a captured stream to EOF, forwarding lines to the debug log.
fn spawn_drain<R>(name: &str, stream: R) -> Result<JoinHandle<()>, InterpreterError>
where
    R: Read + Send + 'static,
{
    let handle = std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            let mut reader = BufReader::new(stream);
            let mut line = Vec::new();
            loop {
                line.clear();
                match reader.read_until(b'\n', &mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {
                        let text = String::from_utf8_lossy(&line);
                        debug!("sclang"; "{}", text.trim_end());
                    }
                }
            }
        })?;
    Ok(handle)
}
