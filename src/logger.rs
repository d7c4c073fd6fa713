//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro for output that only shows with `--verbose`
//!
//! # Example
//!
//! ```ignore
//! log!("watch"; "reloading {}", path);
//! debug!("sclang"; "{}", line);
//! ```

use owo_colors::{OwoColorize, Stream};
use std::{
    io::{Write, stderr, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Log a message with a colored module prefix.
///
/// `error` and `warning` go to stderr, everything else to stdout.
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let diagnostic = is_diagnostic(&module_lower);
    let stream = if diagnostic {
        Stream::Stderr
    } else {
        Stream::Stdout
    };
    let prefix = colorize_prefix(module, &module_lower, stream);

    if diagnostic {
        let mut stderr = stderr().lock();
        writeln!(stderr, "{prefix} {message}").ok();
        stderr.flush().ok();
    } else {
        let mut stdout = stdout().lock();
        writeln!(stdout, "{prefix} {message}").ok();
        stdout.flush().ok();
    }
}

fn is_diagnostic(module_lower: &str) -> bool {
    matches!(module_lower, "error" | "warning")
}

/// Apply color to a module prefix based on module type.
///
/// Honors `owo_colors::set_override` (`--color`) and whether `stream` is a TTY.
#[inline]
fn colorize_prefix(module: &str, module_lower: &str, stream: Stream) -> String {
    let prefix = format!("[{module}]");
    let paint = |p: &String| -> String {
        match module_lower {
            "scdoc" => p.bright_blue().bold().to_string(),
            "watch" => p.bright_green().bold().to_string(),
            "sclang" => p.bright_magenta().bold().to_string(),
            "error" => p.bright_red().bold().to_string(),
            _ => p.bright_yellow().bold().to_string(),
        }
    };
    prefix.if_supports_color(stream, paint).to_string()
}

// ============================================================================
// Tests
// ============================================================================
