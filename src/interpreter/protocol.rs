//! sclang's interactive stdin protocol.
//!
//! A request is the UTF-8 code followed by exactly one terminator byte. There
//! is no length prefix and nothing is sent back that we could correlate.

use std::io::{self, Write};

/// Terminator byte selecting whether sclang echoes the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Echo {
    /// Evaluate without printing the result (ESC).
    Silent,
    /// Evaluate and print `-> result` (form feed).
    Verbose,
}

impl Echo {
    pub const fn terminator(self) -> u8 {
        match self {
            Self::Silent => 0x1b,
            Self::Verbose => 0x0c,
        }
    }
}

/// Write one evaluation request (code + terminator as one frame) and flush.
pub fn write_request<W: Write>(writer: &mut W, code: &str, echo: Echo) -> io::Result<()> {
    let mut frame = Vec::with_capacity(code.len() + 1);
    frame.extend_from_slice(code.as_bytes());
    frame.push(echo.terminator());
    writer.write_all(&frame)?;
    writer.flush()
}
