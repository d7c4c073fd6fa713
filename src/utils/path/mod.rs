//! Path utilities.
//!
//! Pure functions for path manipulation.
//!
//! - [`fs`]: Filesystem path normalization and relative paths

pub mod fs;

pub use fs::{absolute_path, normalize_path, relative_to, to_slash};
