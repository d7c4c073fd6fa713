//! Path normalization utilities.
//!
//! Provides consistent path handling across the codebase:
//! - `normalize_path` - file system paths (canonicalize + fallback)
//! - `absolute_path` - absolute form without resolving symlinks
//! - `relative_to` - path of a file relative to a base directory
//! - `to_slash` - `/`-separated rendering for sclang string literals

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

/// Make `path` absolute against the current directory.
///
/// Unlike [`normalize_path`], symlinks are left alone: a symlinked file keeps
/// its own location rather than its target's.
#[inline]
pub fn absolute_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
}

/// Compute `path` relative to `base`.
///
/// `path` does not have to live under `base`; the result then starts with
/// `..` components. Falls back to `path` itself when no relative form exists
/// (e.g. a relative `path` against an absolute `base`).
///
/// # Example
/// ```ignore
/// relative_to(Path::new("/src/Classes/Foo.schelp"), Path::new("/src"))
///     == PathBuf::from("Classes/Foo.schelp");
/// ```
pub fn relative_to(path: &Path, base: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Render a path with `/` separators regardless of platform.
pub fn to_slash(path: &Path) -> String {
    let mut out = String::new();
    for component in path.components() {
        match component {
            Component::RootDir => {
                out.push('/');
                continue;
            }
            Component::Prefix(prefix) => {
                out.push_str(&prefix.as_os_str().to_string_lossy());
                continue;
            }
            Component::CurDir => continue,
            Component::ParentDir | Component::Normal(_) => {
                out.push_str(&component.as_os_str().to_string_lossy());
            }
        }
        out.push('/');
    }
    if out.len() > 1 && out.ends_with('/') {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_absolute_path() {
        assert_eq!(
            absolute_path(Path::new("/abs/Foo.schelp")),
            PathBuf::from("/abs/Foo.schelp")
        );
        let rel = absolute_path(Path::new("Classes/Foo.schelp"));
        assert!(rel.is_absolute());
        assert!(rel.ends_with("Classes/Foo.schelp"));
    }

    #[cfg(unix)]
    #[test]
    fn test_absolute_path_keeps_symlink() {
        let temp = tempfile::tempdir().unwrap();
        let root = normalize_path(temp.path());
        std::fs::write(root.join("Real.schelp"), "").unwrap();
        std::os::unix::fs::symlink(root.join("Real.schelp"), root.join("Link.schelp")).unwrap();

        let link = root.join("Link.schelp");
        assert_eq!(absolute_path(&link), link);
        assert_eq!(normalize_path(&link), root.join("Real.schelp"));
    }

    #[test]
    fn test_relative_to_descendant() {
        let rel = relative_to(Path::new("/src/Classes/Foo.schelp"), Path::new("/src"));
        assert_eq!(rel, PathBuf::from("Classes/Foo.schelp"));
    }

    #[test]
    fn test_relative_to_outside_base() {
        let rel = relative_to(
            Path::new("/src/Other/Bar.schelp"),
            Path::new("/src/HelpSource"),
        );
        assert_eq!(rel, PathBuf::from("../Other/Bar.schelp"));
    }

    #[test]
    fn test_to_slash() {
        assert_eq!(to_slash(Path::new("Classes/Foo.schelp")), "Classes/Foo.schelp");
        assert_eq!(to_slash(Path::new("../Other/Bar.schelp")), "../Other/Bar.schelp");
        assert_eq!(to_slash(Path::new("./Guides/A.schelp")), "Guides/A.schelp");
        assert_eq!(to_slash(Path::new("/")), "/");
        assert_eq!(to_slash(Path::new("/abs/dir")), "/abs/dir");
    }
}
