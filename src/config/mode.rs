//! Build vs extension mode detection.

use std::fmt;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use crate::watch::DOC_EXTENSION;

/// How the watched directory relates to SCDoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A SuperCollider build folder; `../HelpSource` is the primary help source.
    Build,
    /// A quark or extension folder added next to the built-in help roots.
    Extension,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Build => "build",
            Self::Extension => "extension",
        })
    }
}

/// Files a build folder is recognized by, relative to the folder.
pub(super) struct BuildLayout {
    pub sclang: PathBuf,
    pub sclang_config: PathBuf,
    pub help_source: PathBuf,
}

impl BuildLayout {
    pub fn of(dir: &Path) -> Self {
        Self {
            sclang: dir.join("lang").join("sclang"),
            sclang_config: dir.join("build_sclang.cfg"),
            help_source: dir.join("..").join("HelpSource"),
        }
    }

    /// Entries of the layout that don't exist.
    pub fn missing(&self) -> Vec<(&'static str, &Path)> {
        [
            ("sclang", self.sclang.as_path()),
            ("sclang config", self.sclang_config.as_path()),
            ("HelpSource", self.help_source.as_path()),
        ]
        .into_iter()
        .filter(|(_, path)| !path.exists())
        .collect()
    }
}

/// True if `dir` looks like a SuperCollider build folder.
pub fn is_build_dir(dir: &Path) -> bool {
    BuildLayout::of(dir).missing().is_empty()
}

/// Guess the mode for `dir`.
///
/// Checks `dir` and then `dir/build`; returns the directory that matched,
/// or `dir` itself in extension mode.
pub fn detect(dir: &Path) -> (Mode, PathBuf) {
    if is_build_dir(dir) {
        return (Mode::Build, dir.to_path_buf());
    }

    let nested = dir.join("build");
    if is_build_dir(&nested) {
        return (Mode::Build, nested);
    }

    (Mode::Extension, dir.to_path_buf())
}

/// True if any `.schelp` file lives under `dir`.
pub fn has_doc_sources(dir: &Path) -> bool {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .any(|e| e.path().extension().is_some_and(|ext| ext == DOC_EXTENSION))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_build_tree(root: &Path, build: &str) -> PathBuf {
        let build_dir = root.join(build);
        fs::create_dir_all(build_dir.join("lang")).unwrap();
        fs::create_dir_all(root.join("HelpSource")).unwrap();
        fs::write(build_dir.join("lang").join("sclang"), "").unwrap();
        fs::write(build_dir.join("build_sclang.cfg"), "").unwrap();
        build_dir
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Build.to_string(), "build");
        assert_eq!(Mode::Extension.to_string(), "extension");
    }

    #[test]
    fn test_detect_build_dir() {
        let temp = TempDir::new().unwrap();
        let build = make_build_tree(temp.path(), "cmake-build");

        assert!(is_build_dir(&build));
        assert_eq!(detect(&build), (Mode::Build, build.clone()));
    }

    #[test]
    fn test_detect_nested_build_dir() {
        let temp = TempDir::new().unwrap();
        let build = make_build_tree(temp.path(), "build");

        // repo root: ../HelpSource from root doesn't exist, root/build matches
        assert!(!is_build_dir(temp.path()));
        assert_eq!(detect(temp.path()), (Mode::Build, build));
    }

    #[test]
    fn test_detect_extension() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("Foo.schelp"), "").unwrap();

        assert_eq!(
            detect(temp.path()),
            (Mode::Extension, temp.path().to_path_buf())
        );
    }

    #[test]
    fn test_missing_layout_entries() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("build_sclang.cfg"), "").unwrap();

        let layout = BuildLayout::of(temp.path());
        let missing: Vec<_> = layout.missing().into_iter().map(|(what, _)| what).collect();
        assert_eq!(missing, ["sclang", "HelpSource"]);
    }

    #[test]
    fn test_has_doc_sources() {
        let temp = TempDir::new().unwrap();
        assert!(!has_doc_sources(temp.path()));

        fs::create_dir_all(temp.path().join("HelpSource/Classes")).unwrap();
        fs::write(temp.path().join("HelpSource/Classes/Foo.sc"), "").unwrap();
        assert!(!has_doc_sources(temp.path()));

        fs::write(temp.path().join("HelpSource/Classes/Foo.schelp"), "").unwrap();
        assert!(has_doc_sources(temp.path()));
    }
}
