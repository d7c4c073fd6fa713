//! Watch configuration.
//!
//! Combines three sources, highest precedence first:
//!
//! | Source                | Provides                                        |
//! |-----------------------|-------------------------------------------------|
//! | CLI flags             | everything                                      |
//! | `schelp-watch.toml`   | `[sclang] command, config, quiet`               |
//! |                       | `[help] target, preview`                        |
//! | built-in defaults     | `sclang` on PATH, scratch target, preview on    |
//!
//! The watched directory itself decides the [`Mode`]: a SuperCollider build
//! folder pins sclang, its config and `HelpSource`; anything else must
//! contain `.schelp` files.

mod error;
mod mode;
mod util;

pub use error::ConfigError;
pub use mode::Mode;

use mode::{BuildLayout, detect, has_doc_sources};
use util::{expand_path, find_config_file, is_path_like};

use crate::cli::Cli;
use crate::log;
use crate::utils::path::normalize_path;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Settings file looked up from the current directory upward.
pub const SETTINGS_FILE: &str = "schelp-watch.toml";

/// Default sclang command.
pub const DEFAULT_SCLANG: &str = "sclang";

// ============================================================================
// settings file
// ============================================================================

/// Contents of `schelp-watch.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sclang: SclangSection,
    pub help: HelpSection,
}

/// `[sclang]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SclangSection {
    /// Command name (looked up on PATH) or path to the executable
    pub command: Option<String>,
    /// Passed to sclang as `-al`
    pub config: Option<PathBuf>,
    /// Hide sclang output
    pub quiet: Option<bool>,
}

/// `[help]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HelpSection {
    /// Where rendered help goes instead of a scratch copy
    pub target: Option<PathBuf>,
    /// Open the help browser on startup
    pub preview: Option<bool>,
}

impl Settings {
    /// Load settings from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (settings, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(settings)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let settings = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((settings, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {} (ignored):", path.display());
        for field in fields {
            log!("warning"; "- {}", field);
        }
    }
}

/// Settings file to read: `--settings` if given (must exist), otherwise the
/// nearest `schelp-watch.toml` above `cwd`, if any.
fn locate_settings(cli: &Cli, cwd: &Path) -> Result<Option<PathBuf>, ConfigError> {
    match &cli.settings {
        Some(explicit) => {
            let path = cwd.join(explicit);
            if path.is_file() {
                Ok(Some(path))
            } else {
                Err(ConfigError::MissingPath {
                    what: "settings file",
                    path,
                })
            }
        }
        None => Ok(find_config_file(cwd, Path::new(SETTINGS_FILE))),
    }
}

// ============================================================================
// resolved configuration
// ============================================================================

/// Everything needed to start sclang and watch the help sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchConfig {
    pub mode: Mode,
    /// Build folder (build mode) or extension folder (extension mode)
    pub root: PathBuf,
    /// Directory that is watched and handed to SCDoc
    pub help_source: PathBuf,
    /// `None` renders into a scratch copy of the current target
    pub help_target: Option<PathBuf>,
    pub sclang: PathBuf,
    pub sclang_config: Option<PathBuf>,
    pub quiet: bool,
    pub preview: bool,
}

impl WatchConfig {
    /// Resolve the configuration for this run.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let (settings, settings_dir) = match locate_settings(cli, &cwd)? {
            Some(path) => {
                crate::debug!("config"; "using settings from {}", path.display());
                let settings = Settings::from_path(&path)?;
                let dir = path.parent().map_or_else(|| cwd.clone(), Path::to_path_buf);
                (settings, dir)
            }
            None => (Settings::default(), cwd.clone()),
        };

        Ok(Self::resolve(cli, &settings, &settings_dir, &cwd)?)
    }

    /// Merge CLI flags over `settings` and probe the watched directory.
    ///
    /// CLI paths are relative to `cwd`, settings paths to `settings_dir`.
    pub fn resolve(
        cli: &Cli,
        settings: &Settings,
        settings_dir: &Path,
        cwd: &Path,
    ) -> Result<Self, ConfigError> {
        let dir = normalize_path(&cwd.join(cli.path.as_deref().unwrap_or(Path::new("."))));
        let (mode, root) = match cli.mode() {
            Some(mode) => (mode, dir),
            None => detect(&dir),
        };

        let (help_source, sclang, sclang_config) = match mode {
            Mode::Build => {
                let layout = BuildLayout::of(&root);
                if let Some(&(what, path)) = layout.missing().first() {
                    return Err(ConfigError::MissingPath {
                        what,
                        path: path.to_path_buf(),
                    });
                }
                (
                    normalize_path(&layout.help_source),
                    layout.sclang,
                    Some(layout.sclang_config),
                )
            }
            Mode::Extension => {
                if !has_doc_sources(&root) {
                    return Err(ConfigError::NoSources(root));
                }

                let sclang = match (&cli.sclang, &settings.sclang.command) {
                    (Some(command), _) => resolve_executable(command, cwd)?,
                    (None, Some(command)) => resolve_executable(command, settings_dir)?,
                    (None, None) => resolve_executable(DEFAULT_SCLANG, cwd)?,
                };

                let sclang_config = cli
                    .config
                    .as_ref()
                    .map(|path| cwd.join(path))
                    .or_else(|| {
                        settings
                            .sclang
                            .config
                            .as_ref()
                            .map(|path| expand_path(path, settings_dir))
                    });
                if let Some(path) = &sclang_config
                    && !path.exists()
                {
                    return Err(ConfigError::MissingPath {
                        what: "sclang config",
                        path: path.clone(),
                    });
                }

                (root.clone(), sclang, sclang_config)
            }
        };

        let help_target = cli
            .target
            .as_ref()
            .map(|path| cwd.join(path))
            .or_else(|| {
                settings
                    .help
                    .target
                    .as_ref()
                    .map(|path| expand_path(path, settings_dir))
            })
            .map(|path| normalize_path(&path));

        let quiet = cli.quiet || settings.sclang.quiet.unwrap_or(false);
        let preview = !quiet && !cli.no_preview && settings.help.preview.unwrap_or(true);

        Ok(Self {
            mode,
            root,
            help_source,
            help_target,
            sclang,
            sclang_config,
            quiet,
            preview,
        })
    }
}

/// Look a bare command up on PATH; take anything path-like as a file.
fn resolve_executable(command: &str, base: &Path) -> Result<PathBuf, ConfigError> {
    if is_path_like(command) {
        let path = expand_path(Path::new(command), base);
        return if path.exists() {
            Ok(path)
        } else {
            Err(ConfigError::MissingPath {
                what: "sclang",
                path,
            })
        };
    }

    which::which(command).map_err(|source| ConfigError::ExecutableNotFound {
        command: command.to_string(),
        source,
    })
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("schelp-watch").chain(args.iter().copied()))
    }

    /// Extension folder with one help file and a stand-in sclang.
    fn make_extension() -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        fs::create_dir_all(root.join("quark/HelpSource/Classes")).unwrap();
        fs::write(root.join("quark/HelpSource/Classes/Foo.schelp"), "").unwrap();
        fs::write(root.join("sclang"), "").unwrap();
        (temp, root)
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(Settings::parse_with_ignored("[sclang\ncommand = \"x\"").is_err());
    }

    #[test]
    fn test_settings_sections() {
        let content = "[sclang]\ncommand = \"/opt/sc/sclang\"\nquiet = true\n[help]\ntarget = \"out\"\npreview = false";
        let (settings, ignored) = Settings::parse_with_ignored(content).unwrap();

        assert!(ignored.is_empty());
        assert_eq!(settings.sclang.command.as_deref(), Some("/opt/sc/sclang"));
        assert_eq!(settings.sclang.quiet, Some(true));
        assert_eq!(settings.help.target, Some(PathBuf::from("out")));
        assert_eq!(settings.help.preview, Some(false));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[sclang]\nquiet = true\nport = 57120\n[unknown_section]\nfield = 1";
        let (settings, ignored) = Settings::parse_with_ignored(content).unwrap();

        assert_eq!(settings.sclang.quiet, Some(true));
        assert!(ignored.iter().any(|f| f.contains("port")));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_empty_settings() {
        let (settings, ignored) = Settings::parse_with_ignored("").unwrap();
        assert_eq!(settings, Settings::default());
        assert!(ignored.is_empty());
    }

    #[test]
    fn test_settings_from_missing_file() {
        let err = Settings::from_path(Path::new("/nonexistent/schelp-watch.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(..)));
    }

    #[test]
    fn test_resolve_extension_defaults() {
        let (_temp, root) = make_extension();
        let cli = cli(&["quark", "--sclang", "./sclang"]);

        let config = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap();

        assert_eq!(config.mode, Mode::Extension);
        assert_eq!(config.root, root.join("quark"));
        assert_eq!(config.help_source, root.join("quark"));
        assert_eq!(config.help_target, None);
        assert_eq!(config.sclang, root.join("./sclang"));
        assert_eq!(config.sclang_config, None);
        assert!(!config.quiet);
        assert!(config.preview);
    }

    #[test]
    fn test_resolve_no_sources() {
        let (_temp, root) = make_extension();
        fs::create_dir_all(root.join("empty")).unwrap();
        let cli = cli(&["empty", "--sclang", "./sclang"]);

        let err = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap_err();
        assert!(matches!(&err, ConfigError::NoSources(path) if *path == root.join("empty")));
        assert!(err.to_string().starts_with("couldn't find any .schelp file in"));
    }

    #[test]
    fn test_resolve_missing_executable() {
        let (_temp, root) = make_extension();

        let cli = cli(&["quark", "--sclang", "./not-sclang"]);
        let err = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath { what: "sclang", .. }));

        let cli = self::cli(&["quark", "--sclang", "schelp-watch-no-such-sclang"]);
        let err = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap_err();
        assert!(matches!(err, ConfigError::ExecutableNotFound { .. }));
    }

    #[test]
    fn test_resolve_settings_relative_to_file() {
        let (_temp, root) = make_extension();
        let settings_dir = root.join("conf");
        fs::create_dir_all(&settings_dir).unwrap();
        fs::write(settings_dir.join("sclang_conf.yaml"), "").unwrap();

        let settings = Settings {
            sclang: SclangSection {
                command: Some("../sclang".to_string()),
                config: Some(PathBuf::from("sclang_conf.yaml")),
                quiet: None,
            },
            help: HelpSection {
                target: Some(PathBuf::from("out")),
                preview: None,
            },
        };

        let cli = cli(&["quark"]);
        let config = WatchConfig::resolve(&cli, &settings, &settings_dir, &root).unwrap();

        assert_eq!(config.sclang, settings_dir.join("../sclang"));
        assert_eq!(config.sclang_config, Some(settings_dir.join("sclang_conf.yaml")));
        assert_eq!(config.help_target, Some(settings_dir.join("out")));
    }

    #[test]
    fn test_cli_overrides_settings() {
        let (_temp, root) = make_extension();
        fs::write(root.join("cli.yaml"), "").unwrap();

        let settings = Settings {
            sclang: SclangSection {
                command: Some("/nonexistent/sclang".to_string()),
                config: Some(PathBuf::from("/nonexistent/conf.yaml")),
                quiet: Some(false),
            },
            help: HelpSection {
                target: Some(PathBuf::from("/nonexistent/target")),
                preview: Some(true),
            },
        };

        let cli = cli(&[
            "quark",
            "--sclang",
            "./sclang",
            "--config",
            "cli.yaml",
            "--target",
            "help-out",
            "--no-preview",
        ]);
        let config = WatchConfig::resolve(&cli, &settings, &root, &root).unwrap();

        assert_eq!(config.sclang, root.join("./sclang"));
        assert_eq!(config.sclang_config, Some(root.join("cli.yaml")));
        assert_eq!(config.help_target, Some(root.join("help-out")));
        assert!(!config.preview);
    }

    #[test]
    fn test_quiet_disables_preview() {
        let (_temp, root) = make_extension();

        let cli = cli(&["quark", "--sclang", "./sclang", "-q"]);
        let config = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap();
        assert!(config.quiet);
        assert!(!config.preview);

        let settings = Settings {
            sclang: SclangSection {
                quiet: Some(true),
                ..SclangSection::default()
            },
            ..Settings::default()
        };
        let cli = self::cli(&["quark", "--sclang", "./sclang"]);
        let config = WatchConfig::resolve(&cli, &settings, &root, &root).unwrap();
        assert!(config.quiet);
        assert!(!config.preview);
    }

    #[test]
    fn test_missing_sclang_config() {
        let (_temp, root) = make_extension();
        let cli = cli(&["quark", "--sclang", "./sclang", "--config", "nope.yaml"]);

        let err = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath { what: "sclang config", .. }));
    }

    #[test]
    fn test_resolve_build_mode() {
        let temp = TempDir::new().unwrap();
        let root = normalize_path(temp.path());
        fs::create_dir_all(root.join("HelpSource")).unwrap();
        fs::create_dir_all(root.join("build/lang")).unwrap();
        fs::write(root.join("build/lang/sclang"), "").unwrap();
        fs::write(root.join("build/build_sclang.cfg"), "").unwrap();

        // autodetected from the repo root via root/build
        let cli = cli(&[]);
        let config = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap();

        assert_eq!(config.mode, Mode::Build);
        assert_eq!(config.root, root.join("build"));
        assert_eq!(config.help_source, root.join("HelpSource"));
        assert_eq!(config.sclang, root.join("build/lang/sclang"));
        assert_eq!(
            config.sclang_config,
            Some(root.join("build/build_sclang.cfg"))
        );
    }

    #[test]
    fn test_forced_build_mode_needs_layout() {
        let (_temp, root) = make_extension();
        let cli = cli(&["quark", "--build"]);

        let err = WatchConfig::resolve(&cli, &Settings::default(), &root, &root).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath { what: "sclang", .. }));
    }

    #[test]
    fn test_locate_explicit_settings() {
        let (_temp, root) = make_extension();
        fs::write(root.join("custom.toml"), "").unwrap();

        let found = locate_settings(&cli(&["--settings", "custom.toml"]), &root).unwrap();
        assert_eq!(found, Some(root.join("custom.toml")));

        let err = locate_settings(&cli(&["--settings", "missing.toml"]), &root).unwrap_err();
        assert!(matches!(err, ConfigError::MissingPath { what: "settings file", .. }));
    }
}
