//! Command-line interface definitions.

use clap::{ColorChoice, Parser};
use std::path::PathBuf;

use crate::config::Mode;

/// Watch .schelp files, rebuilding and previewing help files on source changes
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = LONG_ABOUT)]
pub struct Cli {
    /// Build folder (build mode) or extension folder (extension mode)
    #[arg(value_name = "PATH", value_hint = clap::ValueHint::DirPath)]
    pub path: Option<PathBuf>,

    /// Build mode: take sclang, its config and HelpSource from a SuperCollider build folder
    #[arg(short, long, conflicts_with = "extension")]
    pub build: bool,

    /// Extension mode: add PATH to SCDoc's help sources (quarks and extensions)
    #[arg(short, long)]
    pub extension: bool,

    /// Where to write rendered help (default: a temporary copy)
    #[arg(long, value_name = "DIR", value_hint = clap::ValueHint::DirPath)]
    pub target: Option<PathBuf>,

    /// sclang command or path (default: sclang)
    #[arg(long, value_name = "CMD", value_hint = clap::ValueHint::CommandName)]
    pub sclang: Option<String>,

    /// sclang config file passed with -al
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Hide sclang output (also skips the help browser)
    #[arg(short, long)]
    pub quiet: bool,

    /// Write to the target, but don't open the help browser
    #[arg(short = 'n', long)]
    pub no_preview: bool,

    /// Settings file (default: nearest schelp-watch.toml)
    #[arg(long, value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    /// Enable verbose output for debugging
    #[arg(short, long)]
    pub verbose: bool,

    /// Control colored output (auto, always, never)
    #[arg(long, default_value = "auto")]
    pub color: ColorChoice,
}

const LONG_ABOUT: &str = "\
Watches .schelp files, rebuilding and previewing help files on source changes.

Build mode is for editing help in SuperCollider's main repository; extension \
mode is for quarks and extensions. Without --build or --extension the mode is \
detected from PATH.";

impl Cli {
    /// Mode forced on the command line, if any.
    pub const fn mode(&self) -> Option<Mode> {
        if self.build {
            Some(Mode::Build)
        } else if self.extension {
            Some(Mode::Extension)
        } else {
            None
        }
    }
}
