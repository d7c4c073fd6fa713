//! schelp-watch - rebuild and preview SuperCollider help files as you edit them.

mod cli;
mod config;
mod core;
mod interpreter;
mod logger;
mod session;
mod utils;
mod watch;

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use cli::Cli;
use config::WatchConfig;
use interpreter::{Echo, Interpreter, OutputMode};
use session::DocSession;
use watch::ChangeWatcher;

fn main() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    let shutdown = core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = match WatchConfig::load(&cli) {
        Ok(config) => config,
        Err(e) => {
            log!("error"; "{:#}", e);
            std::process::exit(1);
        }
    };

    log!("watch"; "starting in {} mode at '{}'", config.mode, config.root.display());
    log!("scdoc"; "HelpSource: {}", config.help_source.display());
    if let Some(sclang_config) = &config.sclang_config {
        log!("sclang"; "config: {}", sclang_config.display());
    }

    // Watcher-first: edits made while SCDoc indexes are buffered
    let watcher = ChangeWatcher::new(&config.help_source)?;

    log!("sclang"; "starting {}", config.sclang.display());
    let mut interpreter = Interpreter::new(&config.sclang, config.sclang_config.clone());
    interpreter
        .start(OutputMode::from_quiet(config.quiet))
        .context("sclang failed to start")?;

    // Discarded output has no use for echoed results
    let echo = if config.quiet { Echo::Silent } else { Echo::Verbose };
    let mut session = DocSession::new(interpreter).with_echo(echo);

    let result = run(&config, &mut session, watcher, &shutdown);

    if let Err(e) = session.evaluator_mut().stop() {
        debug!("sclang"; "stop failed: {}", e);
    }
    result
}

/// Initialize SCDoc, open the preview, then recompile changes until shutdown.
fn run(
    config: &WatchConfig,
    session: &mut DocSession<Interpreter>,
    watcher: ChangeWatcher,
    shutdown: &crossbeam::channel::Receiver<()>,
) -> Result<()> {
    log!("scdoc"; "initializing");
    session
        .initialize(
            &config.help_source,
            config.help_target.as_deref(),
            config.mode,
        )
        .context("failed to initialize SCDoc")?;

    let state = session.state();
    debug!(
        "scdoc";
        "{} {} -> {}",
        if state.extension { "include path" } else { "helpSourceDir" },
        state.source_dir.display(),
        state
            .target_dir
            .as_deref()
            .map_or_else(|| "temporary target".to_string(), |t| t.display().to_string())
    );

    if config.preview {
        log!("scdoc"; "opening help browser");
        session.open_preview().context("failed to open help browser")?;
    }

    if core::is_shutdown() {
        return Ok(());
    }

    log!("watch"; "watching {} for changes", watcher.root().display());
    watcher.run(shutdown, |path| {
        session
            .recompile(path)
            .with_context(|| format!("failed to recompile {}", path.display()))
    })
}
