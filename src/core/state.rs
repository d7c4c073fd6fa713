//! Shutdown state for the watch session.
//!
//! `SHUTDOWN` is set by the Ctrl+C handler. The watch loop selects on the
//! receiver returned by [`setup_shutdown_handler`] while idle and checks the
//! flag between dispatches.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::{self, Receiver, Sender};

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for the watch loop
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start.
///
/// The first Ctrl+C sets the shutdown flag and wakes the watch loop.
/// A second one exits immediately, in case sclang refuses to quit.
pub fn setup_shutdown_handler() -> anyhow::Result<Receiver<()>> {
    let (tx, rx) = channel::bounded(1);
    if SHUTDOWN_TX.set(tx).is_err() {
        anyhow::bail!("shutdown handler already installed");
    }

    ctrlc::set_handler(|| {
        if SHUTDOWN.swap(true, Ordering::SeqCst) {
            std::process::exit(130);
        }

        crate::log!("watch"; "shutting down...");
        if let Some(tx) = SHUTDOWN_TX.get() {
            let _ = tx.try_send(());
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))?;

    Ok(rx)
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
