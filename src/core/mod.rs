//! Process-wide state shared by the watch session.

mod state;

pub use state::{is_shutdown, setup_shutdown_handler};
