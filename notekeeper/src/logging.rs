//! Tracing subscriber setup
//!
//! The library itself only emits `tracing` events. Binaries and tests call
//! [`init_tracing`] once to print them to stderr; `RUST_LOG` takes precedence
//! over the level passed in.

use crate::error::{NoteKeeperError, Result};
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a stderr fmt subscriber, failing if one is already set
pub fn try_init_tracing(level: Level) -> Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .try_init()
        .map_err(|e| NoteKeeperError::Other(format!("Failed to install tracing subscriber: {e}")))
}

/// Install a stderr fmt subscriber; a second call is a no-op
pub fn init_tracing(level: Level) {
    if try_init_tracing(level).is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
