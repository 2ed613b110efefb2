//! # SudoFighter
//!
//! Runs one headless match and prints the result.
//!
//! Usage: `sudofighter [CONFIG]`. Without an argument the configuration is
//! read from `sudofighter.toml` in the working directory, falling back to
//! defaults when it is missing.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Main entry point.
fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("sudofighter=info".parse()?))
        .init();

    info!("SudoFighter starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let config_path = std::env::args().nth(1);
    sudofighter_engine::app::run(config_path.as_deref())?;

    info!("SudoFighter shutdown complete");
    Ok(())
}
