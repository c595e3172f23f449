//! Tracing initialization.

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Log level for a `-v`/`-q` count: quiet wins, each `-v` raises the level.
pub fn level_for(verbose: u8, quiet: bool) -> Level {
    if quiet {
        return Level::ERROR;
    }
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Initialize tracing to stderr. Safe to call multiple times.
///
/// `RUST_LOG` directives are kept; the CLI level is added on top.
pub fn init(verbose: u8, quiet: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::from_default_env().add_directive(level_for(verbose, quiet).into());

        let result = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_target(true)
            .with_writer(std::io::stderr)
            .compact()
            .try_init();

        if let Err(e) = result {
            eprintln!("Failed to initialize tracing: {e}");
        }
    });
}
