//! Logging initialization.
//!
//! Everything goes to stderr; stdout is reserved for the obfuscated program.
//! The level comes from `-v` only, never from the environment.

use tracing::Level;

/// `verbosity`: 0 = WARN, 1 = DEBUG, 2+ = TRACE.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
