//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// Level for a numeric debug setting, falling back to the `-v` count
///
/// A debug setting always wins over `-v` when present.
pub fn level_for(debug: Option<u8>, verbose: u8) -> LevelFilter {
    match debug.unwrap_or(verbose) {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

/// Build the event filter
///
/// `RUST_LOG` takes precedence over `level` when it is set and valid.
pub fn filter_for(level: LevelFilter) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()))
}

/// Install the global subscriber, writing to stderr
///
/// Does nothing if a subscriber is already installed.
pub fn init(level: LevelFilter, use_color: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_for(level))
        .with_ansi(use_color)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
