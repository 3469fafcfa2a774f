//! Stderr logging for the command line
//!
//! The library logs through the `log` facade. The binary forwards those
//! records into a `tracing-subscriber` formatter, colored on terminals.

use std::io::IsTerminal;

use tracing_subscriber::filter::LevelFilter;

/// `tracing` counterpart of a `log` level filter
fn tracing_level(level: log::LevelFilter) -> LevelFilter {
    match level {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    }
}

/// Install the subscriber. Calling it twice keeps the first one but updates the level.
pub fn init(level: log::LevelFilter) {
    let installed = tracing_subscriber::fmt()
        .with_max_level(tracing_level(level))
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .without_time()
        .try_init();
    if installed.is_err() {
        log::debug!("logger already installed");
    }
    log::set_max_level(level);
}
