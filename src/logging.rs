//! Logger setup for the command-line host. The library itself only talks to the `log` facade.

use log::LevelFilter;

/// Initialize `env_logger` for the CLI.
///
/// Logs at `Info` by default, `Debug` when `debug_enabled`, and `Trace` when `trace_enabled` (so
/// that [`LoggingObserver`](crate::observer::LoggingObserver) output shows up). An explicitly set
/// `RUST_LOG` overrides all of these.
pub fn init_logger(debug_enabled: bool, trace_enabled: bool) {
    let level = if trace_enabled {
        LevelFilter::Trace
    } else if debug_enabled {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder
        .filter(None, level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false);

    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }

    // A second initialization (e.g. from a test harness) keeps the first logger.
    if builder.try_init().is_ok() {
        log::debug!("Logger initialized at {level:?} level");
    }
}
