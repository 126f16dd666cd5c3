use crate::config::LoggingSettings;

/// Initialize tracing/logging from the `[logging]` configuration section.
///
/// A disabled section leaves logging uninitialized entirely.
pub fn init(settings: &LoggingSettings) {
    if !settings.enabled {
        return;
    }

    let lvl = match settings.level.to_lowercase().as_str() {
        "error" => tracing::Level::ERROR,
        "warn" | "warning" => tracing::Level::WARN,
        "debug" => tracing::Level::DEBUG,
        "trace" => tracing::Level::TRACE,
        _ => tracing::Level::INFO,
    };

    // Use try_init so tests and libraries can call this multiple times without panicking
    let _ = tracing_subscriber::fmt()
        .with_max_level(lvl)
        .with_target(false)
        .try_init();
}
