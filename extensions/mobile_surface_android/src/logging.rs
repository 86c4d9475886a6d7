//! Logging setup
//!
//! On Android, `tracing` events are forwarded through the `log` facade to
//! logcat via `android_logger`. Elsewhere (host tests, desktop tooling) a
//! `tracing-subscriber` formatter is installed instead.

use mobile_surface::{LogConfig, LogLevel};

/// `log` filter for a configured level
pub fn level_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    }
}

/// Initialize logging once per process; later calls are ignored
#[cfg(target_os = "android")]
pub fn init(config: &LogConfig) {
    android_logger::init_once(
        android_logger::Config::default()
            .with_max_level(level_filter(config.level))
            .with_tag(config.tag.as_str()),
    );
}

/// Initialize logging once per process; later calls are ignored
#[cfg(not(target_os = "android"))]
pub fn init(config: &LogConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.as_str()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_mapping() {
        assert_eq!(level_filter(LogLevel::Error), log::LevelFilter::Error);
        assert_eq!(level_filter(LogLevel::default()), log::LevelFilter::Debug);
        assert_eq!(level_filter(LogLevel::Trace), log::LevelFilter::Trace);
    }

    #[test]
    fn test_init_twice() {
        let config = LogConfig::default();
        init(&config);
        init(&config);
        tracing::debug!("logging initialized");
    }
}
