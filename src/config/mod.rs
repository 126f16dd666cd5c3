//! The `config` module handles loading and merging application
//! configuration.
//!
//! Configuration is read from `config/default` (any format the `config`
//! crate recognizes) and `WSGATE_*` environment variables, then merged
//! over built-in defaults so every field always has a value.

mod settings;

use config::{Config, ConfigError, Environment, File};

use crate::config::settings::PartialSettings;

pub use settings::{
    AuthSettings, LoggingSettings, NotificationSettings, RateLimitSettings, Settings,
    StorageDriver, StorageSettings, SweepSettings, TransportSettings,
};

/// Loads the configuration from the default file and environment variables
/// and merges it with default values.
pub fn load_config() -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("WSGATE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        transport: TransportSettings {
            region: partial
                .transport
                .as_ref()
                .and_then(|t| t.region.clone())
                .unwrap_or(default.transport.region),
            endpoint: partial
                .transport
                .as_ref()
                .and_then(|t| t.endpoint.clone())
                .or(default.transport.endpoint),
            access_key: partial
                .transport
                .as_ref()
                .and_then(|t| t.access_key.clone())
                .or(default.transport.access_key),
            secret_key: partial
                .transport
                .as_ref()
                .and_then(|t| t.secret_key.clone())
                .or(default.transport.secret_key),
        },
        storage: StorageSettings {
            driver: partial
                .storage
                .as_ref()
                .and_then(|s| s.driver)
                .unwrap_or(default.storage.driver),
            path: partial
                .storage
                .as_ref()
                .and_then(|s| s.path.clone())
                .unwrap_or(default.storage.path),
            key_prefix: partial
                .storage
                .as_ref()
                .and_then(|s| s.key_prefix.clone())
                .unwrap_or(default.storage.key_prefix),
            ttl_seconds: partial
                .storage
                .as_ref()
                .and_then(|s| s.ttl_seconds)
                .unwrap_or(default.storage.ttl_seconds),
        },
        notifications: NotificationSettings {
            enabled: partial
                .notifications
                .as_ref()
                .and_then(|n| n.enabled)
                .unwrap_or(default.notifications.enabled),
        },
        logging: LoggingSettings {
            enabled: partial
                .logging
                .as_ref()
                .and_then(|l| l.enabled)
                .unwrap_or(default.logging.enabled),
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
        rate_limit: RateLimitSettings {
            enabled: partial
                .rate_limit
                .as_ref()
                .and_then(|r| r.enabled)
                .unwrap_or(default.rate_limit.enabled),
            max_connections_per_minute: partial
                .rate_limit
                .as_ref()
                .and_then(|r| r.max_connections_per_minute)
                .unwrap_or(default.rate_limit.max_connections_per_minute),
            max_messages_per_minute: partial
                .rate_limit
                .as_ref()
                .and_then(|r| r.max_messages_per_minute)
                .unwrap_or(default.rate_limit.max_messages_per_minute),
        },
        auth: AuthSettings {
            enabled: partial
                .auth
                .as_ref()
                .and_then(|a| a.enabled)
                .unwrap_or(default.auth.enabled),
            guard: partial
                .auth
                .as_ref()
                .and_then(|a| a.guard.clone())
                .unwrap_or(default.auth.guard),
        },
        sweep: SweepSettings {
            max_age_minutes: partial
                .sweep
                .as_ref()
                .and_then(|s| s.max_age_minutes)
                .unwrap_or(default.sweep.max_age_minutes),
            interval_secs: partial
                .sweep
                .as_ref()
                .and_then(|s| s.interval_secs)
                .unwrap_or(default.sweep.interval_secs),
        },
    })
}
