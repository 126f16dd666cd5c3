use serde::Deserialize;

/// Top-level configuration settings for the application.
///
/// Covers the outbound transport client, storage driver, notification and
/// logging switches, the externally enforced rate-limit/auth surfaces, and
/// the staleness sweep.
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub transport: TransportSettings,
    pub storage: StorageSettings,
    pub notifications: NotificationSettings,
    pub logging: LoggingSettings,
    pub rate_limit: RateLimitSettings,
    pub auth: AuthSettings,
    pub sweep: SweepSettings,
}

/// Settings for the outbound transport client (region, endpoint, optional
/// static credential override).
#[derive(Debug, Deserialize, Clone)]
pub struct TransportSettings {
    pub region: String,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl TransportSettings {
    /// Static credentials, only when both halves are present and
    /// non-empty; otherwise the client falls back to its provider chain.
    pub fn static_credentials(&self) -> Option<(String, String)> {
        match (&self.access_key, &self.secret_key) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key.clone(), secret.clone()))
            }
            _ => None,
        }
    }
}

/// Which persistence driver backs the connection store.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageDriver {
    /// In-process store.
    Cache,
    /// Embedded sled database.
    Database,
}

/// Settings for the connection store.
#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub driver: StorageDriver,
    pub path: String,
    pub key_prefix: String,
    pub ttl_seconds: i64,
}

/// Whether registry mutations emit notifications.
#[derive(Debug, Deserialize, Clone)]
pub struct NotificationSettings {
    pub enabled: bool,
}

/// Logging switch and level.
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub enabled: bool,
    pub level: String,
}

/// Rate-limit thresholds. Recognized and surfaced only; enforcement lives
/// outside this core.
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    pub enabled: bool,
    pub max_connections_per_minute: u32,
    pub max_messages_per_minute: u32,
}

/// Authentication surface. Recognized and surfaced only; enforcement lives
/// outside this core.
#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub enabled: bool,
    pub guard: String,
}

/// Settings for the staleness sweep daemon.
#[derive(Debug, Deserialize, Clone)]
pub struct SweepSettings {
    pub max_age_minutes: i64,
    pub interval_secs: u64,
}

/// Partial configuration settings loaded from files or environment.
///
/// Allows partial specification of settings. Missing values are filled
/// from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub transport: Option<PartialTransportSettings>,
    pub storage: Option<PartialStorageSettings>,
    pub notifications: Option<PartialNotificationSettings>,
    pub logging: Option<PartialLoggingSettings>,
    pub rate_limit: Option<PartialRateLimitSettings>,
    pub auth: Option<PartialAuthSettings>,
    pub sweep: Option<PartialSweepSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialTransportSettings {
    pub region: Option<String>,
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialStorageSettings {
    pub driver: Option<StorageDriver>,
    pub path: Option<String>,
    pub key_prefix: Option<String>,
    pub ttl_seconds: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct PartialNotificationSettings {
    pub enabled: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub enabled: Option<bool>,
    pub level: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialRateLimitSettings {
    pub enabled: Option<bool>,
    pub max_connections_per_minute: Option<u32>,
    pub max_messages_per_minute: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct PartialAuthSettings {
    pub enabled: Option<bool>,
    pub guard: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialSweepSettings {
    pub max_age_minutes: Option<i64>,
    pub interval_secs: Option<u64>,
}

/// Provides default values for `Settings`.
///
/// Ensures the application has sensible defaults if no configuration is
/// provided.
impl Default for Settings {
    fn default() -> Self {
        Self {
            transport: TransportSettings {
                region: "us-east-1".to_string(),
                endpoint: None,
                access_key: None,
                secret_key: None,
            },
            storage: StorageSettings {
                driver: StorageDriver::Cache,
                path: "wsgate_db".to_string(),
                key_prefix: "websocket".to_string(),
                ttl_seconds: 86_400,
            },
            notifications: NotificationSettings { enabled: true },
            logging: LoggingSettings {
                enabled: true,
                level: "info".to_string(),
            },
            rate_limit: RateLimitSettings {
                enabled: false,
                max_connections_per_minute: 60,
                max_messages_per_minute: 600,
            },
            auth: AuthSettings {
                enabled: false,
                guard: "web".to_string(),
            },
            sweep: SweepSettings {
                max_age_minutes: 1440,
                interval_secs: 300,
            },
        }
    }
}
