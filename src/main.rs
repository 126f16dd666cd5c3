use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info};

use wsgate::config::{StorageDriver, load_config};
use wsgate::notify::Notifier;
use wsgate::registry::Registry;
use wsgate::store::{ConnectionStore, MemoryStore, SledStore};
use wsgate::transport::LocalTransport;
use wsgate::utils::logging;

/// Sweeper daemon: periodically evicts stale connections from the
/// configured store and logs registry statistics.
#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let config = load_config().expect("Failed to load configuration");
    logging::init(&config.logging);

    let store: Arc<dyn ConnectionStore> = match config.storage.driver {
        StorageDriver::Database => Arc::new(
            SledStore::new(
                &config.storage.path,
                &config.storage.key_prefix,
                config.storage.ttl_seconds,
            )
            .expect("Failed to open connection store"),
        ),
        StorageDriver::Cache => Arc::new(MemoryStore::new(config.storage.ttl_seconds)),
    };

    let notifier = if config.notifications.enabled {
        let (notifier, mut receiver) = Notifier::new();
        tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                debug!(?notification, "registry notification");
            }
        });
        notifier
    } else {
        Notifier::disabled()
    };

    let transport = Arc::new(LocalTransport::new());
    let registry = Registry::new(store, transport, notifier)
        .with_sweep_max_age(config.sweep.max_age_minutes);

    info!(
        interval_secs = config.sweep.interval_secs,
        max_age_minutes = config.sweep.max_age_minutes,
        "sweeper started"
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(config.sweep.interval_secs));
    loop {
        ticker.tick().await;

        match registry.cleanup() {
            Ok(removed) => {
                if removed > 0 {
                    info!(removed, "swept stale connections");
                }
                match registry.stats() {
                    Ok(stats) => info!(
                        total_connections = stats.total_connections,
                        total_channels = stats.total_channels,
                        "registry stats"
                    ),
                    Err(err) => error!(error = %err, "failed to compute stats"),
                }
            }
            Err(err) => error!(error = %err, "sweep failed"),
        }
    }
}
