//! Job batch de sincronización
//!
//! Lee las tres credenciales del entorno (usuario y password del feed, más
//! DATABASE_URL para el store), ejecuta una pasada completa de
//! reconciliación y termina. Sin flags: toda la configuración llega por
//! entorno. Pensado para correr desde un scheduler externo (cron / CI).

use std::time::Duration;

use anyhow::{anyhow, Result};
use dotenvy::dotenv;
use tracing::{error, info};

use fleet_maintenance::clients::TelemetryClient;
use fleet_maintenance::config::environment::EnvironmentConfig;
use fleet_maintenance::database;
use fleet_maintenance::services::SyncService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    info!("🚀 Sync de telemetría iniciado...");

    let config = EnvironmentConfig::default();
    let feed_url = config
        .feed_url
        .clone()
        .ok_or_else(|| anyhow!("TELEMETRY_FEED_URL must be set"))?;
    let feed_user = config
        .feed_user
        .clone()
        .ok_or_else(|| anyhow!("TELEMETRY_FEED_USER must be set"))?;
    let feed_pass = config
        .feed_pass
        .clone()
        .ok_or_else(|| anyhow!("TELEMETRY_FEED_PASS must be set"))?;

    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando al store: {}", e);
            return Err(e);
        }
    };

    let client = TelemetryClient::new(feed_url, feed_user, feed_pass);
    let sync = SyncService::new(
        pool,
        config.feed_page_size,
        config.feed_max_pages,
        Duration::from_millis(config.feed_page_pause_ms),
    );

    let report = sync
        .run(&client)
        .await
        .map_err(|e| anyhow!("Sync falló: {}", e))?;

    info!(
        "✅ Sync completo: {} vehículos, {} muestras descargadas, {} posiciones vigentes",
        report.vehicles_synced, report.samples_fetched, report.positions_stored
    );

    Ok(())
}
