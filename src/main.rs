use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use fleet_maintenance::config::environment::EnvironmentConfig;
use fleet_maintenance::database;
use fleet_maintenance::middleware::cors::cors_middleware;
use fleet_maintenance::routes;
use fleet_maintenance::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚛 Fleet Maintenance - API de gestión de flota");
    info!("==============================================");

    // Inicializar base de datos
    let pool = match database::create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let config = EnvironmentConfig::default();
    let app_state = AppState::new(pool, config.clone());

    let app = Router::new()
        .route("/test", get(test_endpoint))
        .nest("/api/maintenance", routes::create_maintenance_router())
        .nest("/api/odometer", routes::create_odometer_router())
        .layer(cors_middleware())
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /test - Endpoint de prueba");
    info!("🔧 Endpoints - Maintenance:");
    info!("   GET  /api/maintenance/pending - Pendientes por urgencia");
    info!("   GET  /api/maintenance/history - Histórico de completados");
    info!("   GET  /api/maintenance/service-types - Catálogo de servicios");
    info!("   POST /api/maintenance - Registrar manutención");
    info!("   POST /api/maintenance/:id/complete - Dar de baja una O.S.");
    info!("   PUT  /api/maintenance/:id - Editar registro");
    info!("   DELETE /api/maintenance/:id - Eliminar registro");
    info!("🚗 Endpoints - Odometer:");
    info!("   GET  /api/odometer - Mapa placa -> km vigente");
    info!("   PUT  /api/odometer/:plate - Guardar KM manual");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Endpoint de prueba simple
async fn test_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "message": "API Fleet Maintenance funcionando correctamente",
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
