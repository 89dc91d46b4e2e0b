//! Pasada completa de sincronización
//!
//! Orquesta un ciclo batch: refresco wholesale de vehículos, descarga
//! paginada de la cola de posiciones, merge con el set persistido y
//! persistencia del resultado (una fila por vehículo). Ejecución
//! single-threaded y síncrona de punta a punta; no hay cancelación a mitad
//! de sync: si el proceso muere, el estado queda parcialmente actualizado y
//! re-correr es seguro porque la reconciliación es idempotente por muestra.

use std::collections::HashMap;
use std::time::Duration;

use sqlx::PgPool;

use crate::clients::telemetry_client::PositionFeed;
use crate::models::Vehicle;
use crate::repositories::position_repository::PositionRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::position_reconciler;
use crate::utils::errors::AppError;

/// Resumen de una pasada de sync
#[derive(Debug, Default)]
pub struct SyncReport {
    pub vehicles_synced: usize,
    pub samples_fetched: usize,
    pub positions_stored: usize,
}

pub struct SyncService {
    vehicle_repository: VehicleRepository,
    position_repository: PositionRepository,
    page_size: u32,
    max_pages: u32,
    page_pause: Duration,
}

impl SyncService {
    pub fn new(pool: PgPool, page_size: u32, max_pages: u32, page_pause: Duration) -> Self {
        Self {
            vehicle_repository: VehicleRepository::new(pool.clone()),
            position_repository: PositionRepository::new(pool),
            page_size,
            max_pages,
            page_pause,
        }
    }

    pub async fn run(&self, feed: &dyn PositionFeed) -> Result<SyncReport, AppError> {
        let mut report = SyncReport::default();

        // 1. Refresco wholesale de vehículos. Un feed caído devuelve lista
        // vacía: se conserva la colección anterior en vez de vaciarla.
        let feed_vehicles = feed.fetch_vehicles().await;
        if !feed_vehicles.is_empty() {
            let vehicles: Vec<Vehicle> = feed_vehicles
                .into_iter()
                .map(|v| Vehicle {
                    id: v.vehicle_id,
                    plate: v.plate,
                })
                .collect();
            self.vehicle_repository.replace_all(&vehicles).await?;
            report.vehicles_synced = vehicles.len();
            log::info!("✅ {} vehículos actualizados", vehicles.len());
        } else {
            log::warn!("⚠️ Feed sin vehículos; se conserva la colección anterior");
        }

        // 2. Descarga paginada de la cola
        let fetched = position_reconciler::fetch_all_pages(
            feed,
            self.page_size,
            self.max_pages,
            self.page_pause,
        )
        .await;
        report.samples_fetched = fetched.len();

        if fetched.is_empty() {
            log::info!("💤 Cola de posiciones vacía");
            return Ok(report);
        }
        log::info!("💾 Procesando {} muestras...", fetched.len());

        // 3. Merge con lo persistido y reemplazo del set vigente
        let persisted = self.position_repository.find_all().await?;
        let plate_by_vehicle: HashMap<String, String> = self
            .vehicle_repository
            .find_all()
            .await?
            .into_iter()
            .map(|v| (v.id, v.plate))
            .collect();

        let latest = position_reconciler::reconcile(fetched, persisted, &plate_by_vehicle);
        self.position_repository.replace_all(&latest).await?;
        report.positions_stored = latest.len();
        log::info!("✅ Base actualizada: {} posiciones vigentes", latest.len());

        Ok(report)
    }
}
