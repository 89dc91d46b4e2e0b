//! Repositorio de vehículos
//!
//! La colección se refresca completa en cada sync (nunca updates parciales),
//! igual que la emite el feed.

use sqlx::PgPool;

use super::with_write_retry;
use crate::models::Vehicle;
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles =
            sqlx::query_as::<_, Vehicle>("SELECT id, plate FROM vehicles ORDER BY plate")
                .fetch_all(&self.pool)
                .await?;

        Ok(vehicles)
    }

    /// Reemplazo wholesale de la colección
    pub async fn replace_all(&self, vehicles: &[Vehicle]) -> Result<(), AppError> {
        let pool = &self.pool;
        with_write_retry("vehicles.replace_all", || async move {
            let mut tx = pool.begin().await?;
            sqlx::query("DELETE FROM vehicles").execute(&mut *tx).await?;
            for vehicle in vehicles {
                sqlx::query("INSERT INTO vehicles (id, plate) VALUES ($1, $2)")
                    .bind(&vehicle.id)
                    .bind(&vehicle.plate)
                    .execute(&mut *tx)
                    .await?;
            }
            tx.commit().await
        })
        .await
    }
}
