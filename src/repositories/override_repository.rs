//! Repositorio de odómetros manuales
//!
//! Una fila por placa, last-write-wins. Se crea en la primera entrada
//! manual, se actualiza después y nunca se borra.

use sqlx::PgPool;

use super::with_write_retry;
use crate::models::ManualOverride;
use crate::utils::errors::AppError;

pub struct OverrideRepository {
    pool: PgPool,
}

impl OverrideRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<ManualOverride>, AppError> {
        let overrides = sqlx::query_as::<_, ManualOverride>(
            "SELECT plate, odometer FROM manual_overrides ORDER BY plate",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(overrides)
    }

    pub async fn upsert(&self, plate: &str, odometer: f64) -> Result<ManualOverride, AppError> {
        with_write_retry("manual_overrides.upsert", || async move {
            sqlx::query_as::<_, ManualOverride>(
                r#"
                INSERT INTO manual_overrides (plate, odometer)
                VALUES ($1, $2)
                ON CONFLICT (plate) DO UPDATE SET odometer = EXCLUDED.odometer
                RETURNING plate, odometer
                "#,
            )
            .bind(plate)
            .bind(odometer)
            .fetch_one(&self.pool)
            .await
        })
        .await
    }
}
