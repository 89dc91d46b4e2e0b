//! Repositorio de posiciones
//!
//! Solo se persiste el set reconciliado de una fila por vehículo; el
//! sistema intencionalmente no retiene histórico completo de posiciones
//! (eso acota el crecimiento del storage).

use sqlx::PgPool;

use super::with_write_retry;
use crate::models::PositionSample;
use crate::utils::errors::AppError;

pub struct PositionRepository {
    pool: PgPool,
}

impl PositionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<PositionSample>, AppError> {
        let positions = sqlx::query_as::<_, PositionSample>(
            "SELECT packet_id, vehicle_id, plate, timestamp, odometer FROM positions ORDER BY plate",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(positions)
    }

    /// Reemplazar la colección por el set reconciliado (una fila por vehículo)
    pub async fn replace_all(&self, positions: &[PositionSample]) -> Result<(), AppError> {
        let pool = &self.pool;
        with_write_retry("positions.replace_all", || async move {
            let mut tx = pool.begin().await?;
            sqlx::query("DELETE FROM positions").execute(&mut *tx).await?;
            for position in positions {
                sqlx::query(
                    r#"
                    INSERT INTO positions (packet_id, vehicle_id, plate, timestamp, odometer)
                    VALUES ($1, $2, $3, $4, $5)
                    "#,
                )
                .bind(&position.packet_id)
                .bind(&position.vehicle_id)
                .bind(&position.plate)
                .bind(position.timestamp)
                .bind(position.odometer)
                .execute(&mut *tx)
                .await?;
            }
            tx.commit().await
        })
        .await
    }
}
