//! Repositorio de registros de mantenimiento
//!
//! El id se asigna en el propio INSERT (max existente + 1, o 1 si no hay
//! ninguno), de modo que cada alta lee el estado fresco de la colección.

use chrono::NaiveDate;
use sqlx::PgPool;

use super::with_write_retry;
use crate::models::{MaintenanceDraft, MaintenanceRecord, MaintenanceStatus};
use crate::utils::errors::AppError;

/// Próximo id de la colección: max(id existente) + 1, o 1 si está vacía.
///
/// Es el mismo cálculo que ejecuta el INSERT de `insert` dentro del SQL;
/// esta es la versión pura. Los ids son monotónicos y nunca rellenan
/// huecos dejados por borrados.
pub fn next_id(existing: &[i64]) -> i64 {
    existing.iter().copied().max().unwrap_or(0) + 1
}

pub struct MaintenanceRepository {
    pool: PgPool,
}

impl MaintenanceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<MaintenanceRecord>, AppError> {
        let record = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Todos los registros no completados
    pub async fn find_pending(&self) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE status <> $1 ORDER BY id",
        )
        .bind(MaintenanceStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Histórico: completados, más recientes primero
    pub async fn find_completed(&self) -> Result<Vec<MaintenanceRecord>, AppError> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT * FROM maintenance_records WHERE status = $1 ORDER BY id DESC",
        )
        .bind(MaintenanceStatus::Completed.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    /// Insertar un registro nuevo; el subselect asigna el id con el mismo
    /// cálculo que `next_id`, leyendo el max fresco en el propio INSERT
    pub async fn insert(&self, draft: &MaintenanceDraft) -> Result<MaintenanceRecord, AppError> {
        with_write_retry("maintenance_records.insert", || async move {
            sqlx::query_as::<_, MaintenanceRecord>(
                r#"
                INSERT INTO maintenance_records
                    (id, plate, service_type, km_done, date_done, next_km_target, responsible, cost, notes, status)
                VALUES
                    ((SELECT COALESCE(MAX(id), 0) + 1 FROM maintenance_records),
                     $1, $2, $3, $4, $5, $6, $7, $8, $9)
                RETURNING *
                "#,
            )
            .bind(&draft.plate)
            .bind(&draft.service_type)
            .bind(draft.km_done)
            .bind(draft.date_done)
            .bind(draft.next_km_target)
            .bind(&draft.responsible)
            .bind(draft.cost)
            .bind(&draft.notes)
            .bind(draft.status.as_str())
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    /// Baja: muta el registro in-place a Completed.
    /// `notes` llega ya concatenada por el scheduler (nunca se pisan notas previas).
    #[allow(clippy::too_many_arguments)]
    pub async fn mark_completed(
        &self,
        id: i64,
        km_done: f64,
        date_done: NaiveDate,
        cost: f64,
        responsible: &str,
        notes: &str,
    ) -> Result<MaintenanceRecord, AppError> {
        with_write_retry("maintenance_records.mark_completed", || async move {
            sqlx::query_as::<_, MaintenanceRecord>(
                r#"
                UPDATE maintenance_records
                SET km_done = $2, date_done = $3, cost = $4, responsible = $5, notes = $6, status = $7
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(km_done)
            .bind(date_done)
            .bind(cost)
            .bind(responsible)
            .bind(notes)
            .bind(MaintenanceStatus::Completed.as_str())
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    /// Edición in-place de campos mutables; no toca el status
    #[allow(clippy::too_many_arguments)]
    pub async fn update_fields(
        &self,
        id: i64,
        plate: Option<String>,
        service_type: Option<String>,
        responsible: Option<String>,
        km_done: Option<f64>,
        next_km_target: Option<f64>,
        cost: Option<f64>,
        notes: Option<String>,
    ) -> Result<MaintenanceRecord, AppError> {
        // Leer estado fresco antes de escribir
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Maintenance record {} not found", id)))?;

        let plate = plate.unwrap_or_else(|| current.plate.clone());
        let service_type = service_type.unwrap_or_else(|| current.service_type.clone());
        let responsible = responsible.unwrap_or_else(|| current.responsible.clone());
        let notes = notes.unwrap_or_else(|| current.notes.clone());
        let km_done = km_done.or(current.km_done);
        let next_km_target = next_km_target.unwrap_or(current.next_km_target);
        let cost = cost.unwrap_or(current.cost);

        let (plate, service_type, responsible, notes) = (&plate, &service_type, &responsible, &notes);
        with_write_retry("maintenance_records.update_fields", || async move {
            sqlx::query_as::<_, MaintenanceRecord>(
                r#"
                UPDATE maintenance_records
                SET plate = $2, service_type = $3, responsible = $4,
                    km_done = $5, next_km_target = $6, cost = $7, notes = $8
                WHERE id = $1
                RETURNING *
                "#,
            )
            .bind(id)
            .bind(plate.as_str())
            .bind(service_type.as_str())
            .bind(responsible.as_str())
            .bind(km_done)
            .bind(next_km_target)
            .bind(cost)
            .bind(notes.as_str())
            .fetch_one(&self.pool)
            .await
        })
        .await
    }

    /// Borrado permanente, irreversible
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        let result = with_write_retry("maintenance_records.delete", || async move {
            sqlx::query("DELETE FROM maintenance_records WHERE id = $1")
                .bind(id)
                .execute(&self.pool)
                .await
        })
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "Maintenance record {} not found",
                id
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_id_starts_at_one() {
        assert_eq!(next_id(&[]), 1);
    }

    #[test]
    fn test_sequential_creation_yields_consecutive_ids() {
        // N altas seguidas sobre una colección vacía producen ids 1..N
        let mut ids: Vec<i64> = Vec::new();
        for expected in 1..=5 {
            let id = next_id(&ids);
            assert_eq!(id, expected);
            ids.push(id);
        }
    }

    #[test]
    fn test_next_id_never_fills_deletion_gaps() {
        assert_eq!(next_id(&[1, 3]), 4);
    }
}
