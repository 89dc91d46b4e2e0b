//! Controller de odómetros
//!
//! Expone el mapa resuelto placa -> km y el alta/actualización de
//! odómetros manuales.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::odometer_dto::{ResolvedOdometerResponse, UpsertManualOdometerRequest};
use crate::dto::ApiResponse;
use crate::models::ManualOverride;
use crate::repositories::override_repository::OverrideRepository;
use crate::services::OdometerResolver;
use crate::utils::errors::AppError;

pub struct OdometerController {
    resolver: OdometerResolver,
    overrides: OverrideRepository,
}

impl OdometerController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            resolver: OdometerResolver::new(pool.clone()),
            overrides: OverrideRepository::new(pool),
        }
    }

    /// Mapa completo de odómetros vigentes, ordenado por placa
    pub async fn list_resolved(&self) -> Result<Vec<ResolvedOdometerResponse>, AppError> {
        let resolved = self.resolver.resolve_all().await?;
        Ok(resolved
            .into_iter()
            .map(|(plate, value)| ResolvedOdometerResponse {
                plate,
                odometer: value.odometer,
                source: value.source.as_str().to_string(),
            })
            .collect())
    }

    /// Crear o actualizar el KM manual de una placa (last-write-wins)
    pub async fn upsert_manual(
        &self,
        plate: &str,
        request: UpsertManualOdometerRequest,
    ) -> Result<ApiResponse<ManualOverride>, AppError> {
        request.validate()?;

        if plate.trim().is_empty() {
            return Err(AppError::BadRequest("Plate must not be empty".to_string()));
        }

        let saved = self.overrides.upsert(plate.trim(), request.odometer).await?;
        log::info!("💾 KM manual de {} actualizado a {}", saved.plate, saved.odometer);
        Ok(ApiResponse::success_with_message(
            saved,
            "Manual odometer saved".to_string(),
        ))
    }
}
