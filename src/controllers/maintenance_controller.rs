//! Controller de mantenimiento
//!
//! Valida los requests, resuelve el odómetro vigente cuando la operación
//! lo necesita y delega en el scheduler.

use sqlx::PgPool;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, CompleteMaintenanceResponse, CreateMaintenanceRequest,
    CreateMaintenanceResponse, EditMaintenanceRequest, PendingMaintenanceResponse,
};
use crate::dto::ApiResponse;
use crate::models::MaintenanceRecord;
use crate::repositories::service_type_repository::ServiceTypeRepository;
use crate::services::{MaintenanceScheduler, OdometerResolver};
use crate::utils::errors::AppError;

pub struct MaintenanceController {
    scheduler: MaintenanceScheduler,
    resolver: OdometerResolver,
    service_types: ServiceTypeRepository,
}

impl MaintenanceController {
    pub fn new(pool: PgPool, config: &EnvironmentConfig) -> Self {
        Self {
            scheduler: MaintenanceScheduler::new(
                pool.clone(),
                config.due_soon_threshold_km,
                config.default_reminder_interval_km,
            ),
            resolver: OdometerResolver::new(pool.clone()),
            service_types: ServiceTypeRepository::new(pool),
        }
    }

    pub async fn list_pending(&self) -> Result<Vec<PendingMaintenanceResponse>, AppError> {
        let odometers = self.resolver.resolve_all().await?;
        self.scheduler.list_pending(&odometers).await
    }

    pub async fn list_history(&self) -> Result<Vec<MaintenanceRecord>, AppError> {
        self.scheduler.list_history().await
    }

    pub async fn create(
        &self,
        request: CreateMaintenanceRequest,
    ) -> Result<ApiResponse<CreateMaintenanceResponse>, AppError> {
        request.validate()?;

        let response = self.scheduler.create(request).await?;
        Ok(ApiResponse::success_with_message(
            response,
            "Maintenance record created".to_string(),
        ))
    }

    pub async fn complete(
        &self,
        id: i64,
        request: CompleteMaintenanceRequest,
    ) -> Result<ApiResponse<CompleteMaintenanceResponse>, AppError> {
        request.validate()?;

        let response = self.scheduler.complete(id, request).await?;
        let message = match response.rescheduled {
            Some(ref next) => format!(
                "Record completed and rescheduled for {} km",
                next.next_km_target
            ),
            None => "Record completed".to_string(),
        };
        Ok(ApiResponse::success_with_message(response, message))
    }

    pub async fn edit(
        &self,
        id: i64,
        request: EditMaintenanceRequest,
    ) -> Result<ApiResponse<MaintenanceRecord>, AppError> {
        request.validate()?;

        let record = self.scheduler.edit(id, request).await?;
        Ok(ApiResponse::success_with_message(
            record,
            "Maintenance record updated".to_string(),
        ))
    }

    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        self.scheduler.delete(id).await
    }

    pub async fn list_service_types(&self) -> Result<Vec<String>, AppError> {
        self.service_types.list_names().await
    }
}
