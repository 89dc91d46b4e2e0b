use axum::{
    extract::{Path, State},
    routing::{delete, get, post, put},
    Json, Router,
};

use crate::controllers::maintenance_controller::MaintenanceController;
use crate::dto::maintenance_dto::{
    CompleteMaintenanceRequest, CompleteMaintenanceResponse, CreateMaintenanceRequest,
    CreateMaintenanceResponse, EditMaintenanceRequest, PendingMaintenanceResponse,
};
use crate::dto::ApiResponse;
use crate::models::MaintenanceRecord;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_maintenance_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_maintenance))
        .route("/pending", get(list_pending))
        .route("/history", get(list_history))
        .route("/service-types", get(list_service_types))
        .route("/:id/complete", post(complete_maintenance))
        .route("/:id", put(edit_maintenance))
        .route("/:id", delete(delete_maintenance))
}

async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<Vec<PendingMaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    let response = controller.list_pending().await?;
    Ok(Json(response))
}

async fn list_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    let response = controller.list_history().await?;
    Ok(Json(response))
}

async fn list_service_types(
    State(state): State<AppState>,
) -> Result<Json<Vec<String>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    let response = controller.list_service_types().await?;
    Ok(Json(response))
}

async fn create_maintenance(
    State(state): State<AppState>,
    Json(request): Json<CreateMaintenanceRequest>,
) -> Result<Json<ApiResponse<CreateMaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    let response = controller.create(request).await?;
    Ok(Json(response))
}

async fn complete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<CompleteMaintenanceRequest>,
) -> Result<Json<ApiResponse<CompleteMaintenanceResponse>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    let response = controller.complete(id, request).await?;
    Ok(Json(response))
}

async fn edit_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EditMaintenanceRequest>,
) -> Result<Json<ApiResponse<MaintenanceRecord>>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    let response = controller.edit(id, request).await?;
    Ok(Json(response))
}

async fn delete_maintenance(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = MaintenanceController::new(state.pool.clone(), &state.config);
    controller.delete(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Maintenance record deleted"
    })))
}
