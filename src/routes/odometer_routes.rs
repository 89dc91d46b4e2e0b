use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};

use crate::controllers::odometer_controller::OdometerController;
use crate::dto::odometer_dto::{ResolvedOdometerResponse, UpsertManualOdometerRequest};
use crate::dto::ApiResponse;
use crate::models::ManualOverride;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_odometer_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_odometers))
        .route("/:plate", put(upsert_manual_odometer))
}

async fn list_odometers(
    State(state): State<AppState>,
) -> Result<Json<Vec<ResolvedOdometerResponse>>, AppError> {
    let controller = OdometerController::new(state.pool.clone());
    let response = controller.list_resolved().await?;
    Ok(Json(response))
}

async fn upsert_manual_odometer(
    State(state): State<AppState>,
    Path(plate): Path<String>,
    Json(request): Json<UpsertManualOdometerRequest>,
) -> Result<Json<ApiResponse<ManualOverride>>, AppError> {
    let controller = OdometerController::new(state.pool.clone());
    let response = controller.upsert_manual(&plate, request).await?;
    Ok(Json(response))
}
