//! DTOs de odómetro

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Odómetro autoritativo resuelto para una placa
#[derive(Debug, Serialize, PartialEq)]
pub struct ResolvedOdometerResponse {
    pub plate: String,
    pub odometer: f64,
    /// "manual" o "telemetry"
    pub source: String,
}

/// Request para crear/actualizar el KM manual de una placa
#[derive(Debug, Deserialize, Validate)]
pub struct UpsertManualOdometerRequest {
    #[validate(range(min = 0.0))]
    pub odometer: f64,
}
