//! DTOs de mantenimiento

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{DueStatus, MaintenanceRecord};

/// Request para registrar una manutención (nueva o ya realizada)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaintenanceRequest {
    #[validate(length(min = 1, max = 20))]
    pub plate: String,

    #[validate(length(min = 1, max = 100))]
    pub service_type: String,

    /// KM base desde el que se proyecta la próxima intervención
    #[validate(range(min = 0.0))]
    pub km_base: f64,

    /// Intervalo hasta la próxima intervención
    #[validate(range(min = 1.0))]
    pub interval_km: f64,

    pub date_done: Option<NaiveDate>,

    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,

    pub responsible: Option<String>,
    pub notes: Option<String>,

    /// true: el servicio ya se realizó y entra directo al histórico
    #[serde(default)]
    pub already_performed: bool,

    /// true: al marcar como realizada, crear además el sucesor agendado
    #[serde(default)]
    pub auto_schedule: bool,
}

/// Request para dar de baja (completar) un registro agendado
#[derive(Debug, Deserialize, Validate)]
pub struct CompleteMaintenanceRequest {
    pub date_done: NaiveDate,

    /// KM real del tablero en el momento de la baja
    #[validate(range(min = 0.0))]
    pub km_done: f64,

    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,

    pub responsible: Option<String>,

    /// Se agrega a las notas existentes, nunca las reemplaza
    pub note: Option<String>,

    /// true: crear el sucesor agendado con meta km_done + interval_km
    #[serde(default)]
    pub reschedule: bool,

    /// Si falta y reschedule=true, se usa el intervalo sugerido
    #[validate(range(min = 1.0))]
    pub interval_km: Option<f64>,
}

/// Request de edición in-place; no altera el status
#[derive(Debug, Deserialize, Validate)]
pub struct EditMaintenanceRequest {
    #[validate(length(min = 1, max = 20))]
    pub plate: Option<String>,

    #[validate(length(min = 1, max = 100))]
    pub service_type: Option<String>,

    pub responsible: Option<String>,

    #[validate(range(min = 0.0))]
    pub km_done: Option<f64>,

    #[validate(range(min = 0.0))]
    pub next_km_target: Option<f64>,

    #[validate(range(min = 0.0))]
    pub cost: Option<f64>,

    pub notes: Option<String>,
}

/// Registro pendiente con su clasificación frente al odómetro actual
#[derive(Debug, Serialize)]
pub struct PendingMaintenanceResponse {
    pub id: i64,
    pub plate: String,
    pub service_type: String,
    pub next_km_target: f64,
    pub responsible: String,
    pub current_odometer: f64,
    pub remaining_km: f64,
    pub due_status: DueStatus,
    /// Intervalo que se ofrecería al reagendar en la baja
    pub suggested_interval_km: f64,
}

/// Response con el resultado de una baja
#[derive(Debug, Serialize)]
pub struct CompleteMaintenanceResponse {
    pub completed: MaintenanceRecord,
    pub rescheduled: Option<MaintenanceRecord>,
}

/// Response con el resultado de un alta
#[derive(Debug, Serialize)]
pub struct CreateMaintenanceResponse {
    pub created: MaintenanceRecord,
    pub scheduled_followup: Option<MaintenanceRecord>,
}
