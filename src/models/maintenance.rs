//! Modelo de registros de mantenimiento
//!
//! Este módulo contiene el registro de mantenimiento y sus enums de estado.
//! El ciclo de vida es `Scheduled` -> `Completed` (terminal): un registro
//! completado nunca vuelve a `Scheduled`; el reagendamiento crea un registro
//! nuevo, no muta el anterior hacia atrás.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado del registro de mantenimiento - se persiste como texto
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MaintenanceStatus {
    Scheduled,
    Completed,
}

impl MaintenanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MaintenanceStatus::Scheduled => "Scheduled",
            MaintenanceStatus::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for MaintenanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Clasificación de vencimiento frente al odómetro actual
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DueStatus {
    Overdue,
    Attention,
    OnTrack,
}

/// Registro de mantenimiento - mapea a la colección maintenance_records
///
/// `id` es monotónico: max(id existente) + 1 al crear, o 1 si no hay
/// ninguno. `next_km_target` es el umbral que el motor compara contra el
/// odómetro actual; se fija al crear/reagendar y solo cambia por edición
/// explícita.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub plate: String,
    pub service_type: String,
    pub km_done: Option<f64>,
    pub date_done: Option<NaiveDate>,
    pub next_km_target: f64,
    pub responsible: String,
    pub cost: f64,
    pub notes: String,
    pub status: String,
}

impl MaintenanceRecord {
    pub fn is_completed(&self) -> bool {
        self.status == MaintenanceStatus::Completed.as_str()
    }
}

/// Campos de un registro nuevo, antes de asignarle id
#[derive(Debug, Clone, PartialEq)]
pub struct MaintenanceDraft {
    pub plate: String,
    pub service_type: String,
    pub km_done: Option<f64>,
    pub date_done: Option<NaiveDate>,
    pub next_km_target: f64,
    pub responsible: String,
    pub cost: f64,
    pub notes: String,
    pub status: MaintenanceStatus,
}
