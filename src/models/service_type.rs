//! Catálogo de tipos de servicio
//!
//! Lista estática de lookup, read-only desde la perspectiva del motor.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ServiceType {
    pub id: i64,
    pub name: String,
}

/// Catálogo por defecto cuando la colección está vacía o no existe
pub fn default_service_names() -> Vec<String> {
    [
        "Oil change",
        "Tires",
        "Brakes",
        "Belt",
        "Filters",
        "Suspension",
        "Electrical",
        "Other",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
