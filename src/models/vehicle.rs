//! Modelos de Vehicle y telemetría
//!
//! Este módulo contiene los structs que mapean a las colecciones
//! `vehicles`, `positions` y `manual_overrides`. Las columnas siguen
//! el orden fijo del contrato de persistencia.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Vehículo reportado por el feed remoto.
///
/// `id` es el identificador del feed; `plate` es la clave humana que se
/// usa en el resto del sistema. La colección se refresca completa en cada
/// sync, nunca hay updates parciales.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Vehicle {
    pub id: String,
    pub plate: String,
}

/// Muestra de posición/odómetro emitida por el feed.
///
/// Inmutable una vez ingerida; la clave de unicidad es `packet_id`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct PositionSample {
    pub packet_id: String,
    pub vehicle_id: String,
    pub plate: String,
    pub timestamp: DateTime<Utc>,
    pub odometer: f64,
}

/// Odómetro ingresado manualmente para una placa.
///
/// Una fila por placa, last-write-wins; se crea en la primera entrada
/// manual y nunca se borra.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ManualOverride {
    pub plate: String,
    pub odometer: f64,
}
