//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod maintenance;
pub mod service_type;
pub mod vehicle;

pub use maintenance::{DueStatus, MaintenanceDraft, MaintenanceRecord, MaintenanceStatus};
pub use service_type::ServiceType;
pub use vehicle::{ManualOverride, PositionSample, Vehicle};
