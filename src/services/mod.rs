//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación: el motor de
//! reconciliación de telemetría y el scheduler de mantenimiento.

pub mod maintenance_scheduler;
pub mod odometer_resolver;
pub mod position_reconciler;
pub mod sync_service;

pub use maintenance_scheduler::MaintenanceScheduler;
pub use odometer_resolver::OdometerResolver;
pub use sync_service::{SyncReport, SyncService};
