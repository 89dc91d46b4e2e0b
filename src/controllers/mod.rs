//! Controllers de la API
//!
//! Orquestan validación, servicios y repositorios para cada recurso.

pub mod maintenance_controller;
pub mod odometer_controller;

pub use maintenance_controller::MaintenanceController;
pub use odometer_controller::OdometerController;
