//! Rutas de la API

pub mod maintenance_routes;
pub mod odometer_routes;

pub use maintenance_routes::create_maintenance_router;
pub use odometer_routes::create_odometer_router;
