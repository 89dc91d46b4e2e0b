//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.
//! Las credenciales del feed de telemetría y del store llegan exclusivamente
//! por variables de entorno; no hay credenciales hardcodeadas en el código.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    // Feed de telemetría (solo el sync job los exige)
    pub feed_url: Option<String>,
    pub feed_user: Option<String>,
    pub feed_pass: Option<String>,
    pub feed_page_size: u32,
    pub feed_max_pages: u32,
    pub feed_page_pause_ms: u64,
    // Motor de mantenimiento
    pub due_soon_threshold_km: f64,
    pub default_reminder_interval_km: f64,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            feed_url: env::var("TELEMETRY_FEED_URL").ok(),
            feed_user: env::var("TELEMETRY_FEED_USER").ok(),
            feed_pass: env::var("TELEMETRY_FEED_PASS").ok(),
            feed_page_size: env::var("FEED_PAGE_SIZE")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("FEED_PAGE_SIZE must be a valid number"),
            feed_max_pages: env::var("FEED_MAX_PAGES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("FEED_MAX_PAGES must be a valid number"),
            feed_page_pause_ms: env::var("FEED_PAGE_PAUSE_MS")
                .unwrap_or_else(|_| "1000".to_string())
                .parse()
                .expect("FEED_PAGE_PAUSE_MS must be a valid number"),
            // Se han observado flotas operando con 1000 y con 3000 km:
            // es un parámetro, no una constante del motor.
            due_soon_threshold_km: env::var("DUE_SOON_THRESHOLD_KM")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("DUE_SOON_THRESHOLD_KM must be a valid number"),
            default_reminder_interval_km: env::var("DEFAULT_REMINDER_INTERVAL_KM")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()
                .expect("DEFAULT_REMINDER_INTERVAL_KM must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
