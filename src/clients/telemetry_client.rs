//! Cliente HTTP del feed de telemetría
//!
//! El feed expone dos operaciones de listado ("vehicles" y "positions"),
//! ambas con un parámetro `quantity` acotado y credenciales en cada
//! llamada. La respuesta es una lista plana de registros campo/valor.
//!
//! Política de fallos (deliberada): error de transporte, status no exitoso
//! o payload malformado degradan a lista vacía. El caller no distingue
//! "no hay más datos" de "error transitorio" salvo observando una página
//! vacía, que es también la condición de corte de la paginación. Un
//! registro sin campos requeridos se descarta individualmente; un registro
//! malo nunca descarta la página.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{json, Value};

/// Registro de vehículo tal como lo emite el feed
#[derive(Debug, Clone, PartialEq)]
pub struct FeedVehicle {
    pub vehicle_id: String,
    pub plate: String,
}

/// Muestra de posición cruda del feed (aún sin placa asociada)
#[derive(Debug, Clone, PartialEq)]
pub struct FeedPosition {
    pub packet_id: String,
    pub vehicle_id: String,
    pub timestamp: DateTime<Utc>,
    pub odometer: f64,
}

/// Seam del feed de posiciones: permite paginar contra un stub en tests
#[async_trait]
pub trait PositionFeed: Send + Sync {
    async fn fetch_vehicles(&self) -> Vec<FeedVehicle>;
    async fn fetch_position_page(&self, quantity: u32) -> Vec<FeedPosition>;
}

pub struct TelemetryClient {
    base_url: String,
    username: String,
    password: String,
    client: reqwest::Client,
}

impl TelemetryClient {
    pub fn new(base_url: String, username: String, password: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url,
            username,
            password,
            client,
        }
    }

    /// Un round trip contra una operación de listado del feed.
    /// Devuelve None ante cualquier fallo; el caller lo trata como página vacía.
    async fn post_listing(&self, operation: &str, quantity: u32) -> Option<Vec<Value>> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), operation);
        let body = json!({
            "username": self.username,
            "password": self.password,
            "quantity": quantity,
        });

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(r) => r,
            Err(e) => {
                log::warn!("⚠️ Error de conexión con el feed ({}): {}", operation, e);
                return None;
            }
        };

        let status = response.status();
        if !status.is_success() {
            log::warn!("⚠️ Feed respondió {} para {}", status, operation);
            return None;
        }

        match response.json::<Value>().await {
            Ok(Value::Array(items)) => Some(items),
            Ok(_) => {
                log::warn!("⚠️ Payload inesperado del feed para {}", operation);
                None
            }
            Err(e) => {
                log::warn!("⚠️ Payload malformado del feed para {}: {}", operation, e);
                None
            }
        }
    }
}

#[async_trait]
impl PositionFeed for TelemetryClient {
    async fn fetch_vehicles(&self) -> Vec<FeedVehicle> {
        let items = match self.post_listing("vehicles", 1000).await {
            Some(items) => items,
            None => return Vec::new(),
        };

        let vehicles: Vec<FeedVehicle> = items.iter().filter_map(parse_vehicle_record).collect();
        log::info!("📡 Feed: {} vehículos recibidos", vehicles.len());
        vehicles
    }

    async fn fetch_position_page(&self, quantity: u32) -> Vec<FeedPosition> {
        let items = match self.post_listing("positions", quantity).await {
            Some(items) => items,
            None => return Vec::new(),
        };

        let total = items.len();
        let positions: Vec<FeedPosition> = items.iter().filter_map(parse_position_record).collect();
        if positions.len() < total {
            log::warn!(
                "⚠️ Feed: {} registros descartados por campos faltantes",
                total - positions.len()
            );
        }
        positions
    }
}

/// Campo como string, aceptando también valores numéricos
fn field_str(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn field_f64(record: &Value, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Timestamp del feed: RFC 3339 o datetime naive (se asume UTC)
fn parse_feed_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    // Algunos feeds emiten fracción de segundo sin zona
    let clean = raw.split('.').next().unwrap_or(raw);
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(clean, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    None
}

/// Un registro de vehículo requiere id y placa; si falta alguno se descarta
pub fn parse_vehicle_record(record: &Value) -> Option<FeedVehicle> {
    Some(FeedVehicle {
        vehicle_id: field_str(record, "vehicleId")?,
        plate: field_str(record, "plate")?,
    })
}

/// Un registro de posición requiere packet id, vehicle id y timestamp
/// parseable; el odómetro ausente se toma como 0
pub fn parse_position_record(record: &Value) -> Option<FeedPosition> {
    let packet_id = field_str(record, "packetId")?;
    let vehicle_id = field_str(record, "vehicleId")?;
    let timestamp = parse_feed_timestamp(&field_str(record, "recordedAt")?)?;
    let odometer = field_f64(record, "odometer").unwrap_or(0.0);

    Some(FeedPosition {
        packet_id,
        vehicle_id,
        timestamp,
        odometer,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_vehicle_record_ok() {
        let record = json!({ "vehicleId": 4811, "plate": "ABC1D23" });
        let vehicle = parse_vehicle_record(&record).unwrap();
        assert_eq!(vehicle.vehicle_id, "4811");
        assert_eq!(vehicle.plate, "ABC1D23");
    }

    #[test]
    fn test_parse_vehicle_record_missing_plate() {
        let record = json!({ "vehicleId": "4811" });
        assert!(parse_vehicle_record(&record).is_none());
    }

    #[test]
    fn test_parse_position_record_ok() {
        let record = json!({
            "packetId": "99001",
            "vehicleId": "4811",
            "recordedAt": "2026-08-29T14:30:00",
            "odometer": 154230.5
        });
        let pos = parse_position_record(&record).unwrap();
        assert_eq!(pos.packet_id, "99001");
        assert_eq!(pos.odometer, 154230.5);
        assert_eq!(pos.timestamp.to_rfc3339(), "2026-08-29T14:30:00+00:00");
    }

    #[test]
    fn test_parse_position_record_fractional_seconds() {
        let record = json!({
            "packetId": "99002",
            "vehicleId": "4811",
            "recordedAt": "2026-08-29T14:30:00.123",
            "odometer": "154231"
        });
        let pos = parse_position_record(&record).unwrap();
        assert_eq!(pos.odometer, 154231.0);
    }

    #[test]
    fn test_parse_position_record_missing_packet_is_dropped() {
        let record = json!({
            "vehicleId": "4811",
            "recordedAt": "2026-08-29T14:30:00",
            "odometer": 1.0
        });
        assert!(parse_position_record(&record).is_none());
    }

    #[test]
    fn test_parse_position_record_defaults_odometer() {
        let record = json!({
            "packetId": "99003",
            "vehicleId": "4811",
            "recordedAt": "2026-08-29 14:30:00"
        });
        let pos = parse_position_record(&record).unwrap();
        assert_eq!(pos.odometer, 0.0);
    }
}
