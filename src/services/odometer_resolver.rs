//! Resolución del odómetro autoritativo por placa
//!
//! Combina la telemetría reconciliada con los overrides manuales. Un
//! override manual, si existe, SIEMPRE pisa el valor derivado de
//! telemetría para esa placa, sin importar cuál sea más reciente: es la
//! vía de entrada para vehículos sin hardware de telemetría. Placas sin
//! ninguna fuente resuelven a 0.

use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::models::{ManualOverride, PositionSample};
use crate::repositories::override_repository::OverrideRepository;
use crate::repositories::position_repository::PositionRepository;
use crate::utils::errors::AppError;

/// Fuente del valor resuelto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OdometerSource {
    Telemetry,
    Manual,
}

impl OdometerSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            OdometerSource::Telemetry => "telemetry",
            OdometerSource::Manual => "manual",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOdometer {
    pub odometer: f64,
    pub source: OdometerSource,
}

/// Cálculo puro del mapa placa -> odómetro vigente
pub fn resolve_odometers(
    positions: &[PositionSample],
    overrides: &[ManualOverride],
) -> BTreeMap<String, ResolvedOdometer> {
    let mut map = BTreeMap::new();

    for position in positions {
        map.insert(
            position.plate.clone(),
            ResolvedOdometer {
                odometer: position.odometer,
                source: OdometerSource::Telemetry,
            },
        );
    }

    // El override manual pisa la telemetría incondicionalmente
    for manual in overrides {
        map.insert(
            manual.plate.clone(),
            ResolvedOdometer {
                odometer: manual.odometer,
                source: OdometerSource::Manual,
            },
        );
    }

    map
}

pub struct OdometerResolver {
    position_repository: PositionRepository,
    override_repository: OverrideRepository,
}

impl OdometerResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            position_repository: PositionRepository::new(pool.clone()),
            override_repository: OverrideRepository::new(pool),
        }
    }

    /// Mapa completo placa -> odómetro vigente
    pub async fn resolve_all(&self) -> Result<BTreeMap<String, ResolvedOdometer>, AppError> {
        let positions = self.position_repository.find_all().await?;
        let overrides = self.override_repository.find_all().await?;
        Ok(resolve_odometers(&positions, &overrides))
    }

    /// Odómetro vigente de una placa; 0 si no hay ninguna fuente
    pub async fn resolve(&self, plate: &str) -> Result<f64, AppError> {
        let resolved = self.resolve_all().await?;
        Ok(resolved.get(plate).map(|r| r.odometer).unwrap_or(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn sample(plate: &str, odo: f64) -> PositionSample {
        PositionSample {
            packet_id: "1".to_string(),
            vehicle_id: plate.to_lowercase(),
            plate: plate.to_string(),
            timestamp: Utc.timestamp_opt(100, 0).unwrap(),
            odometer: odo,
        }
    }

    #[test]
    fn test_telemetry_only() {
        let resolved = resolve_odometers(&[sample("ABC1234", 150.0)], &[]);
        let entry = resolved.get("ABC1234").unwrap();
        assert_eq!(entry.odometer, 150.0);
        assert_eq!(entry.source, OdometerSource::Telemetry);
    }

    #[test]
    fn test_manual_override_always_wins() {
        let overrides = vec![ManualOverride {
            plate: "ABC1234".to_string(),
            odometer: 999.0,
        }];
        let resolved = resolve_odometers(&[sample("ABC1234", 150.0)], &overrides);
        let entry = resolved.get("ABC1234").unwrap();
        assert_eq!(entry.odometer, 999.0);
        assert_eq!(entry.source, OdometerSource::Manual);
    }

    #[test]
    fn test_manual_only_plate_is_included() {
        let overrides = vec![ManualOverride {
            plate: "MAN0001".to_string(),
            odometer: 42000.0,
        }];
        let resolved = resolve_odometers(&[], &overrides);
        assert_eq!(resolved.get("MAN0001").unwrap().odometer, 42000.0);
    }

    #[test]
    fn test_unknown_plate_resolves_to_zero() {
        let resolved = resolve_odometers(&[], &[]);
        assert_eq!(resolved.get("NOPE000").map(|r| r.odometer).unwrap_or(0.0), 0.0);
    }
}
