//! Reconciliación de posiciones
//!
//! Colapsa las páginas descargadas del feed (más el set ya persistido) en
//! exactamente una muestra vigente por vehículo. La reconciliación es
//! idempotente por muestra: re-correr el sync sobre el mismo lote produce
//! el mismo resultado, por lo que un sync interrumpido es seguro de repetir.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::clients::telemetry_client::{FeedPosition, PositionFeed};
use crate::models::PositionSample;

/// Placa asignada cuando el feed reporta un vehículo que no está en la
/// colección de vehículos
pub const UNKNOWN_PLATE: &str = "unknown";

/// Descarga de la cola de posiciones, acotada por `max_pages`.
///
/// Cortes: página vacía (cola agotada o error transitorio, indistinguibles
/// por contrato del cliente), página corta (feed exhausto) o el tope de
/// páginas (garantiza terminación contra un feed que nunca devuelve una
/// página corta). Entre requests se intercala una pausa para respetar el
/// rate limit del feed.
pub async fn fetch_all_pages(
    feed: &dyn PositionFeed,
    page_size: u32,
    max_pages: u32,
    pause: Duration,
) -> Vec<FeedPosition> {
    let mut accumulated = Vec::new();

    for page_number in 1..=max_pages {
        log::info!("⏳ Descargando página {} de posiciones...", page_number);
        let page = feed.fetch_position_page(page_size).await;

        if page.is_empty() {
            break;
        }

        let short_page = (page.len() as u32) < page_size;
        accumulated.extend(page);

        if short_page {
            break;
        }
        if page_number < max_pages {
            tokio::time::sleep(pause).await;
        }
    }

    accumulated
}

/// Merge puro: lote descargado + set persistido -> una muestra por vehículo.
///
/// 1. Dedup por `packet_id` (el primero visto gana; los duplicados se
///    ignoran).
/// 2. Por `vehicle_id` sobrevive la muestra de timestamp más reciente;
///    empate resuelto por `packet_id` más alto (proxy de "recibido después").
pub fn reconcile(
    fetched: Vec<FeedPosition>,
    persisted: Vec<PositionSample>,
    plate_by_vehicle: &HashMap<String, String>,
) -> Vec<PositionSample> {
    let mut seen_packets: HashSet<String> = HashSet::new();
    let mut latest: HashMap<String, PositionSample> = HashMap::new();

    // El set persistido primero: un packet ya ingerido ignora su duplicado
    let persisted_samples = persisted.into_iter().map(|mut sample| {
        // La placa puede haberse conocido después de persistir la muestra
        if let Some(plate) = plate_by_vehicle.get(&sample.vehicle_id) {
            sample.plate = plate.clone();
        }
        sample
    });

    let fetched_samples = fetched.into_iter().map(|position| {
        let plate = plate_by_vehicle
            .get(&position.vehicle_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_PLATE.to_string());
        PositionSample {
            packet_id: position.packet_id,
            vehicle_id: position.vehicle_id,
            plate,
            timestamp: position.timestamp,
            odometer: position.odometer,
        }
    });

    for sample in persisted_samples.chain(fetched_samples) {
        if !seen_packets.insert(sample.packet_id.clone()) {
            continue;
        }

        let replaces = match latest.get(&sample.vehicle_id) {
            Some(current) => is_newer(&sample, current),
            None => true,
        };
        if replaces {
            latest.insert(sample.vehicle_id.clone(), sample);
        }
    }

    let mut result: Vec<PositionSample> = latest.into_values().collect();
    result.sort_by(|a, b| a.plate.cmp(&b.plate).then_with(|| a.vehicle_id.cmp(&b.vehicle_id)));
    result
}

/// ¿`candidate` reemplaza a `current` como muestra vigente del vehículo?
fn is_newer(candidate: &PositionSample, current: &PositionSample) -> bool {
    if candidate.timestamp != current.timestamp {
        return candidate.timestamp > current.timestamp;
    }
    packet_id_greater(&candidate.packet_id, &current.packet_id)
}

/// Comparación de packet ids: numérica cuando ambos parsean, lexical si no
fn packet_id_greater(a: &str, b: &str) -> bool {
    match (a.parse::<u64>(), b.parse::<u64>()) {
        (Ok(a_num), Ok(b_num)) => a_num > b_num,
        _ => a > b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn feed_position(packet: &str, vehicle: &str, ts_secs: i64, odo: f64) -> FeedPosition {
        FeedPosition {
            packet_id: packet.to_string(),
            vehicle_id: vehicle.to_string(),
            timestamp: Utc.timestamp_opt(ts_secs, 0).unwrap(),
            odometer: odo,
        }
    }

    fn plates(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(id, plate)| (id.to_string(), plate.to_string()))
            .collect()
    }

    #[test]
    fn test_dedup_by_packet_id() {
        let map = plates(&[("v1", "ABC1234")]);
        let fetched = vec![
            feed_position("100", "v1", 10, 100.0),
            feed_position("100", "v1", 10, 100.0),
        ];
        let result = reconcile(fetched, Vec::new(), &map);
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_latest_timestamp_wins() {
        let map = plates(&[("v1", "ABC1234")]);
        let fetched = vec![
            feed_position("100", "v1", 10, 100.0),
            feed_position("101", "v1", 20, 150.0),
        ];
        let result = reconcile(fetched, Vec::new(), &map);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].odometer, 150.0);
    }

    #[test]
    fn test_timestamp_tie_resolved_by_higher_packet_id() {
        let map = plates(&[("v1", "ABC1234")]);
        // "9" < "100" lexicalmente pero 9 < 100 numéricamente
        let fetched = vec![
            feed_position("100", "v1", 10, 150.0),
            feed_position("9", "v1", 10, 100.0),
        ];
        let result = reconcile(fetched, Vec::new(), &map);
        assert_eq!(result[0].packet_id, "100");
        assert_eq!(result[0].odometer, 150.0);
    }

    #[test]
    fn test_one_sample_per_vehicle() {
        let map = plates(&[("v1", "ABC1234"), ("v2", "XYZ9876")]);
        let fetched = vec![
            feed_position("1", "v1", 10, 100.0),
            feed_position("2", "v2", 10, 200.0),
            feed_position("3", "v1", 20, 130.0),
        ];
        let result = reconcile(fetched, Vec::new(), &map);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_persisted_packet_ignores_duplicate() {
        let map = plates(&[("v1", "ABC1234")]);
        let persisted = vec![PositionSample {
            packet_id: "100".to_string(),
            vehicle_id: "v1".to_string(),
            plate: "ABC1234".to_string(),
            timestamp: Utc.timestamp_opt(10, 0).unwrap(),
            odometer: 100.0,
        }];
        let fetched = vec![feed_position("100", "v1", 10, 999.0)];
        let result = reconcile(fetched, persisted, &map);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].odometer, 100.0);
    }

    #[test]
    fn test_unknown_vehicle_gets_placeholder_plate() {
        let map = plates(&[]);
        let fetched = vec![feed_position("1", "v9", 10, 50.0)];
        let result = reconcile(fetched, Vec::new(), &map);
        assert_eq!(result[0].plate, UNKNOWN_PLATE);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let map = plates(&[("v1", "ABC1234"), ("v2", "XYZ9876")]);
        let fetched = vec![
            feed_position("1", "v1", 10, 100.0),
            feed_position("2", "v1", 20, 150.0),
            feed_position("3", "v2", 5, 300.0),
        ];

        let first = reconcile(fetched.clone(), Vec::new(), &map);
        let second = reconcile(fetched, first.clone(), &map);
        assert_eq!(first, second);
    }

    /// Feed de prueba que sirve páginas prearmadas y cuenta los requests
    struct StubFeed {
        pages: Vec<Vec<FeedPosition>>,
        calls: AtomicUsize,
    }

    impl StubFeed {
        fn new(pages: Vec<Vec<FeedPosition>>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait::async_trait]
    impl PositionFeed for StubFeed {
        async fn fetch_vehicles(&self) -> Vec<crate::clients::telemetry_client::FeedVehicle> {
            Vec::new()
        }

        async fn fetch_position_page(&self, _quantity: u32) -> Vec<FeedPosition> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            self.pages.get(call).cloned().unwrap_or_default()
        }
    }

    fn page_of(count: usize, offset: usize) -> Vec<FeedPosition> {
        (0..count)
            .map(|i| feed_position(&format!("{}", offset + i), "v1", (offset + i) as i64, 1.0))
            .collect()
    }

    #[tokio::test]
    async fn test_pagination_stops_on_short_page() {
        // 1000, 1000, 400 -> exactamente 3 requests y 2400 muestras
        let feed = StubFeed::new(vec![page_of(1000, 0), page_of(1000, 1000), page_of(400, 2000)]);
        let samples = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
        assert_eq!(samples.len(), 2400);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_pagination_stops_on_empty_page() {
        let feed = StubFeed::new(vec![page_of(1000, 0), Vec::new()]);
        let samples = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
        assert_eq!(samples.len(), 1000);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_pagination_bounded_by_max_pages() {
        // El feed nunca reporta página corta: el tope garantiza terminación
        let pages = (0..10).map(|i| page_of(1000, i * 1000)).collect();
        let feed = StubFeed::new(pages);
        let samples = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
        assert_eq!(samples.len(), 5000);
        assert_eq!(feed.calls.load(Ordering::SeqCst), 5);
    }
}
