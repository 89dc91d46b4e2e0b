//! Pipeline de reconciliación de punta a punta, sin red ni base de datos:
//! feed stub -> paginación -> merge -> resolución de odómetros.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};

use fleet_maintenance::clients::telemetry_client::{FeedPosition, FeedVehicle, PositionFeed};
use fleet_maintenance::models::{ManualOverride, PositionSample};
use fleet_maintenance::services::odometer_resolver::{resolve_odometers, OdometerSource};
use fleet_maintenance::services::position_reconciler::{fetch_all_pages, reconcile};

struct StubFeed {
    vehicles: Vec<FeedVehicle>,
    pages: Vec<Vec<FeedPosition>>,
    position_calls: AtomicUsize,
}

impl StubFeed {
    fn new(vehicles: Vec<FeedVehicle>, pages: Vec<Vec<FeedPosition>>) -> Self {
        Self {
            vehicles,
            pages,
            position_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait::async_trait]
impl PositionFeed for StubFeed {
    async fn fetch_vehicles(&self) -> Vec<FeedVehicle> {
        self.vehicles.clone()
    }

    async fn fetch_position_page(&self, _quantity: u32) -> Vec<FeedPosition> {
        let call = self.position_calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(call).cloned().unwrap_or_default()
    }
}

fn vehicle(id: &str, plate: &str) -> FeedVehicle {
    FeedVehicle {
        vehicle_id: id.to_string(),
        plate: plate.to_string(),
    }
}

fn position(packet: &str, vehicle: &str, ts_secs: i64, odo: f64) -> FeedPosition {
    FeedPosition {
        packet_id: packet.to_string(),
        vehicle_id: vehicle.to_string(),
        timestamp: Utc.timestamp_opt(ts_secs, 0).unwrap(),
        odometer: odo,
    }
}

fn plate_map(feed: &StubFeed) -> HashMap<String, String> {
    feed.vehicles
        .iter()
        .map(|v| (v.vehicle_id.clone(), v.plate.clone()))
        .collect()
}

#[tokio::test]
async fn full_pass_collapses_to_one_sample_per_vehicle() {
    let feed = StubFeed::new(
        vec![vehicle("v1", "ABC1234"), vehicle("v2", "XYZ9876")],
        vec![vec![
            position("1", "v1", 10, 100.0),
            position("2", "v1", 20, 150.0),
            position("3", "v2", 15, 80000.0),
            position("2", "v1", 20, 150.0), // duplicado del feed
        ]],
    );

    let fetched = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
    assert_eq!(fetched.len(), 4);

    let latest = reconcile(fetched, Vec::new(), &plate_map(&feed));
    assert_eq!(latest.len(), 2);

    let v1 = latest.iter().find(|s| s.plate == "ABC1234").unwrap();
    assert_eq!(v1.odometer, 150.0);
    assert_eq!(v1.packet_id, "2");
}

#[tokio::test]
async fn pagination_issues_exactly_three_requests_for_short_tail() {
    let page = |count: usize, offset: usize| -> Vec<FeedPosition> {
        (0..count)
            .map(|i| position(&format!("{}", offset + i), "v1", (offset + i) as i64, 1.0))
            .collect()
    };
    let feed = StubFeed::new(
        vec![vehicle("v1", "ABC1234")],
        vec![page(1000, 0), page(1000, 1000), page(400, 2000)],
    );

    let fetched = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
    assert_eq!(fetched.len(), 2400);
    assert_eq!(feed.position_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn rerunning_the_same_batch_yields_identical_resolution() {
    let feed = StubFeed::new(
        vec![vehicle("v1", "ABC1234")],
        vec![vec![
            position("1", "v1", 10, 100.0),
            position("2", "v1", 20, 150.0),
        ]],
    );
    let map = plate_map(&feed);

    let batch = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;

    // Primera pasada sobre store vacío; segunda pasada del mismo lote
    // sobre lo que la primera persistió
    let first: Vec<PositionSample> = reconcile(batch.clone(), Vec::new(), &map);
    let second = reconcile(batch, first.clone(), &map);
    assert_eq!(first, second);

    let resolved_first = resolve_odometers(&first, &[]);
    let resolved_second = resolve_odometers(&second, &[]);
    assert_eq!(resolved_first, resolved_second);
}

#[tokio::test]
async fn manual_override_supersedes_fresher_telemetry() {
    let feed = StubFeed::new(
        vec![vehicle("v1", "ABC1234")],
        vec![vec![
            position("1", "v1", 10, 100.0),
            position("2", "v1", 20, 150.0),
        ]],
    );
    let map = plate_map(&feed);

    let batch = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
    let latest = reconcile(batch, Vec::new(), &map);

    // Telemetría resuelve a 150...
    let resolved = resolve_odometers(&latest, &[]);
    assert_eq!(resolved.get("ABC1234").unwrap().odometer, 150.0);

    // ...pero el override manual pisa sin importar frescura
    let overrides = vec![ManualOverride {
        plate: "ABC1234".to_string(),
        odometer: 999.0,
    }];
    let resolved = resolve_odometers(&latest, &overrides);
    let entry = resolved.get("ABC1234").unwrap();
    assert_eq!(entry.odometer, 999.0);
    assert_eq!(entry.source, OdometerSource::Manual);
}

#[tokio::test]
async fn dead_feed_degrades_to_empty_batch() {
    // Un feed que solo devuelve páginas vacías (caído o sin datos) corta
    // la paginación en el primer request y no aporta muestras
    let feed = StubFeed::new(Vec::new(), Vec::new());
    let fetched = fetch_all_pages(&feed, 1000, 5, Duration::ZERO).await;
    assert!(fetched.is_empty());
    assert_eq!(feed.position_calls.load(Ordering::SeqCst), 1);
}
