use std::fs;

use pharmacy_api::{parse_snapshot_str, parse_snapshot_value};
use pharmacy_core::{
    triage_alerts, triage_orders, AlertFilter, OrderFilter, PharmacyError, SeverityStats,
};

fn fixture_path(name: &str) -> String {
    format!("{}/tests/data/{name}", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn portal_snapshot_fixture_parses_and_triages() {
    let raw = fs::read_to_string(fixture_path("portal_snapshot.json"))
        .expect("Không đọc được snapshot mẫu");
    let snapshot = parse_snapshot_str(&raw).expect("Không parse được snapshot");

    assert_eq!(snapshot.stats.as_ref().map(|s| s.total_medications), Some(247));
    assert_eq!(snapshot.medications.len(), 5);

    let orders: Vec<&str> = triage_orders(&snapshot.orders, &OrderFilter::default())
        .into_iter()
        .map(|order| order.id.as_str())
        .collect();
    assert_eq!(orders, ["ORD-001", "ORD-003", "ORD-002"]);

    let alerts: Vec<&str> = triage_alerts(&snapshot.alerts, &AlertFilter::default())
        .into_iter()
        .map(|alert| alert.id.as_str())
        .collect();
    assert_eq!(alerts, ["ALERT-002", "ALERT-001", "ALERT-003"]);

    assert_eq!(
        SeverityStats::from_alerts(&snapshot.alerts),
        SeverityStats {
            critical: 1,
            warning: 2,
            info: 0
        }
    );
}

#[test]
fn snapshot_survives_serialize_cycle() {
    let raw = fs::read_to_string(fixture_path("portal_snapshot.json"))
        .expect("Không đọc được snapshot mẫu");
    let snapshot = parse_snapshot_str(&raw).expect("Không parse được snapshot");

    let value = serde_json::to_value(&snapshot).expect("Không serialize snapshot");
    assert_eq!(value["orders"][0]["patientName"], "John Smith");
    assert_eq!(value["alerts"][0]["type"], "low_stock");
    assert_eq!(parse_snapshot_value(&value).expect("snapshot"), snapshot);
}

#[test]
fn missing_collections_default_to_empty() {
    let snapshot = parse_snapshot_str(r#"{ "orders": [] }"#).expect("snapshot rỗng");
    assert!(snapshot.stats.is_none());
    assert!(snapshot.medications.is_empty());
    assert!(snapshot.alerts.is_empty());
}

#[test]
fn non_object_snapshot_is_rejected() {
    assert!(matches!(
        parse_snapshot_str("[]"),
        Err(PharmacyError::MissingData)
    ));
    assert!(matches!(
        parse_snapshot_str("{ not json"),
        Err(PharmacyError::Parse(_))
    ));
}
