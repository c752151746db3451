use pharmacy_core::{DashboardOverview, DashboardStats, InventoryAlert, Order, TriageConfig};

fn orders() -> Vec<Order> {
    serde_json::from_value(serde_json::json!([
        { "id": "ORD-001", "patientName": "John Smith", "medications": [], "status": "processing",
          "priority": "sos", "createdAt": "2024-01-15T10:30:00Z", "updatedAt": "2024-01-15T10:45:00Z" },
        { "id": "ORD-002", "patientName": "Mary Johnson", "medications": [], "status": "ready",
          "priority": "routine", "createdAt": "2024-01-15T09:15:00Z", "updatedAt": "2024-01-15T10:30:00Z" },
        { "id": "ORD-003", "patientName": "Robert Davis", "medications": [], "status": "pending",
          "priority": "urgent", "createdAt": "2024-01-15T11:00:00Z", "updatedAt": "2024-01-15T11:00:00Z" },
        { "id": "ORD-004", "patientName": "Li Wei", "medications": [], "status": "pending",
          "priority": "sos", "createdAt": "2024-01-15T11:05:00Z", "updatedAt": "2024-01-15T11:05:00Z" }
    ]))
    .unwrap()
}

fn alerts() -> Vec<InventoryAlert> {
    serde_json::from_value(serde_json::json!([
        { "id": "ALERT-001", "medicationId": "2", "medicationName": "Lisinopril 10mg", "type": "low_stock",
          "message": "Stock level below minimum threshold (25/30)", "severity": "warning",
          "createdAt": "2024-01-15T08:00:00Z" },
        { "id": "ALERT-002", "medicationId": "4", "medicationName": "Ibuprofen 400mg", "type": "low_stock",
          "message": "Critical stock level (8/25) - immediate reorder required", "severity": "critical",
          "createdAt": "2024-01-15T09:30:00Z" }
    ]))
    .unwrap()
}

#[test]
fn overview_takes_recent_orders_in_fetch_order() {
    let orders = orders();
    let alerts = alerts();
    let stats = DashboardStats {
        total_medications: 247,
        sos_orders: 2,
        ..DashboardStats::default()
    };

    let overview = DashboardOverview::build(Some(&stats), &orders, &alerts, &TriageConfig::default());

    let ids: Vec<&str> = overview.recent_orders.iter().map(|o| o.id.as_str()).collect();
    assert_eq!(ids, ["ORD-001", "ORD-002", "ORD-003"]);
    assert_eq!(overview.sos_in_recent, 1);
    assert_eq!(overview.critical_alerts.len(), 1);
    assert_eq!(overview.critical_banner().as_deref(), Some("1 critical issue detected"));
    assert!(overview.stats_available);
    assert_eq!(overview.stats.total_medications, 247);
}

#[test]
fn missing_stats_fall_back_to_zero() {
    let overview = DashboardOverview::build(None, &[], &[], &TriageConfig::default());
    assert!(!overview.stats_available);
    assert_eq!(overview.stats, DashboardStats::default());
    assert!(overview.recent_orders.is_empty());
    assert_eq!(overview.critical_banner(), None);
}
