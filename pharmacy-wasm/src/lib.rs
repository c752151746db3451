//! Bridge WASM <-> JavaScript trung lập framework cho logic triage nhà thuốc.

use chrono::Utc;
use pharmacy_core::{
    AlertFilter, DashboardOverview, DashboardStats, InventoryAlert, InventoryFilter, Medication,
    Order, OrderDraft, OrderFilter, SeverityStats, TriageConfig,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, Serializer};
use wasm_bindgen::prelude::*;

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct JsTriageConfig {
    #[serde(default)]
    expiring_soon_days: Option<u32>,
    #[serde(default)]
    recent_orders_limit: Option<usize>,
}

impl From<JsTriageConfig> for TriageConfig {
    fn from(cfg: JsTriageConfig) -> Self {
        let mut base = TriageConfig::default();
        if let Some(days) = cfg.expiring_soon_days {
            base.expiring_soon_days = days;
        }
        if let Some(limit) = cfg.recent_orders_limit {
            base.recent_orders_limit = limit;
        }
        base
    }
}

/// Lọc và sắp cảnh báo. `alerts` là `null`/`undefined` thì coi như danh sách rỗng.
#[wasm_bindgen]
pub fn triage_alerts(alerts: JsValue, filter: Option<JsValue>) -> Result<JsValue, JsValue> {
    init();
    let alerts: Vec<InventoryAlert> = read_collection(alerts, "alerts")?;
    let filter: AlertFilter = read_optional(filter, "bộ lọc cảnh báo")?;
    write(&pharmacy_core::triage_alerts(&alerts, &filter))
}

#[wasm_bindgen]
pub fn triage_orders(orders: JsValue, filter: Option<JsValue>) -> Result<JsValue, JsValue> {
    init();
    let orders: Vec<Order> = read_collection(orders, "orders")?;
    let filter: OrderFilter = read_optional(filter, "bộ lọc đơn")?;
    write(&pharmacy_core::triage_orders(&orders, &filter))
}

#[wasm_bindgen]
pub fn filter_inventory(medications: JsValue, filter: Option<JsValue>) -> Result<JsValue, JsValue> {
    init();
    let medications: Vec<Medication> = read_collection(medications, "medications")?;
    let filter: InventoryFilter = read_optional(filter, "bộ lọc kho")?;
    write(&pharmacy_core::filter_inventory(&medications, &filter))
}

#[wasm_bindgen]
pub fn severity_stats(alerts: JsValue) -> Result<JsValue, JsValue> {
    init();
    let alerts: Vec<InventoryAlert> = read_collection(alerts, "alerts")?;
    write(&SeverityStats::from_alerts(&alerts))
}

/// Kiểm tra form đơn thuốc. Trả về thân request POST /orders, hoặc ném thông báo lỗi.
#[wasm_bindgen]
pub fn validate_order(draft: JsValue, catalog: JsValue) -> Result<JsValue, JsValue> {
    init();
    let draft: OrderDraft = from_value(draft)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được form đơn: {err}")))?;
    let catalog: Vec<Medication> = read_collection(catalog, "catalog")?;
    let order = draft
        .prepare(&catalog)
        .map_err(|err| JsValue::from_str(&err.to_string()))?;
    write(&order)
}

/// Dựng dữ liệu màn hình tổng quan từ snapshot JSON (chuỗi hoặc object).
#[wasm_bindgen]
pub fn dashboard_overview(snapshot: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    init();
    let value = match snapshot.as_string() {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON snapshot: {err}")))?,
        None => from_value::<serde_json::Value>(snapshot)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được snapshot: {err}")))?,
    };
    let snapshot = pharmacy_api::parse_snapshot_value(&value)
        .map_err(|err| JsValue::from_str(&format!("Snapshot error: {err}")))?;

    let cfg: JsTriageConfig = read_optional(config, "config")?;
    let cfg = TriageConfig::from(cfg);
    let overview = DashboardOverview::build(
        snapshot.stats.as_ref(),
        &snapshot.orders,
        &snapshot.alerts,
        &cfg,
    );

    write(&OverviewView::new(&overview, &snapshot.medications, &cfg))
}

/// Dạng gửi sang JS: thêm nhãn tóm tắt và danh sách thuốc sắp hết hạn.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OverviewView<'a> {
    stats: &'a DashboardStats,
    stats_available: bool,
    recent_orders: &'a [&'a Order],
    sos_in_recent: usize,
    critical_alerts: &'a [&'a InventoryAlert],
    critical_banner: Option<String>,
    expiring_soon: Vec<&'a str>,
}

impl<'a> OverviewView<'a> {
    fn new(
        overview: &'a DashboardOverview<'a>,
        medications: &'a [Medication],
        cfg: &TriageConfig,
    ) -> Self {
        let today = Utc::now().date_naive();
        Self {
            stats: &overview.stats,
            stats_available: overview.stats_available,
            recent_orders: &overview.recent_orders,
            sos_in_recent: overview.sos_in_recent,
            critical_alerts: &overview.critical_alerts,
            critical_banner: overview.critical_banner(),
            expiring_soon: medications
                .iter()
                .filter(|med| med.is_expiring_soon(today, cfg.expiring_soon_days))
                .map(|med| med.id.as_str())
                .collect(),
        }
    }
}

fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn read_collection<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<Vec<T>, JsValue> {
    from_value::<Option<Vec<T>>>(value)
        .map(Option::unwrap_or_default)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được {what}: {err}")))
}

fn read_optional<T: DeserializeOwned + Default>(
    value: Option<JsValue>,
    what: &str,
) -> Result<T, JsValue> {
    match value {
        Some(js) if !js.is_undefined() && !js.is_null() => from_value(js)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được {what}: {err}"))),
        _ => Ok(T::default()),
    }
}

/// Kết quả luôn là object thường phía JS, kể cả khi một kiểu đi qua `serialize_map`.
fn write<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    let serializer = Serializer::new().serialize_maps_as_objects(true);
    value
        .serialize(&serializer)
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use serde_test::{assert_ser_tokens, Token};

    fn catalog() -> Vec<Medication> {
        serde_json::from_value(json!([{
            "id": "1",
            "name": "Amoxicillin 500mg",
            "category": "Antibiotics",
            "stockQuantity": 150,
            "minStockLevel": 50,
            "unit": "capsules",
            "price": 0.25,
            "expiryDate": "2025-06-15",
            "batchNumber": "AMX-2024-001",
            "supplier": "PharmaCorp Ltd"
        }]))
        .unwrap()
    }

    #[test]
    fn partial_js_config_overlays_defaults() {
        let cfg: JsTriageConfig = serde_json::from_str(r#"{ "recentOrdersLimit": 5 }"#).unwrap();
        let cfg = TriageConfig::from(cfg);
        assert_eq!(cfg.recent_orders_limit, 5);
        assert_eq!(cfg.expiring_soon_days, TriageConfig::default().expiring_soon_days);
    }

    #[test]
    fn overview_serializes_as_plain_struct() {
        let cfg = TriageConfig::default();
        let overview = DashboardOverview::build(None, &[], &[], &cfg);
        let view = OverviewView::new(&overview, &[], &cfg);

        assert_ser_tokens(
            &view,
            &[
                Token::Struct { name: "OverviewView", len: 7 },
                Token::Str("stats"),
                Token::Struct { name: "DashboardStats", len: 6 },
                Token::Str("totalMedications"),
                Token::U32(0),
                Token::Str("lowStockItems"),
                Token::U32(0),
                Token::Str("pendingOrders"),
                Token::U32(0),
                Token::Str("sosOrders"),
                Token::U32(0),
                Token::Str("completedToday"),
                Token::U32(0),
                Token::Str("revenue"),
                Token::F64(0.0),
                Token::StructEnd,
                Token::Str("statsAvailable"),
                Token::Bool(false),
                Token::Str("recentOrders"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::Str("sosInRecent"),
                Token::U64(0),
                Token::Str("criticalAlerts"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::Str("criticalBanner"),
                Token::None,
                Token::Str("expiringSoon"),
                Token::Seq { len: Some(0) },
                Token::SeqEnd,
                Token::StructEnd,
            ],
        );
    }

    #[test]
    fn overview_exposes_banner_and_recent_orders() {
        let snapshot = pharmacy_api::parse_snapshot_value(&json!({
            "orders": [{
                "id": "ORD-001",
                "patientName": "John Smith",
                "medications": [],
                "status": "pending",
                "priority": "sos",
                "createdAt": "2024-01-15T10:30:00Z",
                "updatedAt": "2024-01-15T10:30:00Z"
            }],
            "alerts": [{
                "id": "ALERT-001",
                "medicationId": "3",
                "medicationName": "Insulin Glargine",
                "type": "low_stock",
                "message": "Insulin Glargine is running low",
                "severity": "critical",
                "createdAt": "2024-01-15T08:00:00Z"
            }]
        }))
        .unwrap();
        let cfg = TriageConfig::default();
        let overview = DashboardOverview::build(None, &snapshot.orders, &snapshot.alerts, &cfg);
        let value = serde_json::to_value(OverviewView::new(&overview, &[], &cfg)).unwrap();

        assert_eq!(value["criticalBanner"], json!("1 critical issue detected"));
        assert_eq!(value["sosInRecent"], json!(1));
        assert_eq!(value["recentOrders"][0]["id"], json!("ORD-001"));
        assert_eq!(value["criticalAlerts"][0]["id"], json!("ALERT-001"));
        assert_eq!(value["statsAvailable"], json!(false));
    }

    #[test]
    fn order_form_uses_camel_case_in_and_out() {
        let draft: OrderDraft = serde_json::from_value(json!({
            "patientName": "  Jane Doe ",
            "patientId": "PAT-009",
            "priority": "urgent",
            "lines": [{
                "medicationId": "1",
                "medicationName": "Amoxicillin 500mg",
                "quantity": 20,
                "unit": "capsules",
                "dosage": "1 capsule",
                "instructions": ""
            }]
        }))
        .unwrap();

        let order = draft.prepare(&catalog()).unwrap();
        let body = serde_json::to_value(&order).unwrap();
        assert_eq!(body["patientName"], json!("Jane Doe"));
        assert_eq!(body["patientId"], json!("PAT-009"));
        assert_eq!(body["medications"][0]["medicationId"], json!("1"));
        assert_eq!(body["medications"][0]["dosage"], json!("1 capsule"));
        assert!(body["medications"][0].get("instructions").is_none());
    }

    #[test]
    fn order_form_rejects_short_stock() {
        let draft: OrderDraft = serde_json::from_value(json!({
            "patientName": "Jane Doe",
            "lines": [{
                "medicationId": "1",
                "medicationName": "Amoxicillin 500mg",
                "quantity": 200,
                "unit": "capsules"
            }]
        }))
        .unwrap();

        let err = draft.prepare(&catalog()).unwrap_err();
        assert_eq!(err.to_string(), "Not enough stock for Amoxicillin 500mg. Available: 150");
    }
}
