//! Snapshot JSON của toàn bộ dữ liệu bảng điều khiển, dùng khi làm việc ngoại tuyến.

use pharmacy_core::{DashboardStats, InventoryAlert, Medication, Order, PharmacyError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PortalSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DashboardStats>,
    pub medications: Vec<Medication>,
    pub orders: Vec<Order>,
    pub alerts: Vec<InventoryAlert>,
}

/// Đọc snapshot từ chuỗi JSON.
pub fn parse_snapshot_str(input: &str) -> Result<PortalSnapshot, PharmacyError> {
    let value: Value =
        serde_json::from_str(input).map_err(|err| PharmacyError::Parse(err.to_string()))?;
    parse_snapshot_value(&value)
}

/// Đọc snapshot từ `serde_json::Value` đã parse sẵn.
pub fn parse_snapshot_value(value: &Value) -> Result<PortalSnapshot, PharmacyError> {
    if !value.is_object() {
        return Err(PharmacyError::MissingData);
    }

    PortalSnapshot::deserialize(value).map_err(|err| PharmacyError::Parse(err.to_string()))
}
