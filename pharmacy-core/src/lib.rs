//! Logic lõi cho bảng điều khiển nhà thuốc: mô hình dữ liệu, phân loại ưu tiên
//! (triage), soạn đơn thuốc và trạng thái tải dữ liệu.

pub mod dashboard;
pub mod draft;
pub mod fetch;
pub mod model;
pub mod triage;

use serde::{Deserialize, Serialize};

pub use dashboard::DashboardOverview;
pub use draft::{validate_stock, DraftError, DraftLine, LineItemUpdate, OrderDraft, SubmitError};
pub use fetch::{FetchState, RequestTicket};
pub use model::{
    AlertSeverity, AlertType, CompletionEta, DashboardStats, InventoryAlert, Medication, NewOrder, Order,
    OrderItem, OrderPriority, OrderStatus, StockLevel,
};
pub use triage::{
    categories, filter_inventory, triage_alerts, triage_orders, AlertFilter, InventoryFilter,
    OrderFilter, Selection, SeverityStats, StockFilter,
};

/// URL mặc định của API khi không có cấu hình.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";

/// Cấu hình kết nối tới API nhà thuốc, truyền tường minh vào lớp fetch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Địa chỉ gốc, ví dụ `http://localhost:3000/api`.
    pub base_url: String,
    /// Thời gian chờ tối đa cho mỗi request (giây).
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

impl ApiConfig {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Ghép endpoint vào URL gốc, chấp nhận dấu `/` thừa ở cả hai phía.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

/// Các ngưỡng dùng khi trình bày kho và bảng tổng quan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TriageConfig {
    /// Số ngày trước hạn dùng để coi là "sắp hết hạn".
    pub expiring_soon_days: u32,
    /// Số đơn gần nhất hiển thị trên bảng tổng quan.
    pub recent_orders_limit: usize,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            expiring_soon_days: 30,
            recent_orders_limit: 3,
        }
    }
}

/// Lỗi chung của lớp lõi.
#[derive(Debug, thiserror::Error)]
pub enum PharmacyError {
    #[error("Dữ liệu đầu vào thiếu thông tin tối thiểu")]
    MissingData,
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let cfg = ApiConfig::with_base_url("http://pharmacy.local/api/");
        assert_eq!(cfg.endpoint("/orders"), "http://pharmacy.local/api/orders");
        assert_eq!(cfg.endpoint("alerts/a-1"), "http://pharmacy.local/api/alerts/a-1");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg: ApiConfig = serde_json::from_str(r#"{ "base_url": "http://x/api" }"#).unwrap();
        assert_eq!(cfg.base_url, "http://x/api");
        assert_eq!(cfg.timeout_secs, ApiConfig::default().timeout_secs);
    }
}
