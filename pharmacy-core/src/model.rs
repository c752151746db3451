//! Mô hình dữ liệu trao đổi với API nhà thuốc.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Thuốc trong kho.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_name: Option<String>,
    pub category: String,
    pub stock_quantity: u32,
    pub min_stock_level: u32,
    pub unit: String,
    pub price: f64,
    pub expiry_date: NaiveDate,
    pub batch_number: String,
    pub supplier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Mức tồn kho dùng để tô màu nhãn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    /// Tồn kho không quá một nửa ngưỡng tối thiểu.
    Critical,
    Low,
    InStock,
}

impl StockLevel {
    pub fn label(self) -> &'static str {
        match self {
            StockLevel::Critical | StockLevel::Low => "Low Stock",
            StockLevel::InStock => "In Stock",
        }
    }

    pub fn level(self) -> &'static str {
        match self {
            StockLevel::Critical => "critical",
            StockLevel::Low => "warning",
            StockLevel::InStock => "success",
        }
    }
}

impl Medication {
    /// Tồn kho bằng đúng ngưỡng tối thiểu vẫn tính là thấp.
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_level
    }

    pub fn stock_level(&self) -> StockLevel {
        if !self.is_low_stock() {
            StockLevel::InStock
        } else if u64::from(self.stock_quantity) * 2 <= u64::from(self.min_stock_level) {
            StockLevel::Critical
        } else {
            StockLevel::Low
        }
    }

    /// Hạn dùng rơi vào `window_days` ngày tới (kể cả đã hết hạn).
    pub fn is_expiring_soon(&self, today: NaiveDate, window_days: u32) -> bool {
        self.expiry_date <= today + Duration::days(i64::from(window_days))
    }
}

/// Trạng thái xử lý đơn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Ready,
    Dispensed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Ready,
        OrderStatus::Dispensed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Ready => "ready",
            OrderStatus::Dispensed => "dispensed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending Review",
            OrderStatus::Processing => "Processing",
            OrderStatus::Ready => "Ready for Pickup",
            OrderStatus::Dispensed => "Dispensed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn level(self) -> &'static str {
        match self {
            OrderStatus::Pending => "secondary",
            OrderStatus::Processing => "warning",
            OrderStatus::Ready | OrderStatus::Dispensed => "success",
            OrderStatus::Cancelled => "destructive",
        }
    }
}

/// Mức ưu tiên của đơn. Giá trị lạ từ API rơi vào `Unknown` và xếp cuối.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum OrderPriority {
    Sos,
    Urgent,
    #[default]
    Routine,
    #[serde(other)]
    Unknown,
}

impl OrderPriority {
    pub const ALL: [OrderPriority; 3] = [
        OrderPriority::Sos,
        OrderPriority::Urgent,
        OrderPriority::Routine,
    ];

    /// Thứ hạng triage: SOS trước, rồi urgent, rồi routine.
    pub fn rank(self) -> u8 {
        match self {
            OrderPriority::Sos => 0,
            OrderPriority::Urgent => 1,
            OrderPriority::Routine => 2,
            OrderPriority::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderPriority::Sos => "sos",
            OrderPriority::Urgent => "urgent",
            OrderPriority::Routine => "routine",
            OrderPriority::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OrderPriority::Sos => "SOS (Emergency)",
            OrderPriority::Urgent => "Urgent",
            OrderPriority::Routine => "Routine",
            OrderPriority::Unknown => "Unknown",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            OrderPriority::Sos => "Highest priority - immediate attention required",
            OrderPriority::Urgent => "High priority - process as soon as possible",
            OrderPriority::Routine => "Standard priority - normal processing time",
            OrderPriority::Unknown => "Unrecognised priority",
        }
    }

    pub fn level(self) -> &'static str {
        match self {
            OrderPriority::Sos => "critical",
            OrderPriority::Urgent => "warning",
            OrderPriority::Routine | OrderPriority::Unknown => "secondary",
        }
    }
}

/// Loại cảnh báo kho.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    LowStock,
    Expired,
    ExpiringSoon,
}

impl AlertType {
    pub const ALL: [AlertType; 3] = [AlertType::LowStock, AlertType::Expired, AlertType::ExpiringSoon];

    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::LowStock => "low_stock",
            AlertType::Expired => "expired",
            AlertType::ExpiringSoon => "expiring_soon",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            AlertType::LowStock => "Low Stock Alert",
            AlertType::Expired => "Expired Medication",
            AlertType::ExpiringSoon => "Expiring Soon",
        }
    }

    pub fn action_label(self) -> &'static str {
        match self {
            AlertType::LowStock => "Reorder",
            AlertType::Expired => "Remove",
            AlertType::ExpiringSoon => "Review",
        }
    }
}

/// Mức nghiêm trọng của cảnh báo. Giá trị lạ rơi vào `Unknown` và xếp cuối.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum AlertSeverity {
    Critical,
    Warning,
    Info,
    #[serde(other)]
    Unknown,
}

impl AlertSeverity {
    pub const ALL: [AlertSeverity; 3] = [
        AlertSeverity::Critical,
        AlertSeverity::Warning,
        AlertSeverity::Info,
    ];

    /// Thứ hạng triage: critical trước, rồi warning, rồi info.
    pub fn rank(self) -> u8 {
        match self {
            AlertSeverity::Critical => 0,
            AlertSeverity::Warning => 1,
            AlertSeverity::Info => 2,
            AlertSeverity::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AlertSeverity::Critical => "critical",
            AlertSeverity::Warning => "warning",
            AlertSeverity::Info => "info",
            AlertSeverity::Unknown => "unknown",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AlertSeverity::Critical => "Critical",
            AlertSeverity::Warning => "Warning",
            AlertSeverity::Info => "Info",
            AlertSeverity::Unknown => "Unknown",
        }
    }
}

macro_rules! impl_from_str {
    ($ty:ty, $what:literal) => {
        impl FromStr for $ty {
            type Err = String;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                let needle = value.trim().to_ascii_lowercase();
                <$ty>::ALL
                    .into_iter()
                    .find(|candidate| candidate.as_str() == needle)
                    .ok_or_else(|| format!("{} không hợp lệ: {value}", $what))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

impl_from_str!(OrderStatus, "Trạng thái đơn");
impl_from_str!(OrderPriority, "Mức ưu tiên");
impl_from_str!(AlertType, "Loại cảnh báo");
impl_from_str!(AlertSeverity, "Mức nghiêm trọng");

/// Một dòng thuốc trong đơn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub medication_id: String,
    pub medication_name: String,
    pub quantity: u32,
    pub unit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instructions: Option<String>,
}

/// Đơn thuốc đã lưu phía server.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    #[serde(default)]
    pub medications: Vec<OrderItem>,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_pharmacist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<DateTime<Utc>>,
}

/// Thời gian dự kiến hoàn tất của một đơn đang xử lý.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionEta {
    Remaining { minutes: i64 },
    Due,
}

impl fmt::Display for CompletionEta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompletionEta::Remaining { minutes } => write!(f, "~{minutes} minutes remaining"),
            CompletionEta::Due => f.write_str("Should be ready now"),
        }
    }
}

impl Order {
    pub fn is_sos(&self) -> bool {
        self.priority == OrderPriority::Sos
    }

    /// Số phút còn lại, làm tròn tới phút gần nhất.
    pub fn completion_eta(&self, now: DateTime<Utc>) -> Option<CompletionEta> {
        let estimated = self.estimated_completion_time?;
        let seconds = estimated.signed_duration_since(now).num_seconds();
        let minutes = (seconds as f64 / 60.0).round() as i64;
        if minutes > 0 {
            Some(CompletionEta::Remaining { minutes })
        } else {
            Some(CompletionEta::Due)
        }
    }
}

/// Thân request POST /orders: đơn chưa có id và mốc thời gian.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewOrder {
    pub patient_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub medications: Vec<OrderItem>,
    pub status: OrderStatus,
    pub priority: OrderPriority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_pharmacist: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_completion_time: Option<DateTime<Utc>>,
}

/// Cảnh báo tồn kho/hạn dùng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlert {
    pub id: String,
    pub medication_id: String,
    #[serde(default)]
    pub medication_name: String,
    #[serde(rename = "type")]
    pub kind: AlertType,
    pub message: String,
    pub severity: AlertSeverity,
    pub created_at: DateTime<Utc>,
}

/// Số liệu tổng hợp do server tính sẵn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_medications: u32,
    pub low_stock_items: u32,
    pub pending_orders: u32,
    pub sos_orders: u32,
    pub completed_today: u32,
    pub revenue: f64,
}
