//! Lọc và sắp xếp cảnh báo, đơn thuốc, danh mục kho để hiển thị.
//!
//! Mọi hàm nhận slice và trả về `Vec<&T>` mượn từ input, không bao giờ sửa
//! input. Dữ liệu chưa tải (hoặc tải lỗi) được coi là slice rỗng, xem
//! [`crate::FetchState::items`].

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::model::{
    AlertSeverity, AlertType, InventoryAlert, Medication, Order, OrderPriority, OrderStatus,
};

/// Lựa chọn của một bộ lọc dropdown: `"all"` hoặc một giá trị cụ thể.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(expected) => expected == value,
        }
    }
}

impl<T> From<Option<T>> for Selection<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Selection::All, Selection::Only)
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        // Sentinel so khớp chính xác, phân biệt hoa thường.
        if value == "all" {
            return Ok(Selection::All);
        }
        value
            .parse()
            .map(Selection::Only)
            .map_err(|err: T::Err| err.to_string())
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Selection::All => serializer.serialize_str("all"),
            Selection::Only(value) => serializer.collect_str(value),
        }
    }
}

impl<'de, T> Deserialize<'de> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(D::Error::custom)
    }
}

/// Bộ lọc tồn kho của màn hình Inventory.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum StockFilter {
    #[default]
    All,
    Low,
    Sufficient,
}

impl StockFilter {
    pub fn matches(self, medication: &Medication) -> bool {
        match self {
            StockFilter::All => true,
            StockFilter::Low => medication.is_low_stock(),
            StockFilter::Sufficient => !medication.is_low_stock(),
        }
    }
}

impl FromStr for StockFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(StockFilter::All),
            "low" => Ok(StockFilter::Low),
            "sufficient" => Ok(StockFilter::Sufficient),
            other => Err(format!("Bộ lọc tồn kho không hợp lệ: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertFilter {
    pub severity: Selection<AlertSeverity>,
    #[serde(rename = "type")]
    pub kind: Selection<AlertType>,
}

impl AlertFilter {
    pub fn matches(&self, alert: &InventoryAlert) -> bool {
        self.severity.matches(&alert.severity) && self.kind.matches(&alert.kind)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderFilter {
    /// Từ khóa tìm theo tên bệnh nhân hoặc mã đơn.
    pub search: String,
    pub status: Selection<OrderStatus>,
    pub priority: Selection<OrderPriority>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        let query = normalize_query(&self.search);
        let matches_search = query.is_empty()
            || contains_ignore_case(&order.patient_name, &query)
            || contains_ignore_case(&order.id, &query);

        matches_search && self.status.matches(&order.status) && self.priority.matches(&order.priority)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryFilter {
    /// Từ khóa tìm theo tên, tên gốc hoặc nhóm thuốc.
    pub search: String,
    pub category: Selection<String>,
    pub stock: StockFilter,
}

impl InventoryFilter {
    pub fn matches(&self, medication: &Medication) -> bool {
        self.matches_search(medication)
            && self.category.matches(&medication.category)
            && self.stock.matches(medication)
    }

    /// Chỉ xét từ khóa, dùng cho ô tìm thuốc trong form tạo đơn.
    pub fn matches_search(&self, medication: &Medication) -> bool {
        let query = normalize_query(&self.search);
        if query.is_empty() {
            return true;
        }

        contains_ignore_case(&medication.name, &query)
            || medication
                .generic_name
                .as_deref()
                .is_some_and(|generic| contains_ignore_case(generic, &query))
            || contains_ignore_case(&medication.category, &query)
    }
}

/// Lọc rồi sắp cảnh báo: critical trước, cùng mức thì mới nhất trước.
pub fn triage_alerts<'a>(alerts: &'a [InventoryAlert], filter: &AlertFilter) -> Vec<&'a InventoryAlert> {
    let mut selected: Vec<&InventoryAlert> =
        alerts.iter().filter(|alert| filter.matches(alert)).collect();

    selected.sort_by(|a, b| {
        a.severity
            .rank()
            .cmp(&b.severity.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    selected
}

/// Lọc rồi sắp đơn: SOS trước, cùng mức thì mới nhất trước. Sắp xếp ổn định.
pub fn triage_orders<'a>(orders: &'a [Order], filter: &OrderFilter) -> Vec<&'a Order> {
    let mut selected: Vec<&Order> = orders.iter().filter(|order| filter.matches(order)).collect();

    selected.sort_by(|a, b| {
        a.priority
            .rank()
            .cmp(&b.priority.rank())
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    selected
}

/// Lọc danh mục thuốc, giữ nguyên thứ tự tải về.
pub fn filter_inventory<'a>(
    medications: &'a [Medication],
    filter: &InventoryFilter,
) -> Vec<&'a Medication> {
    medications
        .iter()
        .filter(|medication| filter.matches(medication))
        .collect()
}

/// Các nhóm thuốc khác nhau theo thứ tự xuất hiện đầu tiên.
pub fn categories(medications: &[Medication]) -> Vec<&str> {
    let mut seen = HashSet::new();
    medications
        .iter()
        .map(|medication| medication.category.as_str())
        .filter(|category| seen.insert(*category))
        .collect()
}

/// Đếm cảnh báo theo mức nghiêm trọng trên toàn bộ danh sách chưa lọc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeverityStats {
    pub critical: usize,
    pub warning: usize,
    pub info: usize,
}

impl SeverityStats {
    pub fn from_alerts(alerts: &[InventoryAlert]) -> Self {
        alerts
            .iter()
            .fold(SeverityStats::default(), |mut stats, alert| {
                match alert.severity {
                    AlertSeverity::Critical => stats.critical += 1,
                    AlertSeverity::Warning => stats.warning += 1,
                    AlertSeverity::Info => stats.info += 1,
                    AlertSeverity::Unknown => {}
                }
                stats
            })
    }
}

fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

fn contains_ignore_case(haystack: &str, lowered_query: &str) -> bool {
    haystack.to_lowercase().contains(lowered_query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_parses_all_sentinel() {
        assert_eq!("all".parse::<Selection<AlertSeverity>>(), Ok(Selection::All));
        assert_eq!(
            "critical".parse::<Selection<AlertSeverity>>(),
            Ok(Selection::Only(AlertSeverity::Critical))
        );
        assert!("loud".parse::<Selection<AlertSeverity>>().is_err());
        assert_eq!(
            "Antibiotics".parse::<Selection<String>>(),
            Ok(Selection::Only("Antibiotics".to_string()))
        );
    }

    #[test]
    fn category_named_all_is_not_the_sentinel() {
        assert_eq!(
            "All".parse::<Selection<String>>(),
            Ok(Selection::Only("All".to_string()))
        );
        assert_eq!(
            "ALL".parse::<Selection<String>>(),
            Ok(Selection::Only("ALL".to_string()))
        );
        assert_eq!("all".parse::<Selection<String>>(), Ok(Selection::All));
    }

    #[test]
    fn filter_round_trips_through_json_words() {
        let filter: OrderFilter =
            serde_json::from_str(r#"{ "search": "smith", "priority": "sos" }"#).unwrap();
        assert_eq!(filter.status, Selection::All);
        assert_eq!(filter.priority, Selection::Only(OrderPriority::Sos));
        assert_eq!(
            serde_json::to_value(&filter).unwrap()["status"],
            serde_json::json!("all")
        );
    }

    #[test]
    fn stats_on_empty_input_are_zero() {
        assert_eq!(SeverityStats::from_alerts(&[]), SeverityStats::default());
    }
}
