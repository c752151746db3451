//! Dữ liệu cho màn hình tổng quan.

use crate::model::{AlertSeverity, DashboardStats, InventoryAlert, Order};
use crate::TriageConfig;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardOverview<'a> {
    /// Số liệu từ server, hoặc toàn số 0 khi chưa tải được.
    pub stats: DashboardStats,
    /// `false` khi đang dùng số liệu dự phòng.
    pub stats_available: bool,
    /// Vài đơn đầu tiên theo thứ tự server trả về.
    pub recent_orders: Vec<&'a Order>,
    pub sos_in_recent: usize,
    pub critical_alerts: Vec<&'a InventoryAlert>,
}

impl<'a> DashboardOverview<'a> {
    pub fn build(
        stats: Option<&DashboardStats>,
        orders: &'a [Order],
        alerts: &'a [InventoryAlert],
        config: &TriageConfig,
    ) -> Self {
        let recent_orders: Vec<&Order> = orders.iter().take(config.recent_orders_limit).collect();
        let sos_in_recent = recent_orders.iter().filter(|order| order.is_sos()).count();
        let critical_alerts = alerts
            .iter()
            .filter(|alert| alert.severity == AlertSeverity::Critical)
            .collect();

        Self {
            stats: stats.cloned().unwrap_or_default(),
            stats_available: stats.is_some(),
            recent_orders,
            sos_in_recent,
            critical_alerts,
        }
    }

    /// Câu tóm tắt cho dải cảnh báo đầu trang, `None` khi không có cảnh báo critical.
    pub fn critical_banner(&self) -> Option<String> {
        match self.critical_alerts.len() {
            0 => None,
            1 => Some("1 critical issue detected".to_string()),
            count => Some(format!("{count} critical issues detected")),
        }
    }
}
