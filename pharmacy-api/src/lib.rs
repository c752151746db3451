//! Lớp fetch: client HTTP JSON cho API nhà thuốc và đọc snapshot ngoại tuyến.

pub mod snapshot;

use std::fmt;

use pharmacy_core::{
    ApiConfig, DashboardStats, DraftError, InventoryAlert, Medication, NewOrder, Order,
    OrderDraft, OrderStatus,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::{debug, info, warn};

pub use snapshot::{parse_snapshot_str, parse_snapshot_value, PortalSnapshot};

const MEDICATIONS: &str = "medications";
const ORDERS: &str = "orders";
const ALERTS: &str = "alerts";

/// Lỗi khi gọi API. Phản hồi không phải 2xx chỉ mang status text, không đọc body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Địa chỉ API không hợp lệ `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("{message}")]
    Status { status: u16, message: String },
    #[error("Không kết nối được API: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Không đọc được phản hồi JSON: {0}")]
    Decode(#[from] serde_json::Error),
    #[error(transparent)]
    Validation(#[from] DraftError),
}

impl ApiError {
    /// Mã HTTP khi server trả lỗi.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        Url::parse(&config.base_url).map_err(|err| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            reason: err.to_string(),
        })?;

        let builder = reqwest::Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(std::time::Duration::from_secs(config.timeout_secs));

        Ok(Self {
            http: builder.build()?,
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, ApiError> {
        self.fetch(self.request(Method::GET, "dashboard/stats")).await
    }

    pub async fn medications(&self) -> Result<Vec<Medication>, ApiError> {
        self.fetch(self.request(Method::GET, MEDICATIONS)).await
    }

    pub async fn medication(&self, id: &str) -> Result<Medication, ApiError> {
        self.fetch(self.request(Method::GET, &resource(MEDICATIONS, id)))
            .await
    }

    /// Ghi đè số lượng tồn kho của một thuốc.
    pub async fn update_medication_stock(
        &self,
        id: &str,
        quantity: u32,
    ) -> Result<Medication, ApiError> {
        let request = self
            .request(Method::PATCH, &resource(MEDICATIONS, id))
            .json(&json!({ "stockQuantity": quantity }));
        self.fetch(request).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        self.fetch(self.request(Method::GET, ORDERS)).await
    }

    pub async fn order(&self, id: &str) -> Result<Order, ApiError> {
        self.fetch(self.request(Method::GET, &resource(ORDERS, id))).await
    }

    pub async fn create_order(&self, order: &NewOrder) -> Result<Order, ApiError> {
        let created: Order = self
            .fetch(self.request(Method::POST, ORDERS).json(order))
            .await?;
        info!(order_id = %created.id, priority = %created.priority, "đã tạo đơn thuốc");
        Ok(created)
    }

    pub async fn update_order_status(&self, id: &str, status: OrderStatus) -> Result<Order, ApiError> {
        let request = self
            .request(Method::PATCH, &resource(ORDERS, id))
            .json(&json!({ "status": status }));
        self.fetch(request).await
    }

    pub async fn alerts(&self) -> Result<Vec<InventoryAlert>, ApiError> {
        self.fetch(self.request(Method::GET, ALERTS)).await
    }

    pub async fn dismiss_alert(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &resource(ALERTS, id)))
            .await
            .map(|_| ())
    }

    /// Kiểm tra form, gửi đơn và chỉ xoá form khi server đã nhận.
    ///
    /// Kiểm tra thất bại thì không có request nào được gửi.
    pub async fn submit_draft(
        &self,
        draft: &mut OrderDraft,
        catalog: &[Medication],
    ) -> Result<Order, ApiError> {
        let new_order = draft.prepare(catalog)?;
        let created = self.create_order(&new_order).await?;
        draft.clear();
        Ok(created)
    }

    /// Tải toàn bộ dữ liệu bảng điều khiển. Lỗi số liệu tổng hợp chỉ được ghi log.
    pub async fn snapshot(&self) -> Result<PortalSnapshot, ApiError> {
        let stats = match self.dashboard_stats().await {
            Ok(stats) => Some(stats),
            Err(err) => {
                warn!(error = %err, "không tải được số liệu tổng hợp, dùng giá trị dự phòng");
                None
            }
        };

        Ok(PortalSnapshot {
            stats,
            medications: self.medications().await?,
            orders: self.orders().await?,
            alerts: self.alerts().await?,
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.config.endpoint(path);
        debug!(%method, %url, "gửi request tới API nhà thuốc");
        self.http
            .request(method, url)
            .header(CONTENT_TYPE, "application/json")
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await.map_err(|err| {
            warn!(error = %err, "request tới API thất bại");
            ApiError::Transport(err)
        })?;

        let status = response.status();
        if !status.is_success() {
            let message = format!(
                "API request failed: {}",
                status.canonical_reason().unwrap_or_else(|| status.as_str())
            );
            warn!(status = status.as_u16(), url = %response.url(), "API trả về lỗi");
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let body = response.bytes().await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

fn resource(collection: &str, id: &str) -> String {
    format!("{collection}/{}", PathSegment(id))
}

/// Mã hoá id để dùng an toàn làm một đoạn path.
struct PathSegment<'a>(&'a str);

impl fmt::Display for PathSegment<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.bytes() {
            match byte {
                b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                    write!(f, "{}", byte as char)?
                }
                other => write!(f, "%{other:02X}")?,
            }
        }
        Ok(())
    }
}
