//! Giao diện bảng điều khiển nhà thuốc cho môi trường WebAssembly.

pub mod format;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod hooks;
mod styles;
#[cfg(target_arch = "wasm32")]
mod views;

use pharmacy_core::{ApiConfig, TriageConfig};
use serde::Deserialize;

/// Cấu hình truyền từ JS khi mount; mọi trường đều có mặc định.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MountConfig {
    pub api: ApiConfig,
    pub triage: TriageConfig,
}

#[cfg(target_arch = "wasm32")]
mod wasm_ui {
    use pharmacy_api::ApiClient;
    use serde_wasm_bindgen::from_value;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, Window};

    use super::MountConfig;
    use crate::app::{ApiHandle, AppProps, PharmacyApp};

    #[wasm_bindgen]
    pub fn mount_pharmacy_dashboard(selector: &str, config: JsValue) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window: Window =
            web_sys::window().ok_or_else(|| JsValue::from_str("Không có window"))?;
        let document: Document = window
            .document()
            .ok_or_else(|| JsValue::from_str("Không truy cập được document"))?;

        let target: Element = document
            .query_selector(selector)
            .map_err(|err| JsValue::from_str(&format!("Selector lỗi: {err:?}")))?
            .ok_or_else(|| JsValue::from_str("Không tìm thấy element theo selector"))?;

        let config: MountConfig = if config.is_undefined() || config.is_null() {
            MountConfig::default()
        } else {
            from_value(config)?
        };
        let client = ApiClient::new(config.api)
            .map_err(|err| JsValue::from_str(&err.to_string()))?;

        yew::Renderer::<PharmacyApp>::with_root_and_props(
            target,
            AppProps {
                api: ApiHandle::new(client),
                config: config.triage,
            },
        )
        .render();
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use wasm_ui::mount_pharmacy_dashboard;

#[cfg(not(target_arch = "wasm32"))]
pub fn mount_pharmacy_dashboard(
    _: &str,
    _: wasm_bindgen::JsValue,
) -> Result<(), wasm_bindgen::JsValue> {
    Err(wasm_bindgen::JsValue::from_str(
        "pharmacy-ui chỉ hỗ trợ biên dịch target wasm32",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mount_config_fills_missing_sections() {
        let config: MountConfig =
            serde_json::from_str(r#"{"api":{"base_url":"https://pharmacy.example/api"}}"#)
                .expect("cấu hình hợp lệ");
        assert_eq!(config.api.base_url, "https://pharmacy.example/api");
        assert_eq!(config.triage, TriageConfig::default());
    }
}
