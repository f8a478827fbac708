//! フォーム送信（Webhook直送 or バックエンド経由）

use async_trait::async_trait;
use image_insight_common::feedback::webhook_url;
use image_insight_common::strategy::submit_path;
use image_insight_common::{AppConfig, SheetKind, Submitter, TransportError};
use serde_json::Value;
use wasm_bindgen::JsValue;

use super::{js_error, request, send};

#[derive(Debug, Clone)]
pub enum LiveSubmitter {
    Webhook { url: String },
    Server { config: AppConfig },
}

#[async_trait(?Send)]
impl Submitter for LiveSubmitter {
    async fn submit(&self, kind: SheetKind, payload: &Value) -> Result<(), TransportError> {
        let url = match self {
            LiveSubmitter::Webhook { url } => webhook_url(url, kind),
            LiveSubmitter::Server { config } => config.endpoint(submit_path(kind)),
        };

        let body = JsValue::from_str(&payload.to_string());
        let request = request("POST", &url, Some(&body))?;
        request
            .headers()
            .set("Content-Type", "application/json")
            .map_err(js_error)?;

        send(&request).await.map(|_| ())
    }
}
