//! OpenAI Vision 直接呼び出し

use async_trait::async_trait;
use image_insight_common::openai::{bearer, ChatRequest, ChatResponse, OPENAI_API_URL};
use image_insight_common::{AnalysisTransport, AppConfig, SelectedImage, TransportError};
use wasm_bindgen::JsValue;

use super::{js_error, read_json, request, send};

/// APIキーはページに埋め込まれる。公開サイトではサーバモードを使うこと
#[derive(Debug, Clone)]
pub struct DirectTransport {
    api_key: String,
    config: AppConfig,
}

impl DirectTransport {
    pub fn new(api_key: String, config: AppConfig) -> Self {
        Self { api_key, config }
    }
}

#[async_trait(?Send)]
impl AnalysisTransport for DirectTransport {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        let body = serde_json::to_string(&ChatRequest::from_config(&self.config, image))
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        let request = request("POST", OPENAI_API_URL, Some(&JsValue::from_str(&body)))?;
        let headers = request.headers();
        headers.set("Content-Type", "application/json").map_err(js_error)?;
        headers
            .set("Authorization", &bearer(&self.api_key))
            .map_err(js_error)?;

        let response = send(&request).await?;
        let body: ChatResponse = read_json(&response).await?;
        body.first_text()
    }
}
