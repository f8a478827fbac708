//! バックエンド経由の解析と設定取得

use async_trait::async_trait;
use image_insight_common::transport::{AnalyzeResponse, ANALYZE_PATH, CONFIG_PATH, IMAGE_FIELD};
use image_insight_common::{
    AnalysisTransport, AppConfig, ConfigLoad, SelectedImage, ServerConfig, TransportError,
};
use web_sys::{Blob, BlobPropertyBag, FormData};

use super::{js_error, read_json, request, send};

#[derive(Debug, Clone)]
pub struct ServerTransport {
    config: AppConfig,
}

impl ServerTransport {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }
}

/// 画像バイト列をファイル名付きの multipart フィールドにする
fn image_form(image: &SelectedImage) -> Result<FormData, TransportError> {
    let bytes = js_sys::Uint8Array::from(image.bytes());
    let parts = js_sys::Array::of1(&bytes);
    let options = BlobPropertyBag::new();
    options.set_type(image.mime());
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options).map_err(js_error)?;

    let form = FormData::new().map_err(js_error)?;
    form.append_with_blob_and_filename(IMAGE_FIELD, &blob, image.name())
        .map_err(js_error)?;
    Ok(form)
}

#[async_trait(?Send)]
impl AnalysisTransport for ServerTransport {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        let form = image_form(image)?;
        // Content-Type はブラウザが boundary 付きで設定する
        let request = request("POST", &self.config.endpoint(ANALYZE_PATH), Some(form.as_ref()))?;

        let response = send(&request).await?;
        let body: AnalyzeResponse = read_json(&response).await?;
        Ok(body.analysis)
    }
}

/// /api/config を取得してマージ。失敗時は Unavailable
pub async fn load_server_config(mut config: AppConfig) -> ConfigLoad {
    let result = async {
        let request = request("GET", &config.endpoint(CONFIG_PATH), None)?;
        let response = send(&request).await?;
        read_json::<ServerConfig>(&response).await
    }
    .await;

    match result {
        Ok(server) => {
            config.merge_server(server);
            ConfigLoad::Loaded(config)
        }
        Err(e) => {
            gloo::console::error!("Failed to load configuration:", e.to_string());
            ConfigLoad::Unavailable
        }
    }
}
