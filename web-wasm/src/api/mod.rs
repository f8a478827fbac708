//! fetch による通信実装
//!
//! - 直接モード: OpenAI Chat Completions / スプレッドシートWebhook
//! - サーバモード: /api/analyze-image (FormData) / /api/submit-*

mod openai;
mod server;
mod submit;

pub use openai::DirectTransport;
pub use server::{load_server_config, ServerTransport};
pub use submit::LiveSubmitter;

use async_trait::async_trait;
use image_insight_common::strategy::{self, Plan};
use image_insight_common::transport::check_status;
use image_insight_common::{
    AnalysisTransport, Backend, ConfigLoad, DemoSubmitter, DemoTransport, SelectedImage,
    TransportError, TransportMode,
};
use serde::de::DeserializeOwned;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use crate::timer::GlooSleep;

pub type Analyzer = Backend<LiveAnalyzer, DemoTransport<GlooSleep>>;
pub type FormSender = Backend<LiveSubmitter, DemoSubmitter<GlooSleep>>;

/// JS例外を通信エラーへ
pub(crate) fn js_error(e: JsValue) -> TransportError {
    TransportError::Network(e.as_string().unwrap_or_else(|| format!("{:?}", e)))
}

/// リクエスト生成（ボディはJSON文字列・FormDataなど）
pub(crate) fn request(method: &str, url: &str, body: Option<&JsValue>) -> Result<Request, TransportError> {
    let opts = RequestInit::new();
    opts.set_method(method);
    opts.set_mode(RequestMode::Cors);
    if let Some(body) = body {
        opts.set_body(body);
    }
    Request::new_with_str_and_init(url, &opts).map_err(js_error)
}

/// fetch を1回実行。2xx 以外はエラー
pub(crate) async fn send(request: &Request) -> Result<Response, TransportError> {
    let window = web_sys::window().ok_or_else(|| TransportError::Network("no window".into()))?;
    let value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(js_error)?;
    let response: Response = value.dyn_into().map_err(js_error)?;
    check_status(response.status())?;
    Ok(response)
}

pub(crate) async fn read_json<T: DeserializeOwned>(response: &Response) -> Result<T, TransportError> {
    let promise = response.json().map_err(js_error)?;
    let json = JsFuture::from(promise).await.map_err(js_error)?;
    serde_wasm_bindgen::from_value(json).map_err(|e| TransportError::Decode(e.to_string()))
}

#[derive(Debug, Clone)]
pub enum LiveAnalyzer {
    Direct(DirectTransport),
    Server(ServerTransport),
}

#[async_trait(?Send)]
impl AnalysisTransport for LiveAnalyzer {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        match self {
            LiveAnalyzer::Direct(t) => t.analyze(image).await,
            LiveAnalyzer::Server(t) => t.analyze(image).await,
        }
    }
}

/// 起動時に選ばれた通信一式
#[derive(Debug, Clone)]
pub struct Services {
    pub plan: Plan,
    pub analyzer: Analyzer,
    pub sender: FormSender,
}

impl Services {
    /// 設定の取得結果から一度だけ実装を選ぶ
    pub fn build(load: &ConfigLoad) -> Self {
        let plan = Plan::from_load(load);
        let config = load.config();

        let analyzer = strategy::build(
            plan.analysis,
            || match (plan.mode, config.api_key()) {
                (TransportMode::Direct, Some(key)) => {
                    LiveAnalyzer::Direct(DirectTransport::new(key.to_string(), config.clone()))
                }
                _ => LiveAnalyzer::Server(ServerTransport::new(config.clone())),
            },
            || DemoTransport::new(GlooSleep),
        );

        let sender = strategy::build(
            plan.submissions,
            || match (plan.mode, config.webhook_url()) {
                (TransportMode::Direct, Some(url)) => LiveSubmitter::Webhook { url: url.to_string() },
                _ => LiveSubmitter::Server { config: config.clone() },
            },
            || DemoSubmitter::new(GlooSleep),
        );

        Self { plan, analyzer, sender }
    }
}
