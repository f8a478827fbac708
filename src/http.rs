//! reqwest による通信実装
//!
//! - 直接モード: OpenAI Chat Completions / スプレッドシートWebhook
//! - サーバモード: /api/analyze-image (multipart) / /api/submit-*
//!
//! どちらも1回だけリクエストし、リトライはしない。

use async_trait::async_trait;
use image_insight_common::openai::{bearer, ChatRequest, ChatResponse, OPENAI_API_URL};
use image_insight_common::strategy::{self, submit_path, Plan};
use image_insight_common::transport::{check_status, AnalyzeResponse, ANALYZE_PATH, CONFIG_PATH, IMAGE_FIELD};
use image_insight_common::{
    feedback::webhook_url, AnalysisTransport, AppConfig, Backend, ConfigLoad, DemoSubmitter,
    DemoTransport, SelectedImage, ServerConfig, SheetKind, Submitter, TransportError, TransportMode,
};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::timer::TokioSleep;

pub type Analyzer = Backend<LiveAnalyzer, DemoTransport<TokioSleep>>;
pub type FormSender = Backend<LiveSubmitter, DemoSubmitter<TokioSleep>>;

fn network(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

async fn read_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, TransportError> {
    check_status(response.status().as_u16())?;
    response
        .json::<T>()
        .await
        .map_err(|e| TransportError::Decode(e.to_string()))
}

/// OpenAI Vision を直接呼ぶ
#[derive(Debug, Clone)]
pub struct DirectTransport {
    client: reqwest::Client,
    api_key: String,
    config: AppConfig,
    url: String,
}

impl DirectTransport {
    pub fn new(client: reqwest::Client, api_key: String, config: AppConfig) -> Self {
        Self {
            client,
            api_key,
            config,
            url: OPENAI_API_URL.to_string(),
        }
    }

    /// 互換エンドポイント（プロキシ等）を使う場合
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }
}

#[async_trait(?Send)]
impl AnalysisTransport for DirectTransport {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        let request = ChatRequest::from_config(&self.config, image);
        tracing::debug!(model = %request.model, bytes = image.size(), "calling vision api");

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::AUTHORIZATION, bearer(&self.api_key))
            .json(&request)
            .send()
            .await
            .map_err(network)?;

        let body: ChatResponse = read_json(response).await?;
        body.first_text()
    }
}

/// バックエンド経由（multipart）
#[derive(Debug, Clone)]
pub struct ServerTransport {
    client: reqwest::Client,
    config: AppConfig,
}

impl ServerTransport {
    pub fn new(client: reqwest::Client, config: AppConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait(?Send)]
impl AnalysisTransport for ServerTransport {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.name().to_string())
            .mime_str(image.mime())
            .map_err(network)?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let url = self.config.endpoint(ANALYZE_PATH);
        tracing::debug!(%url, bytes = image.size(), "posting image to server");

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(network)?;

        let body: AnalyzeResponse = read_json(response).await?;
        Ok(body.analysis)
    }
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

/// フォーム送信（Webhook直送 or バックエンド経由）
#[derive(Debug, Clone)]
pub enum LiveSubmitter {
    Webhook { client: reqwest::Client, url: String },
    Server { client: reqwest::Client, config: AppConfig },
}

#[async_trait(?Send)]
impl Submitter for LiveSubmitter {
    async fn submit(&self, kind: SheetKind, payload: &Value) -> Result<(), TransportError> {
        let (client, url) = match self {
            LiveSubmitter::Webhook { client, url } => (client, webhook_url(url, kind)),
            LiveSubmitter::Server { client, config } => (client, config.endpoint(submit_path(kind))),
        };
        tracing::debug!(%url, sheet = kind.as_str(), "submitting form");

        let response = client.post(url).json(payload).send().await.map_err(network)?;
        check_status(response.status().as_u16())
    }
}

/// /api/config を取得してマージ。失敗時は Unavailable
pub async fn load_server_config(client: &reqwest::Client, mut config: AppConfig) -> ConfigLoad {
    let result = async {
        let response = client
            .get(config.endpoint(CONFIG_PATH))
            .send()
            .await
            .map_err(network)?;
        read_json::<ServerConfig>(response).await
    }
    .await;

    match result {
        Ok(server) => {
            config.merge_server(server);
            ConfigLoad::Loaded(config)
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to load configuration");
            ConfigLoad::Unavailable
        }
    }
}

/// 起動時に一度だけ実装を選択
pub fn build_backends(client: &reqwest::Client, load: &ConfigLoad) -> (Plan, Analyzer, FormSender) {
    let plan = Plan::from_load(load);
    let config = load.config();

    let analyzer = strategy::build(
        plan.analysis,
        || match (plan.mode, config.api_key()) {
            (TransportMode::Direct, Some(key)) => {
                LiveAnalyzer::Direct(DirectTransport::new(client.clone(), key.to_string(), config.clone()))
            }
            _ => LiveAnalyzer::Server(ServerTransport::new(client.clone(), config.clone())),
        },
        || DemoTransport::new(TokioSleep),
    );

    let sender = strategy::build(
        plan.submissions,
        || match (plan.mode, config.webhook_url()) {
            (TransportMode::Direct, Some(url)) => LiveSubmitter::Webhook {
                client: client.clone(),
                url: url.to_string(),
            },
            _ => LiveSubmitter::Server {
                client: client.clone(),
                config: config.clone(),
            },
        },
        || DemoSubmitter::new(TokioSleep),
    );

    (plan, analyzer, sender)
}
