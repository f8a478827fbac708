//! デモモード
//!
//! 設定が無い・プレースホルダのままの場合に、本番の通信の代わりに使う実装。
//! 一定時間待ってから固定の成功レスポンスを返す。

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::feedback::SheetKind;
use crate::intake::SelectedImage;
use crate::transport::{AnalysisTransport, Submitter};

pub const DEMO_ANALYSIS_DELAY: Duration = Duration::from_secs(2);
pub const DEMO_SUBMIT_DELAY: Duration = Duration::from_secs(1);

pub const DEMO_ANALYSIS: &str = "This is a demo analysis of your uploaded image.

Color Analysis: The image features a rich palette with dominant blues and warm accent colors that create visual harmony.

Mood & Atmosphere: The composition conveys a sense of tranquility and balance, with excellent use of light and shadow.

Visual Elements: Strong compositional elements guide the viewer's eye through the frame, creating engaging visual flow.

Artistic Quality: The image demonstrates good understanding of color theory and visual design principles.

Note: This is a demonstration. Configure your server with real API keys to get actual AI analysis.";

/// タイマー（ブラウザ: gloo-timers / ネイティブ: tokio）
#[async_trait(?Send)]
pub trait Sleep {
    async fn sleep(&self, duration: Duration);
}

/// 固定の解析結果を返す
#[derive(Debug, Clone)]
pub struct DemoTransport<S> {
    sleeper: S,
}

impl<S> DemoTransport<S> {
    pub fn new(sleeper: S) -> Self {
        Self { sleeper }
    }
}

#[async_trait(?Send)]
impl<S: Sleep> AnalysisTransport for DemoTransport<S> {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        tracing::info!(file = image.name(), "demo mode: returning canned analysis");
        self.sleeper.sleep(DEMO_ANALYSIS_DELAY).await;
        Ok(DEMO_ANALYSIS.to_string())
    }
}

/// 常に成功する送信
#[derive(Debug, Clone)]
pub struct DemoSubmitter<S> {
    sleeper: S,
}

impl<S> DemoSubmitter<S> {
    pub fn new(sleeper: S) -> Self {
        Self { sleeper }
    }
}

#[async_trait(?Send)]
impl<S: Sleep> Submitter for DemoSubmitter<S> {
    async fn submit(&self, kind: SheetKind, _payload: &Value) -> Result<(), TransportError> {
        tracing::info!(sheet = kind.as_str(), "demo mode: submission accepted");
        self.sleeper.sleep(DEMO_SUBMIT_DELAY).await;
        Ok(())
    }
}
