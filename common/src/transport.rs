//! 解析結果の取得・フォーム送信の戦略
//!
//! 直接API呼び出し / バックエンド経由 / デモ の各実装は同じトレイトを実装し、
//! オーケストレータ側は分岐しない。どの実装を使うかは起動時に一度だけ決める
//! （[`crate::strategy`]）。

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TransportError;
use crate::feedback::SheetKind;
use crate::intake::SelectedImage;

pub const CONFIG_PATH: &str = "/api/config";
pub const ANALYZE_PATH: &str = "/api/analyze-image";

/// multipart のファイルフィールド名
pub const IMAGE_FIELD: &str = "image";

/// /api/analyze-image のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// 画像1枚を解析してテキストを返す
#[async_trait(?Send)]
pub trait AnalysisTransport {
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError>;
}

/// フォーム内容をWebhookへ送信
#[async_trait(?Send)]
pub trait Submitter {
    async fn submit(&self, kind: SheetKind, payload: &Value) -> Result<(), TransportError>;
}

/// 起動時に選択された実装（本番 or デモ）
#[derive(Debug, Clone)]
pub enum Backend<L, D> {
    Live(L),
    Demo(D),
}

impl<L, D> Backend<L, D> {
    pub fn is_demo(&self) -> bool {
        matches!(self, Backend::Demo(_))
    }
}

#[async_trait(?Send)]
impl<L, D> AnalysisTransport for Backend<L, D>
where
    L: AnalysisTransport,
    D: AnalysisTransport,
{
    async fn analyze(&self, image: &SelectedImage) -> Result<String, TransportError> {
        match self {
            Backend::Live(live) => live.analyze(image).await,
            Backend::Demo(demo) => demo.analyze(image).await,
        }
    }
}

#[async_trait(?Send)]
impl<L, D> Submitter for Backend<L, D>
where
    L: Submitter,
    D: Submitter,
{
    async fn submit(&self, kind: SheetKind, payload: &Value) -> Result<(), TransportError> {
        match self {
            Backend::Live(live) => live.submit(kind, payload).await,
            Backend::Demo(demo) => demo.submit(kind, payload).await,
        }
    }
}

/// HTTPステータスの判定（2xx 以外はエラー）
pub fn check_status(status: u16) -> Result<(), TransportError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(TransportError::Status(status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_status() {
        assert!(check_status(200).is_ok());
        assert!(check_status(204).is_ok());
        assert_eq!(check_status(500), Err(TransportError::Status(500)));
        assert_eq!(check_status(302), Err(TransportError::Status(302)));
    }

    #[test]
    fn test_analyze_response_deserialize() {
        let response: AnalyzeResponse =
            serde_json::from_str(r#"{"analysis": "Warm tones\nCalm mood"}"#).unwrap();
        assert_eq!(response.analysis, "Warm tones\nCalm mood");
    }

    #[test]
    fn test_analyze_response_missing_field() {
        assert!(serde_json::from_str::<AnalyzeResponse>(r#"{"result": "x"}"#).is_err());
    }
}
