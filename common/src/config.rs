//! 設定レコード
//!
//! APIキー・Webhook URL・解析IDとプロンプトを保持する。起動時に一度だけ
//! 組み立て、以降は読み取り専用のスナップショットとして各コンポーネントへ渡す。

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// 例示用設定に含まれるプレースホルダ値（この値のままなら未設定とみなす）
pub const PLACEHOLDERS: &[&str] = &[
    "sk-your-openai-api-key-here",
    "your-openai-api-key-here",
    "https://script.google.com/macros/s/YOUR_SCRIPT_ID/exec",
    "https://hooks.zapier.com/hooks/catch/YOUR_WEBHOOK_ID/",
    "1234567890123456",
    "abcd1234",
];

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

pub const DEFAULT_PROMPT: &str = "Analyze this image comprehensively and provide insights about:

1. Color Composition: Describe the dominant colors, color harmony, and palette analysis
2. Mood & Atmosphere: What emotions or feelings does the image convey?
3. Visual Elements: Composition, lighting, focal points, and artistic techniques
4. Style Analysis: Art style, photographic technique, or design approach
5. Aesthetic Quality: Overall visual impact and artistic merit

Please provide a detailed but accessible analysis that would be valuable for someone interested in understanding their image better. Keep the tone engaging and informative.";

/// 解析結果の取得方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportMode {
    /// ブラウザ（またはCLI）から直接ビジョンAPIを呼ぶ
    Direct,
    /// バックエンドの /api/analyze-image 経由
    #[default]
    Server,
}

/// 値が未設定（空・プレースホルダ）かどうか
pub fn is_unset(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") => true,
        Some(v) => PLACEHOLDERS.contains(&v),
    }
}

/// アプリケーション設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(rename = "OPENAI_API_KEY", skip_serializing_if = "Option::is_none")]
    pub openai_api_key: Option<String>,

    #[serde(rename = "GOOGLE_SHEETS_URL", skip_serializing_if = "Option::is_none")]
    pub sheets_webhook_url: Option<String>,

    #[serde(rename = "FB_PIXEL_ID")]
    pub fb_pixel_id: Option<String>,

    #[serde(rename = "CLARITY_ID")]
    pub clarity_id: Option<String>,

    #[serde(rename = "ANALYSIS_PROMPT")]
    pub analysis_prompt: String,

    pub mode: TransportMode,
    pub model: String,
    pub max_tokens: u32,

    /// server モード時のベースURL（ブラウザでは空 = 同一オリジン）
    pub server_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            sheets_webhook_url: None,
            fb_pixel_id: None,
            clarity_id: None,
            analysis_prompt: DEFAULT_PROMPT.to_string(),
            mode: TransportMode::default(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            server_base_url: String::new(),
        }
    }
}

/// /api/config のレスポンス
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(rename = "FB_PIXEL_ID", default)]
    pub fb_pixel_id: Option<String>,
    #[serde(rename = "CLARITY_ID", default)]
    pub clarity_id: Option<String>,
}

/// 起動時の設定取得結果
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigLoad {
    Loaded(AppConfig),
    /// 取得失敗。部分的なレコードは全項目欠落として扱う
    Unavailable,
}

impl ConfigLoad {
    pub fn config(&self) -> AppConfig {
        match self {
            ConfigLoad::Loaded(config) => config.clone(),
            ConfigLoad::Unavailable => AppConfig::default(),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, ConfigLoad::Loaded(_))
    }
}

impl AppConfig {
    /// JSON文字列から読み込む（同梱設定・設定ファイル共通）
    pub fn from_json(json: &str) -> Result<Self> {
        let config: AppConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis_prompt.trim().is_empty() {
            return Err(Error::Config("ANALYSIS_PROMPT is empty".into()));
        }
        if self.max_tokens == 0 {
            return Err(Error::Config("max_tokens must be positive".into()));
        }
        Ok(())
    }

    /// サーバから取得した解析IDをマージ
    pub fn merge_server(&mut self, server: ServerConfig) {
        self.fb_pixel_id = server.fb_pixel_id;
        self.clarity_id = server.clarity_id;
    }

    pub fn api_key(&self) -> Option<&str> {
        self.openai_api_key.as_deref().filter(|_| !self.api_key_unset())
    }

    pub fn webhook_url(&self) -> Option<&str> {
        self.sheets_webhook_url.as_deref().filter(|_| !self.webhook_unset())
    }

    pub fn pixel_id(&self) -> Option<&str> {
        self.fb_pixel_id
            .as_deref()
            .filter(|v| !is_unset(Some(v)))
    }

    pub fn clarity_id(&self) -> Option<&str> {
        self.clarity_id
            .as_deref()
            .filter(|v| !is_unset(Some(v)))
    }

    pub fn api_key_unset(&self) -> bool {
        is_unset(self.openai_api_key.as_deref())
    }

    pub fn webhook_unset(&self) -> bool {
        is_unset(self.sheets_webhook_url.as_deref())
    }

    /// server モードのエンドポイントURL
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.server_base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analytics_ids_skip_placeholders() {
        let config = AppConfig {
            fb_pixel_id: Some("1234567890123456".into()),
            clarity_id: Some("abcd1234".into()),
            ..Default::default()
        };
        assert_eq!(config.pixel_id(), None);
        assert_eq!(config.clarity_id(), None);

        let config = AppConfig {
            fb_pixel_id: Some("987".into()),
            clarity_id: Some("xyz".into()),
            ..Default::default()
        };
        assert_eq!(config.pixel_id(), Some("987"));
        assert_eq!(config.clarity_id(), Some("xyz"));
    }

    #[test]
    fn test_is_unset() {
        assert!(is_unset(None));
        assert!(is_unset(Some("")));
        assert!(is_unset(Some("   ")));
        assert!(is_unset(Some("sk-your-openai-api-key-here")));
        assert!(is_unset(Some("https://script.google.com/macros/s/YOUR_SCRIPT_ID/exec")));
        assert!(!is_unset(Some("sk-live-abc")));
    }

    #[test]
    fn test_from_json_uppercase_keys() {
        let json = r#"{
            "OPENAI_API_KEY": "sk-live-abc",
            "GOOGLE_SHEETS_URL": "https://hooks.example.com/x",
            "FB_PIXEL_ID": "999",
            "CLARITY_ID": "cl1",
            "ANALYSIS_PROMPT": "Describe the colours",
            "mode": "direct"
        }"#;
        let config = AppConfig::from_json(json).unwrap();
        assert_eq!(config.api_key(), Some("sk-live-abc"));
        assert_eq!(config.webhook_url(), Some("https://hooks.example.com/x"));
        assert_eq!(config.analysis_prompt, "Describe the colours");
        assert_eq!(config.mode, TransportMode::Direct);
        // 未指定項目はデフォルト
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, DEFAULT_MAX_TOKENS);
    }

    #[test]
    fn test_placeholder_key_is_hidden() {
        let config = AppConfig {
            openai_api_key: Some("sk-your-openai-api-key-here".into()),
            ..Default::default()
        };
        assert!(config.api_key_unset());
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_empty_prompt_rejected() {
        let err = AppConfig::from_json(r#"{"ANALYSIS_PROMPT": " "}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_merge_server_config() {
        let mut config = AppConfig::default();
        let server: ServerConfig =
            serde_json::from_str(r#"{"FB_PIXEL_ID": "42", "CLARITY_ID": null}"#).unwrap();
        config.merge_server(server);
        assert_eq!(config.pixel_id(), Some("42"));
        assert_eq!(config.clarity_id, None);
    }

    #[test]
    fn test_unavailable_load_is_absent() {
        let load = ConfigLoad::Unavailable;
        assert!(!load.is_available());
        let config = load.config();
        assert!(config.api_key_unset());
        assert!(config.webhook_unset());
        assert_eq!(config.pixel_id(), None);
    }

    #[test]
    fn test_endpoint_join() {
        let mut config = AppConfig::default();
        assert_eq!(config.endpoint("/api/config"), "/api/config");
        config.server_base_url = "http://localhost:3000/".into();
        assert_eq!(config.endpoint("/api/analyze-image"), "http://localhost:3000/api/analyze-image");
    }
}
