use crate::error::{InsightError, Result};
use image_insight_common::{AppConfig, TransportMode};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const WEBHOOK_ENV: &str = "GOOGLE_SHEETS_URL";

/// CLIの設定ファイル（~/.config/image-insight/config.json）
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    pub app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_config()
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.apply_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(WEBHOOK_ENV).ok(),
        ))
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_json(&content)
        } else {
            Ok(Self::default_config())
        }
    }

    /// `mode` の無いファイルは direct として読む（CLIにはサーバの既定URLが無いため）
    pub fn from_json(content: &str) -> Result<Self> {
        let mut raw: serde_json::Value = serde_json::from_str(content)?;
        if let Some(fields) = raw.as_object_mut() {
            fields
                .entry("mode")
                .or_insert_with(|| serde_json::Value::String("direct".into()));
        }

        let app: AppConfig = serde_json::from_value(raw)?;
        app.validate()?;
        Ok(Self { app })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| InsightError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("image-insight").join("config.json"))
    }

    fn default_config() -> Self {
        Self {
            app: AppConfig {
                mode: TransportMode::Direct,
                ..Default::default()
            },
        }
    }

    /// 環境変数の値を優先（空文字は無視）
    pub fn apply_overrides(mut self, api_key: Option<String>, webhook: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.app.openai_api_key = Some(key);
        }
        if let Some(url) = webhook.filter(|u| !u.trim().is_empty()) {
            self.app.sheets_webhook_url = Some(url);
        }
        self
    }

    pub fn set_api_key(&mut self, key: String) {
        self.app.openai_api_key = Some(key);
    }

    pub fn set_webhook(&mut self, url: String) {
        self.app.sheets_webhook_url = Some(url);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_direct() {
        let config = Config::default();
        assert_eq!(config.app.mode, TransportMode::Direct);
        assert!(config.app.api_key_unset());
    }

    #[test]
    fn test_from_json_without_mode_is_direct() {
        let config = Config::from_json(r#"{"OPENAI_API_KEY": "sk-live"}"#).unwrap();
        assert_eq!(config.app.mode, TransportMode::Direct);

        let config = Config::from_json(r#"{"mode": "server"}"#).unwrap();
        assert_eq!(config.app.mode, TransportMode::Server);
    }

    #[test]
    fn test_overrides_skip_blank() {
        let config = Config::default().apply_overrides(Some("  ".into()), Some("https://hooks.example.com".into()));
        assert!(config.app.openai_api_key.is_none());
        assert_eq!(config.app.webhook_url(), Some("https://hooks.example.com"));
    }
}
