//! OpenAI Chat Completions（Vision）のリクエスト/レスポンス型
//!
//! HTTP呼び出し自体は各プラットフォーム側（fetch / reqwest）で行う。

use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::TransportError;
use crate::intake::SelectedImage;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Chat Completions リクエスト
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
pub struct ImageUrl {
    pub url: String,
}

/// Chat Completions レスポンス
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatRequest {
    /// プロンプトと画像（インラインData URL）から1メッセージのリクエストを作成
    pub fn vision(model: &str, prompt: &str, image: &SelectedImage, max_tokens: u32) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![Message {
                role: "user",
                content: vec![
                    ContentPart::Text { text: prompt.to_string() },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image.data_url() },
                    },
                ],
            }],
            max_tokens,
        }
    }

    pub fn from_config(config: &AppConfig, image: &SelectedImage) -> Self {
        Self::vision(&config.model, &config.analysis_prompt, image, config.max_tokens)
    }
}

impl ChatResponse {
    /// 最初の choice のテキスト
    pub fn first_text(self) -> Result<String, TransportError> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(TransportError::EmptyResponse)
    }
}

/// Authorization ヘッダ値
pub fn bearer(api_key: &str) -> String {
    format!("Bearer {}", api_key)
}
