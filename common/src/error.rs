//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

/// ファイル受付時の入力検証エラー（ネットワーク呼び出し前に確定する）
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IntakeError {
    #[error("Please select a valid image file.")]
    NotAnImage { mime: String },

    #[error("File size must be less than 10MB.")]
    TooLarge { size: u64 },
}

/// リモート呼び出しのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("Server error: {0}")]
    Status(u16),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Empty response")]
    EmptyResponse,
}

/// 解析フローのエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyzeError {
    #[error("Please select an image first.")]
    NoSelection,

    #[error("An analysis is already running.")]
    InFlight,

    #[error("analysis failed: {0}")]
    Transport(#[from] TransportError),
}

pub const ANALYSIS_FAILED_MESSAGE: &str =
    "Sorry, there was an error analyzing your image. Please try again.";

impl AnalyzeError {
    /// バナーに表示する文言（通信エラーの詳細は表示しない）
    pub fn user_message(&self) -> String {
        match self {
            AnalyzeError::Transport(_) => ANALYSIS_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

pub const SUBMIT_FAILED_MESSAGE: &str =
    "Sorry, there was an error submitting your feedback. Please try again.";

/// フォーム送信のエラー
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("Rating must be between 1 and 5 (got {0})")]
    InvalidRating(u8),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("could not encode payload: {0}")]
    Encode(String),

    #[error("submission failed: {0}")]
    Transport(#[from] TransportError),
}

impl SubmitError {
    /// バナー表示用。入力エラーはそのまま、通信エラーは定型文
    pub fn user_message(&self) -> String {
        match self {
            SubmitError::InvalidRating(_) | SubmitError::MissingField(_) => self.to_string(),
            SubmitError::Encode(_) | SubmitError::Transport(_) => SUBMIT_FAILED_MESSAGE.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_json() {
        let json_error = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let error = Error::Json(json_error);
        assert!(format!("{}", error).contains("JSON error"));
    }

    #[test]
    fn test_error_display_config() {
        let error = Error::Config("missing prompt".to_string());
        assert_eq!(format!("{}", error), "Config error: missing prompt");
    }

    #[test]
    fn test_intake_messages_are_user_facing() {
        let err = IntakeError::NotAnImage { mime: "text/plain".into() };
        assert_eq!(err.to_string(), "Please select a valid image file.");

        let err = IntakeError::TooLarge { size: 11 * 1024 * 1024 };
        assert_eq!(err.to_string(), "File size must be less than 10MB.");
    }

    #[test]
    fn test_transport_error_hidden_from_user() {
        let err = AnalyzeError::from(TransportError::Status(500));
        assert_eq!(err.user_message(), ANALYSIS_FAILED_MESSAGE);
        // ログ用には詳細を保持
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_no_selection_message() {
        assert_eq!(AnalyzeError::NoSelection.user_message(), "Please select an image first.");
    }

    #[test]
    fn test_submit_error_messages() {
        assert_eq!(
            SubmitError::MissingField("email").user_message(),
            "email is required"
        );
        assert_eq!(
            SubmitError::from(TransportError::Network("offline".into())).user_message(),
            SUBMIT_FAILED_MESSAGE
        );
    }

    #[test]
    fn test_json_error_converts() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(err, Error::Json(_)));
    }
}
