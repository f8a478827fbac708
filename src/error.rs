use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTPクライアントエラー: {0}")]
    Http(#[from] reqwest::Error),

    #[error("入力エラー: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error(transparent)]
    Intake(#[from] image_insight_common::IntakeError),

    #[error(transparent)]
    Analyze(#[from] image_insight_common::AnalyzeError),

    #[error(transparent)]
    Submit(#[from] image_insight_common::SubmitError),

    #[error(transparent)]
    Common(#[from] image_insight_common::Error),
}

pub type Result<T> = std::result::Result<T, InsightError>;
