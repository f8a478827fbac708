//! レビュー・アプリ案内登録フォームの送信

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::analytics::{events, AnalyticsSink, Tracker};
use crate::error::SubmitError;
use crate::notice::NoticeBoard;
use crate::transport::Submitter;

pub const REVIEW_THANKS: &str = "Thank you for your feedback!";
pub const INTEREST_THANKS: &str = "Thanks! We'll let you know when the app is ready.";
pub use crate::error::SUBMIT_FAILED_MESSAGE;

/// 送信先シート
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKind {
    Reviews,
    AppInterest,
}

impl SheetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetKind::Reviews => "reviews",
            SheetKind::AppInterest => "app_interest",
        }
    }
}

/// Webhook URLに type クエリを付与
pub fn webhook_url(base: &str, kind: SheetKind) -> String {
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}type={}", base, separator, kind.as_str())
}

/// 解析後のレビュー
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub rating: u8,
    pub comments: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// 直近の解析結果
    pub analysis: String,
    pub timestamp: String,
}

/// アプリ公開通知の登録
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestSubmission {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default)]
    pub comments: String,
    pub timestamp: String,
}

impl ReviewSubmission {
    pub fn validate(&self) -> Result<(), SubmitError> {
        if !(1..=5).contains(&self.rating) {
            return Err(SubmitError::InvalidRating(self.rating));
        }
        Ok(())
    }
}

impl InterestSubmission {
    pub fn validate(&self) -> Result<(), SubmitError> {
        if self.email.trim().is_empty() {
            return Err(SubmitError::MissingField("email"));
        }
        Ok(())
    }
}

/// 空文字を None に
pub fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// 送信結果をバナーへ反映
pub fn report(result: &Result<&'static str, SubmitError>, notices: &mut NoticeBoard) {
    match result {
        Ok(message) => notices.success(*message),
        Err(e) => notices.error(e.user_message()),
    };
}

/// レビュー送信。成功時のメッセージを返す（呼び出し側でフォームをリセット）
pub async fn submit_review<T, S>(
    submitter: &T,
    review: &ReviewSubmission,
    tracker: &Tracker<S>,
) -> Result<&'static str, SubmitError>
where
    T: Submitter + ?Sized,
    S: AnalyticsSink,
{
    review.validate()?;

    let payload = serde_json::to_value(review).map_err(|e| SubmitError::Encode(e.to_string()))?;
    submitter
        .submit(SheetKind::Reviews, &payload)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "review submission failed"))?;

    tracker.track(events::REVIEW_SUBMITTED, json!({ "rating": review.rating }));
    Ok(REVIEW_THANKS)
}

/// アプリ案内登録
pub async fn submit_interest<T, S>(
    submitter: &T,
    interest: &InterestSubmission,
    tracker: &Tracker<S>,
) -> Result<&'static str, SubmitError>
where
    T: Submitter + ?Sized,
    S: AnalyticsSink,
{
    interest.validate()?;

    let payload = serde_json::to_value(interest).map_err(|e| SubmitError::Encode(e.to_string()))?;
    submitter
        .submit(SheetKind::AppInterest, &payload)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "app interest submission failed"))?;

    tracker.track(
        events::EMAIL_SIGNUP,
        json!({ "platform": interest.platform.clone().unwrap_or_default() }),
    );
    Ok(INTEREST_THANKS)
}
