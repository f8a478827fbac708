//! CLIの処理フロー
//!
//! 画面の代わりに標準出力へ表示する。解析・送信の手順は共通ライブラリの
//! Session / feedback をそのまま使う。

use crate::error::Result;
use crate::http::{build_backends, load_server_config, Analyzer, FormSender};
use crate::intake::load_image;
use dialoguer::{Input, Select};
use image_insight_common::feedback::{self, non_empty};
use image_insight_common::{
    analyze, AnalyticsSink, AppConfig, ConfigLoad, InterestSubmission, NoticeBoard, NoticeKind,
    Plan, ReviewSubmission, Session, Tracker, TransportMode,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// 実行時の設定上書き
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: Option<TransportMode>,
    pub server: Option<String>,
    pub demo: bool,
}

/// 設定を確定させる（server モードでは /api/config を取得）
pub async fn resolve_config(client: &reqwest::Client, mut config: AppConfig, overrides: &Overrides) -> ConfigLoad {
    if overrides.demo {
        return ConfigLoad::Unavailable;
    }
    if let Some(mode) = overrides.mode {
        config.mode = mode;
    }
    if let Some(server) = &overrides.server {
        config.server_base_url = server.clone();
    }

    match config.mode {
        TransportMode::Direct => ConfigLoad::Loaded(config),
        TransportMode::Server => load_server_config(client, config).await,
    }
}

pub struct Runtime<S> {
    pub plan: Plan,
    pub analyzer: Analyzer,
    pub sender: FormSender,
    pub tracker: Tracker<S>,
}

impl<S: AnalyticsSink> Runtime<S> {
    pub fn new(client: &reqwest::Client, load: &ConfigLoad, tracker: Tracker<S>) -> Self {
        let (plan, analyzer, sender) = build_backends(client, load);
        if plan.is_demo() {
            tracing::info!("demo mode enabled - using mock responses");
        }
        tracker.init(&load.config());
        Self { plan, analyzer, sender, tracker }
    }
}

/// バナーを表示して即座に片付ける
pub fn flush_notices(notices: &mut NoticeBoard) {
    let pending: Vec<_> = notices.items().iter().rev().cloned().collect();
    for notice in pending {
        match notice.kind {
            NoticeKind::Success => println!("✔ {}", notice.message),
            NoticeKind::Error => eprintln!("✖ {}", notice.message),
        }
        notices.dismiss(notice.id);
    }
}

fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

pub fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// 画像を1枚解析して表示。成功時は解析テキストを返す
pub async fn run_analyze<S: AnalyticsSink>(
    runtime: &Runtime<S>,
    session: &mut Session,
    path: &Path,
    notices: &mut NoticeBoard,
) -> Result<Option<String>> {
    let file = match load_image(path) {
        Ok(file) => file,
        Err(e) => {
            notices.error(e.to_string());
            return Err(e);
        }
    };
    session.mark_selecting();
    if let Err(e) = session.handle_file(file, &runtime.tracker) {
        notices.error(e.to_string());
        return Err(e.into());
    }

    let bar = spinner("Analyzing your image...");
    let result = analyze(session, &runtime.analyzer, &runtime.tracker).await;
    bar.finish_and_clear();

    match result {
        Ok(text) => {
            println!("Your Color Analysis Results\n");
            println!("{}\n", text);
            Ok(Some(text))
        }
        Err(e) => {
            notices.error(e.user_message());
            Err(e.into())
        }
    }
}

/// 評価とコメントを対話入力
pub fn prompt_review(analysis: &str) -> Result<ReviewSubmission> {
    let ratings = ["5 - Excellent", "4 - Good", "3 - Okay", "2 - Poor", "1 - Bad"];
    let index = Select::new()
        .with_prompt("How accurate was the analysis?")
        .items(&ratings)
        .default(0)
        .interact()?;
    let comments: String = Input::new()
        .with_prompt("Comments")
        .allow_empty(true)
        .interact_text()?;
    let email: String = Input::new()
        .with_prompt("Email (optional)")
        .allow_empty(true)
        .interact_text()?;

    Ok(ReviewSubmission {
        rating: 5 - index as u8,
        comments,
        email: non_empty(&email),
        analysis: analysis.to_string(),
        timestamp: timestamp(),
    })
}

pub async fn run_review<S: AnalyticsSink>(
    runtime: &Runtime<S>,
    review: &ReviewSubmission,
    notices: &mut NoticeBoard,
) -> Result<()> {
    let bar = spinner("Submitting...");
    let result = feedback::submit_review(&runtime.sender, review, &runtime.tracker).await;
    bar.finish_and_clear();

    feedback::report(&result, notices);
    result.map(|_| ()).map_err(Into::into)
}

pub async fn run_interest<S: AnalyticsSink>(
    runtime: &Runtime<S>,
    interest: &InterestSubmission,
    notices: &mut NoticeBoard,
) -> Result<()> {
    let bar = spinner("Submitting...");
    let result = feedback::submit_interest(&runtime.sender, interest, &runtime.tracker).await;
    bar.finish_and_clear();

    feedback::report(&result, notices);
    result.map(|_| ()).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_notices_dismisses_all() {
        let mut notices = NoticeBoard::default();
        notices.success("ok");
        notices.error("ng");
        flush_notices(&mut notices);
        assert!(notices.is_empty());
    }

    #[tokio::test]
    async fn test_resolve_config_demo_override() {
        let overrides = Overrides { demo: true, ..Default::default() };
        let load = resolve_config(&reqwest::Client::new(), AppConfig::default(), &overrides).await;
        assert_eq!(load, ConfigLoad::Unavailable);
    }

    #[tokio::test]
    async fn test_resolve_config_direct_skips_fetch() {
        let overrides = Overrides {
            mode: Some(TransportMode::Direct),
            ..Default::default()
        };
        let load = resolve_config(&reqwest::Client::new(), AppConfig::default(), &overrides).await;
        assert!(load.is_available());
        assert_eq!(load.config().mode, TransportMode::Direct);
    }

    #[test]
    fn test_timestamp_is_rfc3339() {
        let ts = timestamp();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
