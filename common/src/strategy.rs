//! 起動時の実装選択（本番 / デモ）

use crate::config::{ConfigLoad, TransportMode};
use crate::feedback::SheetKind;
use crate::transport::Backend;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Live,
    Demo,
}

/// 解析・送信それぞれの実装選択
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    pub mode: TransportMode,
    pub analysis: Choice,
    pub submissions: Choice,
}

impl Plan {
    /// 設定の取得結果から決定する
    ///
    /// - 取得失敗: すべてデモ
    /// - direct: APIキー未設定なら解析をデモ、Webhook未設定なら送信をデモ
    /// - server: サーバ側が鍵を持つので本番
    pub fn from_load(load: &ConfigLoad) -> Self {
        match load {
            ConfigLoad::Unavailable => Self {
                mode: TransportMode::Server,
                analysis: Choice::Demo,
                submissions: Choice::Demo,
            },
            ConfigLoad::Loaded(config) => match config.mode {
                TransportMode::Direct => Self {
                    mode: TransportMode::Direct,
                    analysis: demo_if(config.api_key_unset()),
                    submissions: demo_if(config.webhook_unset()),
                },
                TransportMode::Server => Self {
                    mode: TransportMode::Server,
                    analysis: Choice::Live,
                    submissions: Choice::Live,
                },
            },
        }
    }

    pub fn is_demo(&self) -> bool {
        self.analysis == Choice::Demo || self.submissions == Choice::Demo
    }
}

fn demo_if(unset: bool) -> Choice {
    if unset {
        Choice::Demo
    } else {
        Choice::Live
    }
}

/// 選択に応じて実装を組み立てる
pub fn build<L, D>(choice: Choice, live: impl FnOnce() -> L, demo: impl FnOnce() -> D) -> Backend<L, D> {
    match choice {
        Choice::Live => Backend::Live(live()),
        Choice::Demo => Backend::Demo(demo()),
    }
}

/// server モードのフォーム送信先
pub fn submit_path(kind: SheetKind) -> &'static str {
    match kind {
        SheetKind::Reviews => "/api/submit-review",
        SheetKind::AppInterest => "/api/submit-app-interest",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn direct(key: Option<&str>, webhook: Option<&str>) -> ConfigLoad {
        ConfigLoad::Loaded(AppConfig {
            mode: TransportMode::Direct,
            openai_api_key: key.map(String::from),
            sheets_webhook_url: webhook.map(String::from),
            ..Default::default()
        })
    }

    #[test]
    fn test_unavailable_is_full_demo() {
        let plan = Plan::from_load(&ConfigLoad::Unavailable);
        assert_eq!(plan.analysis, Choice::Demo);
        assert_eq!(plan.submissions, Choice::Demo);
    }

    #[test]
    fn test_direct_placeholders_are_demo() {
        let plan = Plan::from_load(&direct(
            Some("sk-your-openai-api-key-here"),
            Some("https://script.google.com/macros/s/YOUR_SCRIPT_ID/exec"),
        ));
        assert_eq!(plan.analysis, Choice::Demo);
        assert_eq!(plan.submissions, Choice::Demo);
    }

    #[test]
    fn test_direct_independent_choices() {
        let plan = Plan::from_load(&direct(Some("sk-live"), None));
        assert_eq!(plan.analysis, Choice::Live);
        assert_eq!(plan.submissions, Choice::Demo);
        assert!(plan.is_demo());
    }

    #[test]
    fn test_server_loaded_is_live() {
        let plan = Plan::from_load(&ConfigLoad::Loaded(AppConfig::default()));
        assert_eq!(plan.mode, TransportMode::Server);
        assert!(!plan.is_demo());
    }

    #[test]
    fn test_build() {
        let backend: Backend<u8, &str> = build(Choice::Demo, || 1, || "demo");
        assert!(backend.is_demo());
        let backend: Backend<u8, &str> = build(Choice::Live, || 1, || "demo");
        assert!(matches!(backend, Backend::Live(1)));
    }

    #[test]
    fn test_submit_path() {
        assert_eq!(submit_path(SheetKind::Reviews), "/api/submit-review");
        assert_eq!(submit_path(SheetKind::AppInterest), "/api/submit-app-interest");
    }
}
