//! 画面全体で共有する状態
//!
//! セッション・バナー・プレビュー・起動時に選ばれた通信一式をシグナルで持つ。
//! すべて Copy なので各コンポーネントへそのまま渡せる。

use gloo::timers::callback::Timeout;
use image_insight_common::{
    AppConfig, ConfigLoad, NoticeBoard, NoticeKind, Session, SubmitError, TransportMode, NOTICE_TTL,
};
use leptos::prelude::*;

use crate::analytics::{self, BrowserTracker};
use crate::api::{load_server_config, Services};

/// ビルド時に同梱する設定
const BUNDLED_CONFIG: &str = include_str!("../config.json");

#[derive(Clone, Copy)]
pub struct AppContext {
    pub session: RwSignal<Session>,
    pub notices: RwSignal<NoticeBoard>,
    /// 選択画像のプレビュー（data URL）
    pub preview: RwSignal<Option<String>>,
    /// 設定の読み込みが終わるまでは None
    pub services: RwSignal<Option<Services>>,
    pub tracker: BrowserTracker,
}

impl AppContext {
    pub fn new() -> Self {
        Self {
            session: RwSignal::new(Session::new()),
            notices: RwSignal::new(NoticeBoard::default()),
            preview: RwSignal::new(None),
            services: RwSignal::new(None),
            tracker: analytics::tracker(),
        }
    }

    /// 設定を読み込んで通信方式を確定させる。完了後に `on_ready` を呼ぶ
    pub fn boot(self, on_ready: impl FnOnce(Self) + 'static) {
        wasm_bindgen_futures::spawn_local(async move {
            let load = load_config().await;
            let services = Services::build(&load);
            if services.plan.is_demo() {
                gloo::console::log!("Demo mode enabled - using mock responses");
            }
            let config = load.config();
            analytics::install_sdks(&config);
            self.tracker.init(&config);
            self.services.set(Some(services));
            on_ready(self);
        });
    }

    pub fn services(&self) -> Option<Services> {
        self.services.get_untracked()
    }

    /// バナーを先頭に追加し、一定時間後に消す
    pub fn notify(&self, kind: NoticeKind, message: impl Into<String>) {
        let Some(id) = self.notices.try_update(|board| board.push(kind, message)) else {
            return;
        };
        let notices = self.notices;
        Timeout::new(NOTICE_TTL.as_millis() as u32, move || {
            notices.update(|board| {
                board.dismiss(id);
            });
        })
        .forget();
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(NoticeKind::Error, message);
    }

    /// 送信結果をバナーへ
    pub fn report(&self, result: &Result<&'static str, SubmitError>) {
        match result {
            Ok(message) => self.notify(NoticeKind::Success, *message),
            Err(e) => self.error(e.user_message()),
        }
    }
}

impl Default for AppContext {
    fn default() -> Self {
        Self::new()
    }
}

/// 同梱設定を読み、server モードなら /api/config で補完する
pub async fn load_config() -> ConfigLoad {
    let config = match AppConfig::from_json(BUNDLED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            gloo::console::error!("Invalid bundled configuration:", e.to_string());
            return ConfigLoad::Unavailable;
        }
    };

    match config.mode {
        TransportMode::Direct => ConfigLoad::Loaded(config),
        TransportMode::Server => load_server_config(config).await,
    }
}

/// 現在時刻（ISO 8601）
pub fn now_iso() -> String {
    js_sys::Date::new_0().to_iso_string().into()
}
