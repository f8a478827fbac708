//! ページコンポーネント（解析ページ / アプリ案内ページ）

use image_insight_common::{events, TransportMode};
use leptos::prelude::*;
use serde_json::json;

use crate::analytics::BrowserTracker;
use crate::components::{
    analyze_button::AnalyzeButton,
    coming_soon::InterestForm,
    download_prompt::DownloadPrompt,
    header::Header,
    notices::Notices,
    results_panel::ResultsPanel,
    review_form::ReviewForm,
    upload_area::UploadArea,
};
use crate::state::{now_iso, AppContext};

/// 画面サイズ（"幅x高さ"）
fn screen_resolution() -> String {
    web_sys::window()
        .and_then(|w| w.screen().ok())
        .and_then(|s| Some(format!("{}x{}", s.width().ok()?, s.height().ok()?)))
        .unwrap_or_default()
}

fn track_page_view(tracker: &BrowserTracker) {
    let user_agent = web_sys::window()
        .and_then(|w| w.navigator().user_agent().ok())
        .unwrap_or_default();

    tracker.track(
        events::PAGE_VIEW,
        json!({
            "page": "main_landing",
            "timestamp": now_iso(),
            "user_agent": user_agent,
            "screen_resolution": screen_resolution(),
        }),
    );
}

/// 解析ページ
#[component]
pub fn App() -> impl IntoView {
    let ctx = AppContext::new();
    ctx.boot(|ctx| track_page_view(&ctx.tracker));

    let downstream = move || ctx.session.with(|s| s.view().downstream);
    // 直接モードはレビューフォーム、サーバモードはアプリ案内
    let is_direct = move || {
        ctx.services
            .with(|s| s.as_ref().map(|s| s.plan.mode == TransportMode::Direct))
            .unwrap_or(false)
    };

    view! {
        <div class="container">
            <Header />
            <Notices ctx=ctx />
            <UploadArea ctx=ctx />
            <AnalyzeButton ctx=ctx />
            <ResultsPanel ctx=ctx />

            <Show when=downstream>
                <Show
                    when=is_direct
                    fallback=move || view! { <DownloadPrompt ctx=ctx /> }
                >
                    <ReviewForm ctx=ctx />
                </Show>
            </Show>
        </div>
    }
}

/// アプリ案内ページ
#[component]
pub fn ComingSoon() -> impl IntoView {
    let ctx = AppContext::new();
    ctx.boot(|ctx| {
        ctx.tracker.track(
            events::APP_COMING_SOON_VISIT,
            json!({ "timestamp": now_iso() }),
        );
    });

    view! {
        <div class="container">
            <Header />
            <Notices ctx=ctx />
            <section class="coming-soon">
                <h2>"Our app is coming soon"</h2>
                <p class="text-muted">
                    "Leave your email and we'll let you know as soon as it's available."
                </p>
                <InterestForm ctx=ctx />
            </section>
        </div>
    }
}
