//! アプリ案内への誘導（サーバモード）

use gloo::timers::callback::Timeout;
use image_insight_common::events;
use leptos::prelude::*;
use serde_json::json;

use crate::state::AppContext;
use crate::COMING_SOON_PATH;

/// 遷移前に計測イベントを送り切るための待ち時間
const NAVIGATE_DELAY_MS: u32 = 200;

#[component]
pub fn DownloadPrompt(ctx: AppContext) -> impl IntoView {
    let on_click = move |_| {
        ctx.tracker.track(
            events::DOWNLOAD_APP_CLICK,
            json!({
                "source": "main_page",
                "user_completed_analysis": ctx.session.with_untracked(|s| s.analysis().is_some()),
            }),
        );

        Timeout::new(NAVIGATE_DELAY_MS, || {
            if let Some(window) = web_sys::window() {
                if let Err(e) = window.location().set_href(COMING_SOON_PATH) {
                    gloo::console::error!("Navigation failed:", e);
                }
            }
        })
        .forget();
    };

    view! {
        <section class="download-section">
            <h3>"Want deeper insights?"</h3>
            <p>"Get personalised palettes and style tips in our app."</p>
            <button class="btn btn-primary" on:click=on_click>
                "Download the App"
            </button>
        </section>
    }
}
