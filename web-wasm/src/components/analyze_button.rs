//! 解析ボタン

use image_insight_common::AnalysisTransport;
use leptos::prelude::*;

use crate::state::AppContext;

#[component]
pub fn AnalyzeButton(ctx: AppContext) -> impl IntoView {
    let enabled = move || ctx.session.with(|s| s.view().trigger_enabled);
    let is_analyzing = move || ctx.session.with(|s| s.is_analyzing());

    view! {
        <div class="analyze-controls">
            <button
                class="btn btn-primary"
                disabled=move || !enabled()
                on:click=move |_| run_analysis(ctx)
            >
                {move || if is_analyzing() { "Analyzing..." } else { "Analyze Image" }}
            </button>
        </div>
    }
}

/// 開始 → 通信1回 → 完了。シグナルは await の前後でだけ更新する
fn run_analysis(ctx: AppContext) {
    let Some(services) = ctx.services() else {
        ctx.error("Still loading, please try again in a moment.");
        return;
    };

    let image = match ctx.session.try_update(|s| s.begin_analysis(&ctx.tracker)) {
        Some(Ok(image)) => image,
        Some(Err(e)) => {
            ctx.error(e.user_message());
            return;
        }
        None => return,
    };

    wasm_bindgen_futures::spawn_local(async move {
        let outcome = services.analyzer.analyze(&image).await;
        let result = ctx
            .session
            .try_update(|s| s.finish_analysis(outcome, &ctx.tracker));
        if let Some(Err(e)) = result {
            ctx.error(e.user_message());
        }
    });
}
