//! 解析結果エリア

use leptos::prelude::*;

use crate::state::AppContext;

#[component]
pub fn ResultsPanel(ctx: AppContext) -> impl IntoView {
    let view_state = move || ctx.session.with(|s| s.view());

    view! {
        <Show when=move || view_state().results_section>
            <section class="results-section">
                <h2>"Your Color Analysis Results"</h2>
                <Show when=move || view_state().loading>
                    <div class="loading-spinner">
                        <div class="spinner"></div>
                        <p>"Analyzing your image..."</p>
                    </div>
                </Show>
                <Show when=move || view_state().result>
                    // エスケープ済みのテキストを改行だけ <br> に置き換えたもの
                    <div
                        class="analysis-results"
                        inner_html=move || ctx.session.with(|s| s.result_html()).unwrap_or_default()
                    ></div>
                </Show>
            </section>
        </Show>
    }
}
