//! ヘッダーコンポーネント

use leptos::prelude::*;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header class="header">
            <h1>"Image Insight"</h1>
            <p class="subtitle">"Upload a photo and get an AI color & style analysis"</p>
        </header>
    }
}
