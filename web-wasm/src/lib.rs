//! Image Insight Web App (Leptos + WASM)

mod analytics;
mod api;
mod app;
mod components;
mod state;
mod timer;

pub use analytics::{install_sdks, BrowserSink};
pub use timer::GlooSleep;

use wasm_bindgen::prelude::*;

/// アプリ案内ページのパス
pub const COMING_SOON_PATH: &str = "/app-coming-soon.html";

#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();

    let path = web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_default();

    if path.ends_with(COMING_SOON_PATH) {
        leptos::mount::mount_to_body(app::ComingSoon);
    } else {
        leptos::mount::mount_to_body(app::App);
    }
}
