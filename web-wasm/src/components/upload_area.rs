//! アップロードエリアコンポーネント

use image_insight_common::intake::validate;
use image_insight_common::{ImageFile, TransportError};
use leptos::html::Input;
use leptos::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{DragEvent, File};

use crate::api::js_error;
use crate::state::AppContext;

#[component]
pub fn UploadArea(ctx: AppContext) -> impl IntoView {
    let (is_dragover, set_is_dragover) = signal(false);
    let input_ref = NodeRef::<Input>::new();

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);

        let file = ev
            .data_transfer()
            .and_then(|dt| dt.files())
            .and_then(|files| files.get(0));
        if let Some(file) = file {
            accept_file(ctx, file);
        }
    };

    let on_dragover = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(true);
    };

    let on_dragleave = move |ev: DragEvent| {
        ev.prevent_default();
        set_is_dragover.set(false);
    };

    // ファイル選択ダイアログを開く
    let on_click = move |_| {
        if let Some(input) = input_ref.get() {
            input.click();
        }
    };

    let on_change = move |_| {
        let Some(input) = input_ref.get() else {
            return;
        };
        if let Some(file) = input.files().and_then(|files| files.get(0)) {
            accept_file(ctx, file);
        }
        // 同じファイルを選び直しても change が発火するように
        input.set_value("");
    };

    view! {
        <div
            class=move || {
                if is_dragover.get() { "upload-area dragover" } else { "upload-area" }
            }
            on:drop=on_drop
            on:dragover=on_dragover
            on:dragleave=on_dragleave
            on:click=on_click
        >
            <input
                type="file"
                accept="image/*"
                style="display: none"
                node_ref=input_ref
                on:change=on_change
            />
            <Show
                when=move || ctx.preview.with(Option::is_some)
                fallback=|| view! {
                    <div class="upload-icon">"📷"</div>
                    <p>"Drag & drop an image here, or click to choose one"</p>
                    <p class="text-muted">"Images up to 10MB"</p>
                }
            >
                <div class="image-preview">
                    <img src=move || ctx.preview.get().unwrap_or_default() alt="Uploaded image" />
                </div>
            </Show>
        </div>
    }
}

/// 種別・サイズはメタデータで先に検証し、通過したものだけ読み込む
fn accept_file(ctx: AppContext, file: File) {
    if let Err(e) = validate(&file.type_(), file.size() as u64) {
        ctx.error(e.to_string());
        return;
    }

    ctx.session.update(|s| s.mark_selecting());
    wasm_bindgen_futures::spawn_local(async move {
        let image = match read_file(&file).await {
            Ok(image) => image,
            Err(e) => {
                gloo::console::error!("Failed to read file:", e.to_string());
                ctx.session.update(|s| s.abort_selecting());
                ctx.error("Could not read the selected file.");
                return;
            }
        };

        let result = ctx
            .session
            .try_update(|s| s.handle_file(image, &ctx.tracker).map(|img| img.data_url()));
        match result {
            Some(Ok(data_url)) => ctx.preview.set(Some(data_url)),
            Some(Err(e)) => ctx.error(e.to_string()),
            None => {}
        }
    });
}

async fn read_file(file: &File) -> Result<ImageFile, TransportError> {
    let buffer = JsFuture::from(file.array_buffer()).await.map_err(js_error)?;
    let bytes = js_sys::Uint8Array::new(&buffer).to_vec();
    Ok(ImageFile::new(file.name(), file.type_(), bytes))
}
