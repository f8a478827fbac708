//! 一時表示バナー

use leptos::prelude::*;

use crate::state::AppContext;

#[component]
pub fn Notices(ctx: AppContext) -> impl IntoView {
    view! {
        <div class="notices">
            <For
                each=move || ctx.notices.with(|board| board.items().to_vec())
                key=|notice| notice.id
                children=move |notice| {
                    let id = notice.id;
                    view! {
                        <div
                            class=notice.kind.css_class()
                            on:click=move |_| {
                                ctx.notices.update(|board| {
                                    board.dismiss(id);
                                });
                            }
                        >
                            {notice.message}
                        </div>
                    }
                }
            />
        </div>
    }
}
