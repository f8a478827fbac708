//! アプリ公開通知の登録フォーム

use image_insight_common::feedback::{self, non_empty};
use image_insight_common::InterestSubmission;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::state::{now_iso, AppContext};

const PLATFORMS: &[(&str, &str)] = &[("", "Select platform"), ("ios", "iOS"), ("android", "Android"), ("both", "Both")];

#[component]
pub fn InterestForm(ctx: AppContext) -> impl IntoView {
    let (email, set_email) = signal(String::new());
    let (name, set_name) = signal(String::new());
    let (platform, set_platform) = signal(String::new());
    let (comments, set_comments) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(services) = ctx.services() else {
            return;
        };

        let interest = InterestSubmission {
            email: email.get_untracked(),
            name: non_empty(&name.get_untracked()),
            platform: non_empty(&platform.get_untracked()),
            comments: comments.get_untracked(),
            timestamp: now_iso(),
        };

        set_submitting.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            let result = feedback::submit_interest(&services.sender, &interest, &ctx.tracker).await;
            ctx.report(&result);
            if result.is_ok() {
                set_email.set(String::new());
                set_name.set(String::new());
                set_platform.set(String::new());
                set_comments.set(String::new());
            }
            set_submitting.set(false);
        });
    };

    view! {
        <form class="interest-form" on:submit=on_submit>
            <input
                type="email"
                required=true
                placeholder="Email"
                prop:value=email
                on:input=move |ev| set_email.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Name (optional)"
                prop:value=name
                on:input=move |ev| set_name.set(event_target_value(&ev))
            />
            <select
                prop:value=platform
                on:change=move |ev| set_platform.set(event_target_value(&ev))
            >
                {PLATFORMS
                    .iter()
                    .map(|(value, label)| view! { <option value=*value>{*label}</option> })
                    .collect_view()}
            </select>
            <textarea
                placeholder="Anything you'd like to see in the app?"
                prop:value=comments
                on:input=move |ev| set_comments.set(event_target_value(&ev))
            ></textarea>
            <button type="submit" class="btn btn-primary" disabled=submitting>
                {move || if submitting.get() { "Submitting..." } else { "Notify Me" }}
            </button>
        </form>
    }
}
