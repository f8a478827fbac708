//! レビューフォーム（直接モード）

use image_insight_common::feedback::{self, non_empty};
use image_insight_common::ReviewSubmission;
use leptos::ev::SubmitEvent;
use leptos::prelude::*;

use crate::state::{now_iso, AppContext};

#[component]
pub fn ReviewForm(ctx: AppContext) -> impl IntoView {
    let (rating, set_rating) = signal(5u8);
    let (comments, set_comments) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        let Some(services) = ctx.services() else {
            return;
        };

        let review = ReviewSubmission {
            rating: rating.get_untracked(),
            comments: comments.get_untracked(),
            email: non_empty(&email.get_untracked()),
            analysis: ctx
                .session
                .with_untracked(|s| s.analysis().unwrap_or_default().to_string()),
            timestamp: now_iso(),
        };

        set_submitting.set(true);
        wasm_bindgen_futures::spawn_local(async move {
            let result = feedback::submit_review(&services.sender, &review, &ctx.tracker).await;
            ctx.report(&result);
            if result.is_ok() {
                set_rating.set(5);
                set_comments.set(String::new());
                set_email.set(String::new());
            }
            set_submitting.set(false);
        });
    };

    view! {
        <section class="review-section">
            <h3>"How accurate was your analysis?"</h3>
            <form class="review-form" on:submit=on_submit>
                <label>
                    "Rating"
                    <select
                        prop:value=move || rating.get().to_string()
                        on:change=move |ev| {
                            if let Ok(value) = event_target_value(&ev).parse::<u8>() {
                                set_rating.set(value);
                            }
                        }
                    >
                        <option value="5">"5 - Excellent"</option>
                        <option value="4">"4 - Good"</option>
                        <option value="3">"3 - Okay"</option>
                        <option value="2">"2 - Poor"</option>
                        <option value="1">"1 - Bad"</option>
                    </select>
                </label>
                <textarea
                    placeholder="Tell us what you think"
                    prop:value=comments
                    on:input=move |ev| set_comments.set(event_target_value(&ev))
                ></textarea>
                <input
                    type="email"
                    placeholder="Email (optional)"
                    prop:value=email
                    on:input=move |ev| set_email.set(event_target_value(&ev))
                />
                <button type="submit" class="btn btn-secondary" disabled=submitting>
                    {move || if submitting.get() { "Submitting..." } else { "Submit Review" }}
                </button>
            </form>
        </section>
    }
}
