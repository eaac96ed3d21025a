//! 投诉提交页（住户）
//!
//! 提交成功后显示提示，2 秒后跳转到投诉列表。

mod form_state;

use crate::api::use_api;
use crate::components::feedback::PendingTimer;
use crate::web::route::AppRoute;
use crate::web::router::use_router;
use ams_shared::{ComplaintCategory, ComplaintPriority};
use form_state::FormState;
use leptos::prelude::*;
use leptos::task::spawn_local;
use std::time::Duration;

const SUBMITTED: &str = "Complaint submitted successfully!";
const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[component]
pub fn ComplaintFormPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();

    let state = FormState::new();
    // 离开页面时取消尚未触发的跳转
    let redirect = PendingTimer::new();
    let (loading, set_loading) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);
    let (success_msg, set_success_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_success_msg.set(None);
        set_loading.set(true);

        let api = api.clone();
        let request = state.to_request();
        spawn_local(async move {
            match api.create_complaint(request).await {
                Ok(complaint) => {
                    tracing::info!(complaint = complaint.id, "complaint submitted");
                    set_success_msg.set(Some(SUBMITTED.to_string()));
                    state.reset();
                    redirect.arm(
                        move || router.navigate_to(AppRoute::Complaints),
                        REDIRECT_DELAY,
                    );
                }
                Err(e) => set_error_msg.set(Some(e.message)),
            }
            set_loading.set(false);
        });
    };

    view! {
        <div class="container mt-4">
            <div class="row justify-content-center">
                <div class="col-md-8">
                    <div class="card">
                        <div class="card-header bg-warning text-dark">
                            <h4 class="mb-0">"Submit a Complaint"</h4>
                        </div>
                        <div class="card-body">
                            <Show when=move || error_msg.with(Option::is_some)>
                                <div class="alert alert-danger" role="alert">
                                    {move || error_msg.get().unwrap_or_default()}
                                </div>
                            </Show>
                            <Show when=move || success_msg.with(Option::is_some)>
                                <div class="alert alert-success" role="alert">
                                    {move || success_msg.get().unwrap_or_default()}
                                </div>
                            </Show>

                            <form on:submit=on_submit>
                                <div class="mb-3">
                                    <label for="title" class="form-label">"Title *"</label>
                                    <input
                                        id="title"
                                        type="text"
                                        class="form-control"
                                        placeholder="Brief title of the issue"
                                        on:input=move |ev| state.title.set(event_target_value(&ev))
                                        prop:value=move || state.title.get()
                                        required
                                    />
                                </div>

                                <div class="mb-3">
                                    <label for="category" class="form-label">"Category *"</label>
                                    <select
                                        id="category"
                                        class="form-select"
                                        on:change=move |ev| {
                                            if let Some(c) = ComplaintCategory::parse(&event_target_value(&ev)) {
                                                state.category.set(c);
                                            }
                                        }
                                        prop:value=move || state.category.get().as_str()
                                    >
                                        {ComplaintCategory::SELECTABLE
                                            .into_iter()
                                            .map(|c| view! { <option value=c.as_str()>{c.label()}</option> })
                                            .collect_view()}
                                    </select>
                                </div>

                                <div class="mb-3">
                                    <label for="priority" class="form-label">"Priority *"</label>
                                    <select
                                        id="priority"
                                        class="form-select"
                                        on:change=move |ev| {
                                            if let Some(p) = ComplaintPriority::parse(&event_target_value(&ev)) {
                                                state.priority.set(p);
                                            }
                                        }
                                        prop:value=move || state.priority.get().as_str()
                                    >
                                        {ComplaintPriority::SELECTABLE
                                            .into_iter()
                                            .map(|p| view! { <option value=p.as_str()>{p.label()}</option> })
                                            .collect_view()}
                                    </select>
                                </div>

                                <div class="mb-3">
                                    <label for="description" class="form-label">"Description *"</label>
                                    <textarea
                                        id="description"
                                        class="form-control"
                                        rows="5"
                                        placeholder="Please provide detailed description of the issue. Include when it started, what you've observed, and any other relevant details."
                                        on:input=move |ev| state.description.set(event_target_value(&ev))
                                        prop:value=move || state.description.get()
                                        required
                                    ></textarea>
                                </div>

                                <div class="d-grid gap-2">
                                    <button type="submit" class="btn btn-warning" disabled=move || loading.get()>
                                        {move || if loading.get() { "Submitting..." } else { "Submit Complaint" }}
                                    </button>
                                    <button
                                        type="button"
                                        class="btn btn-outline-secondary"
                                        on:click=move |_| router.navigate_to(AppRoute::Complaints)
                                    >
                                        "Cancel"
                                    </button>
                                </div>
                            </form>

                            <div class="mt-4">
                                <h5>"What happens next?"</h5>
                                <ol class="list-group list-group-numbered mt-2">
                                    <li class="list-group-item">"Your complaint will be reviewed by management"</li>
                                    <li class="list-group-item">"A staff member will be assigned to your case"</li>
                                    <li class="list-group-item">"You can track status on the complaints page"</li>
                                </ol>
                            </div>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
