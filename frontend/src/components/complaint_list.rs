use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::feedback::{ErrorAlert, LoadingSpinner, Notice, Notification};
use crate::components::format::{complaint_badge, timestamp_date};
use crate::fetch_state::FetchState;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use ams_shared::{Complaint, ComplaintStatus, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 用服务返回的新版本替换列表中的同一条投诉
fn replace_complaint(list: &mut [Complaint], updated: Complaint) {
    if let Some(slot) = list.iter_mut().find(|c| c.id == updated.id) {
        *slot = updated;
    }
}

#[component]
pub fn ComplaintListPage() -> impl IntoView {
    let api = use_api();
    let session = use_auth().session_signal();
    let is_admin = move || session.with(|s| s.role() == Some(Role::Admin));

    let status_filter = RwSignal::new(Option::<ComplaintStatus>::None);
    let state = RwSignal::new(FetchState::<Vec<Complaint>>::Loading);
    let notice = RwSignal::new(Notice::None);

    let load = {
        let api = api.clone();
        Callback::new(move |_: ()| {
            let api = api.clone();
            let status = status_filter.get_untracked();
            state.set(FetchState::Loading);
            spawn_local(async move {
                state.set(FetchState::from_result(api.complaints(status).await));
            });
        })
    };

    load.run(());

    let on_status_change = Callback::new(move |(id, status): (i64, ComplaintStatus)| {
        let api = api.clone();
        spawn_local(async move {
            match api.update_complaint_status(id, status).await {
                Ok(updated) => {
                    state.update(|s| {
                        if let FetchState::Loaded(list) = s {
                            replace_complaint(list, updated);
                        }
                    });
                    notice.set(Some((format!("Complaint marked {}", status.label()), false)));
                }
                Err(e) => notice.set(Some((e.message, true))),
            }
        });
    });

    view! {
        <div class="container mt-4">
            <div class="d-flex justify-content-between align-items-center mb-4">
                <h1 class="mb-0">{move || if is_admin() { "Complaints" } else { "My Complaints" }}</h1>
                <Show when=move || !is_admin()>
                    <Link to=AppRoute::NewComplaint class="btn btn-warning">"New Complaint"</Link>
                </Show>
            </div>

            <Notification notice=notice />

            <div class="mb-3 col-md-4">
                <label for="statusFilter" class="form-label">"Status"</label>
                <select
                    id="statusFilter"
                    class="form-select"
                    on:change=move |ev| {
                        status_filter.set(ComplaintStatus::parse(&event_target_value(&ev)));
                        load.run(());
                    }
                >
                    <option value="">"All"</option>
                    {ComplaintStatus::SELECTABLE
                        .into_iter()
                        .map(|s| view! { <option value=s.as_str()>{s.label()}</option> })
                        .collect_view()}
                </select>
            </div>

            {move || match state.get() {
                FetchState::Loading => view! { <LoadingSpinner label="Loading complaints..." /> }.into_any(),
                FetchState::Failed(e) => view! {
                    <ErrorAlert message=e.message on_retry=load />
                }
                .into_any(),
                FetchState::Loaded(list) if list.is_empty() => view! {
                    <div class="alert alert-info" role="alert">"No complaints found."</div>
                }
                .into_any(),
                FetchState::Loaded(list) => {
                    let admin = is_admin();
                    view! {
                        <div class="list-group">
                            {list
                                .into_iter()
                                .map(|c| view! {
                                    <ComplaintRow complaint=c editable=admin on_status_change=on_status_change />
                                })
                                .collect_view()}
                        </div>
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

#[component]
fn ComplaintRow(
    complaint: Complaint,
    editable: bool,
    on_status_change: Callback<(i64, ComplaintStatus)>,
) -> impl IntoView {
    let id = complaint.id;
    let status = complaint.status;

    view! {
        <div class="list-group-item">
            <div class="d-flex w-100 justify-content-between">
                <h6 class="mb-1">{complaint.title}</h6>
                <small>
                    <span class=complaint_badge(status)>{status.label()}</span>
                </small>
            </div>
            <p class="mb-1">{complaint.description}</p>
            <small class="text-muted">
                {complaint.category.label()} " · " {complaint.priority.label()}
                " · Reported on: " {timestamp_date(complaint.created_at)}
            </small>
            {complaint.resolution.map(|r| view! { <p class="mb-0 mt-1"><strong>"Resolution: "</strong>{r}</p> })}
            {editable.then(|| view! {
                <div class="mt-2 col-md-4">
                    <select
                        class="form-select form-select-sm"
                        on:change=move |ev| {
                            if let Some(next) = ComplaintStatus::parse(&event_target_value(&ev)) {
                                on_status_change.run((id, next));
                            }
                        }
                    >
                        {ComplaintStatus::SELECTABLE
                            .into_iter()
                            .map(|s| view! {
                                <option value=s.as_str() selected={s == status}>{s.label()}</option>
                            })
                            .collect_view()}
                    </select>
                </div>
            })}
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_updated_complaint_replaces_original() {
        let mut list = vec![
            Complaint { id: 1, title: "Noise".into(), ..Default::default() },
            Complaint { id: 2, title: "Heating".into(), ..Default::default() },
        ];
        let updated = Complaint {
            id: 2,
            title: "Heating".into(),
            status: ComplaintStatus::Resolved,
            ..Default::default()
        };

        replace_complaint(&mut list, updated);
        assert_eq!(list[1].status, ComplaintStatus::Resolved);
        assert_eq!(list[0].status, ComplaintStatus::Pending);
    }
}
