use crate::api::use_api;
use crate::components::feedback::{ErrorAlert, LoadingSpinner};
use crate::components::format::{complaint_badge, money, timestamp_date};
use crate::fetch_state::FetchState;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use ams_shared::AdminStats;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 收入概览中"本月"与"待收"按总收入的固定比例估算
const MONTHLY_SHARE: f64 = 0.1;
const UPCOMING_SHARE: f64 = 0.08;

#[component]
fn StatCard(
    title: &'static str,
    value: String,
    color: &'static str,
    link: AppRoute,
    link_label: &'static str,
) -> impl IntoView {
    let text = if color == "warning" { "text-dark" } else { "text-white" };
    view! {
        <div class="col-md-3 mb-3">
            <div class={format!("card dashboard-card bg-{} {}", color, text)}>
                <div class="card-body">
                    <h5>{title}</h5>
                    <h2>{value}</h2>
                    <Link to=link class=text>{link_label}</Link>
                </div>
            </div>
        </div>
    }
}

#[component]
pub fn AdminDashboardPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(FetchState::<AdminStats>::Loading);

    let load = Callback::new(move |_: ()| {
        let api = api.clone();
        state.set(FetchState::Loading);
        spawn_local(async move {
            state.set(FetchState::from_result(api.admin_stats().await));
        });
    });

    load.run(());

    move || match state.get() {
        FetchState::Loading => view! { <LoadingSpinner label="Loading dashboard data..." /> }.into_any(),
        FetchState::Failed(e) => view! {
            <div class="container mt-5">
                <ErrorAlert message=e.message on_retry=load />
            </div>
        }
        .into_any(),
        FetchState::Loaded(stats) => view! { <AdminOverview stats=stats /> }.into_any(),
    }
}

#[component]
fn AdminOverview(stats: AdminStats) -> impl IntoView {
    let revenue = stats.total_revenue;

    view! {
        <div class="container mt-4">
            <h1 class="mb-4">"Admin Dashboard"</h1>

            <div class="row mb-4">
                <StatCard
                    title="Total Apartments"
                    value=stats.total_apartments.to_string()
                    color="primary"
                    link=AppRoute::Apartments
                    link_label="View All"
                />
                <StatCard
                    title="Available Apartments"
                    value=stats.available_apartments.to_string()
                    color="success"
                    link=AppRoute::Apartments
                    link_label="View Available"
                />
                <StatCard
                    title="Total Residents"
                    value=stats.total_residents.to_string()
                    color="warning"
                    link=AppRoute::Complaints
                    link_label="Resident Complaints"
                />
                <StatCard
                    title="Pending Complaints"
                    value=stats.pending_complaints.to_string()
                    color="danger"
                    link=AppRoute::Complaints
                    link_label="View Complaints"
                />
            </div>

            <div class="row mb-4">
                <div class="col-12">
                    <div class="card">
                        <div class="card-header bg-info text-white">
                            <h5 class="mb-0">"Revenue Overview"</h5>
                        </div>
                        <div class="card-body">
                            <div class="row">
                                <div class="col-md-4 text-center border-end">
                                    <h6>"Total Revenue"</h6>
                                    <h3>{money(revenue)}</h3>
                                </div>
                                <div class="col-md-4 text-center border-end">
                                    <h6>"This Month"</h6>
                                    <h3>{money(revenue * MONTHLY_SHARE)}</h3>
                                </div>
                                <div class="col-md-4 text-center">
                                    <h6>"Upcoming Payments"</h6>
                                    <h3>{money(revenue * UPCOMING_SHARE)}</h3>
                                </div>
                            </div>
                        </div>
                    </div>
                </div>
            </div>

            <div class="row mb-4">
                <div class="col-12">
                    <div class="card">
                        <div class="card-header bg-warning text-dark d-flex justify-content-between align-items-center">
                            <h5 class="mb-0">"Recent Complaints"</h5>
                            <Link to=AppRoute::Complaints class="btn btn-sm btn-outline-dark">"View All"</Link>
                        </div>
                        <div class="card-body">
                            {if stats.recent_complaints.is_empty() {
                                view! { <p class="text-center mt-3">"No recent complaints"</p> }.into_any()
                            } else {
                                view! {
                                    <div class="list-group">
                                        {stats
                                            .recent_complaints
                                            .into_iter()
                                            .map(|c| view! {
                                                <div class="list-group-item">
                                                    <div class="d-flex w-100 justify-content-between">
                                                        <h6 class="mb-1">{c.title}</h6>
                                                        <span class=complaint_badge(c.status)>{c.status.label()}</span>
                                                    </div>
                                                    <small>"Reported on: " {timestamp_date(c.created_at)}</small>
                                                </div>
                                            })
                                            .collect_view()}
                                    </div>
                                }
                                .into_any()
                            }}
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
