use crate::api::{ApiGateway, use_api};
use crate::components::feedback::{ErrorAlert, LoadingSpinner};
use crate::components::format::{complaint_badge, date, money, timestamp_date};
use crate::components::payment_page::PaymentTable;
use crate::fetch_state::FetchState;
use crate::web::route::AppRoute;
use crate::web::HttpClient;
use crate::web::router::Link;
use ams_shared::{ApiError, Complaint, ComplaintStatus, Payment, UserProfile};
use chrono::{Datelike, Local, NaiveDate};
use leptos::prelude::*;
use leptos::task::spawn_local;

const RECENT_COMPLAINTS: usize = 3;
const RECENT_PAYMENTS: usize = 5;

#[derive(Debug, Clone, Default, PartialEq)]
struct ResidentOverview {
    profile: UserProfile,
    complaints: Vec<Complaint>,
    payments: Vec<Payment>,
}

impl ResidentOverview {
    /// 依次拉取资料、投诉、付款；任一失败即整体失败
    async fn fetch<C: HttpClient>(api: &ApiGateway<C>) -> Result<Self, ApiError> {
        let profile = api.profile().await?;
        let complaints = api.complaints(None).await?;
        let payments = api.payment_history().await?;
        Ok(Self {
            profile,
            complaints,
            payments,
        })
    }

    fn active_complaints(&self) -> usize {
        self.complaints
            .iter()
            .filter(|c| c.status != ComplaintStatus::Resolved)
            .count()
    }
}

/// 下次付款日：下个月 1 号
fn next_payment_date(today: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if today.month() == 12 {
        (today.year() + 1, 1)
    } else {
        (today.year(), today.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[component]
pub fn ResidentDashboardPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(FetchState::<ResidentOverview>::Loading);

    let load = Callback::new(move |_: ()| {
        let api = api.clone();
        state.set(FetchState::Loading);
        spawn_local(async move {
            state.set(FetchState::from_result(ResidentOverview::fetch(&api).await));
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
        FetchState::Loaded(overview) => view! { <ResidentView overview=overview /> }.into_any(),
    }
}

#[component]
fn ResidentView(overview: ResidentOverview) -> impl IntoView {
    let active = overview.active_complaints();
    let payments_made = overview.payments.len();
    let due = date(next_payment_date(Local::now().date_naive()));
    let ResidentOverview {
        profile,
        complaints,
        payments,
    } = overview;
    let name = profile.display_name();
    let apartment = profile.apartment.unwrap_or_default();

    view! {
        <div class="container mt-4">
            <h1 class="mb-4">"Resident Dashboard"</h1>

            <div class="row mb-4">
                <div class="col-12">
                    <div class="card">
                        <div class="card-body">
                            <h5 class="card-title">"Welcome, " {name} "!"</h5>
                            <p class="card-text">
                                "You are a resident of " <strong>{apartment.name.clone()}</strong>
                                ", Unit " <strong>{apartment.unit_number.clone()}</strong> "."
                            </p>
                        </div>
                    </div>
                </div>
            </div>

            <div class="row mb-4">
                <div class="col-md-4 mb-3">
                    <div class="card dashboard-card bg-primary text-white">
                        <div class="card-body">
                            <h5>"Monthly Rent"</h5>
                            <h2>{money(apartment.rent)}</h2>
                            <p>"Due on " {due}</p>
                        </div>
                    </div>
                </div>
                <div class="col-md-4 mb-3">
                    <div class="card dashboard-card bg-success text-white">
                        <div class="card-body">
                            <h5>"Payments Made"</h5>
                            <h2>{payments_made}</h2>
                            <Link to=AppRoute::Payments class="text-white">"View History"</Link>
                        </div>
                    </div>
                </div>
                <div class="col-md-4 mb-3">
                    <div class="card dashboard-card bg-warning text-dark">
                        <div class="card-body">
                            <h5>"Active Complaints"</h5>
                            <h2>{active}</h2>
                            <Link to=AppRoute::Complaints class="text-dark">"View Complaints"</Link>
                        </div>
                    </div>
                </div>
            </div>

            <div class="row mb-4">
                <div class="col-12">
                    <div class="card">
                        <div class="card-header bg-primary text-white">
                            <h5 class="mb-0">"Quick Actions"</h5>
                        </div>
                        <div class="card-body">
                            <div class="row">
                                <div class="col-md-6 mb-3">
                                    <Link to=AppRoute::Payments class="btn btn-outline-primary w-100 p-3">"Pay Rent"</Link>
                                </div>
                                <div class="col-md-6 mb-3">
                                    <Link to=AppRoute::NewComplaint class="btn btn-outline-warning w-100 p-3">"Report Issue"</Link>
                                </div>
                            </div>
                        </div>
                    </div>
                </div>
            </div>

            <div class="row mb-4">
                <div class="col-md-6 mb-4">
                    <div class="card h-100">
                        <div class="card-header bg-warning text-dark d-flex justify-content-between align-items-center">
                            <h5 class="mb-0">"Recent Complaints"</h5>
                            <Link to=AppRoute::Complaints class="btn btn-sm btn-outline-dark">"View All"</Link>
                        </div>
                        <div class="card-body">
                            {if complaints.is_empty() {
                                view! { <p class="text-center mt-3">"No complaints filed yet"</p> }.into_any()
                            } else {
                                view! {
                                    <div class="list-group">
                                        {complaints
                                            .into_iter()
                                            .take(RECENT_COMPLAINTS)
                                            .map(|c| view! {
                                                <div class="list-group-item list-group-item-action">
                                                    <div class="d-flex w-100 justify-content-between">
                                                        <h6 class="mb-1">{c.title}</h6>
                                                        <small>
                                                            <span class=complaint_badge(c.status)>{c.status.label()}</span>
                                                        </small>
                                                    </div>
                                                    <p class="mb-1 text-truncate">{c.description}</p>
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

                <div class="col-md-6 mb-4">
                    <div class="card h-100">
                        <div class="card-header bg-success text-white d-flex justify-content-between align-items-center">
                            <h5 class="mb-0">"Recent Payments"</h5>
                            <Link to=AppRoute::Payments class="btn btn-sm btn-outline-light">"View All"</Link>
                        </div>
                        <div class="card-body">
                            {if payments.is_empty() {
                                view! { <p class="text-center mt-3">"No payment history available"</p> }.into_any()
                            } else {
                                let recent = payments.into_iter().take(RECENT_PAYMENTS).collect::<Vec<_>>();
                                view! { <PaymentTable payments=recent /> }.into_any()
                            }}
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MockHttpClient;
    use serde_json::json;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_next_payment_is_first_of_next_month() {
        assert_eq!(next_payment_date(ymd(2024, 3, 15)), Some(ymd(2024, 4, 1)));
        assert_eq!(next_payment_date(ymd(2024, 1, 31)), Some(ymd(2024, 2, 1)));
        assert_eq!(next_payment_date(ymd(2024, 12, 1)), Some(ymd(2025, 1, 1)));
    }

    #[test]
    fn test_resolved_complaints_are_not_active() {
        let overview = ResidentOverview {
            complaints: vec![
                Complaint { status: ComplaintStatus::Resolved, ..Default::default() },
                Complaint { status: ComplaintStatus::InProgress, ..Default::default() },
                Complaint::default(),
            ],
            ..Default::default()
        };
        assert_eq!(overview.active_complaints(), 2);
    }

    #[tokio::test]
    async fn test_overview_fails_when_any_call_fails() {
        let client = MockHttpClient::new();
        client.mock_response("http://ams.test/api/users/profile", 200, json!({ "firstName": "Ada" }));
        client.mock_response("http://ams.test/api/complaints", 200, json!([]));
        let api = ApiGateway::new("http://ams.test/api", client, None::<String>);

        let err = ResidentOverview::fetch(&api).await.unwrap_err();
        assert_eq!(err.message, "Unable to fetch payment history");
    }
}
