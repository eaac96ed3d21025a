use crate::api::{ApiGateway, use_api};
use crate::components::apartment_card::{ApartmentCard, request_booking};
use crate::components::feedback::{ErrorAlert, LoadingSpinner, Notice, Notification};
use crate::fetch_state::FetchState;
use crate::web::HttpClient;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use ams_shared::{ApiError, Apartment, ApartmentFilter, UserProfile};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 面板上展示的可预订公寓数量
const FEATURED_LIMIT: u32 = 3;

#[derive(Debug, Clone, Default, PartialEq)]
struct VisitorOverview {
    profile: UserProfile,
    featured: Vec<Apartment>,
}

impl VisitorOverview {
    async fn fetch<C: HttpClient>(api: &ApiGateway<C>) -> Result<Self, ApiError> {
        let profile = api.profile().await?;
        let featured = api
            .apartments(ApartmentFilter::featured(FEATURED_LIMIT))
            .await?;
        Ok(Self { profile, featured })
    }
}

#[component]
pub fn VisitorDashboardPage() -> impl IntoView {
    let api = use_api();
    let state = RwSignal::new(FetchState::<VisitorOverview>::Loading);
    let notice = RwSignal::new(Notice::None);

    let load = {
        let api = api.clone();
        Callback::new(move |_: ()| {
            let api = api.clone();
            state.set(FetchState::Loading);
            spawn_local(async move {
                state.set(FetchState::from_result(VisitorOverview::fetch(&api).await));
            });
        })
    };

    load.run(());

    let on_book = Callback::new(move |id: i64| request_booking(api.clone(), id, notice));

    move || match state.get() {
        FetchState::Loading => view! { <LoadingSpinner label="Loading dashboard data..." /> }.into_any(),
        FetchState::Failed(e) => view! {
            <div class="container mt-5">
                <ErrorAlert message=e.message on_retry=load />
            </div>
        }
        .into_any(),
        FetchState::Loaded(overview) => view! {
            <div class="container mt-4">
                <h1 class="mb-4">"Visitor Dashboard"</h1>
                <Notification notice=notice />

                <div class="card mb-4">
                    <div class="card-body">
                        <h5 class="card-title">"Welcome, " {overview.profile.display_name()} "!"</h5>
                        <p class="card-text">
                            "As a visitor, you can browse available apartments and request bookings. When you find an apartment you like, you can apply to become a resident."
                        </p>
                    </div>
                </div>

                <div class="card mb-4">
                    <div class="card-header bg-primary text-white d-flex justify-content-between align-items-center">
                        <h5 class="mb-0">"Featured Apartments"</h5>
                        <Link to=AppRoute::Apartments class="btn btn-sm btn-outline-light">"View All"</Link>
                    </div>
                    <div class="card-body">
                        <div class="row">
                            {if overview.featured.is_empty() {
                                view! {
                                    <div class="col-12">
                                        <p class="text-center">"No available apartments at the moment."</p>
                                    </div>
                                }
                                .into_any()
                            } else {
                                overview
                                    .featured
                                    .into_iter()
                                    .map(|apartment| view! {
                                        <ApartmentCard apartment=apartment on_book=Some(on_book) />
                                    })
                                    .collect_view()
                                    .into_any()
                            }}
                        </div>
                    </div>
                </div>

                <div class="card mb-4">
                    <div class="card-header bg-info text-white">
                        <h5 class="mb-0">"How to Book an Apartment"</h5>
                    </div>
                    <div class="card-body">
                        <ol class="list-group list-group-numbered">
                            <li class="list-group-item">"Browse available apartments"</li>
                            <li class="list-group-item">"Select an apartment you're interested in"</li>
                            <li class="list-group-item">"Send a booking request"</li>
                            <li class="list-group-item">"Wait for approval from management"</li>
                        </ol>
                    </div>
                </div>
            </div>
        }
        .into_any(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MockHttpClient;
    use serde_json::json;

    #[tokio::test]
    async fn test_featured_apartments_use_available_filter() {
        let client = MockHttpClient::new();
        client.mock_response(
            "http://ams.test/api/users/profile",
            200,
            json!({ "firstName": "Grace", "lastName": "Hopper", "role": "VISITOR" }),
        );
        client.mock_response(
            "http://ams.test/api/apartments?isAvailable=true&limit=3",
            200,
            json!([{ "id": 7, "name": "Sunset 3B", "rent": 1450.0, "available": true }]),
        );
        let api = ApiGateway::new("http://ams.test/api", client, Some("t.o.k".to_string()));

        let overview = VisitorOverview::fetch(&api).await.unwrap();
        assert_eq!(overview.profile.display_name(), "Grace Hopper");
        assert_eq!(overview.featured.len(), 1);
        assert!(overview.featured[0].is_available);
    }
}
