//! 公寓列表页
//!
//! 任何人可浏览；管理员可删除，访客可提交预订申请。

use crate::api::{ApiGateway, use_api};
use crate::auth::use_auth;
use crate::components::apartment_card::{ApartmentCard, request_booking};
use crate::components::feedback::{ErrorAlert, Notice, Notification};
use crate::fetch_state::FetchState;
use crate::web::HttpClient;
use ams_shared::{Apartment, ApartmentFilter, Role};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// 筛选表单状态，输入值保持为原始字符串，提交时再解析
#[derive(Clone, Copy)]
struct FilterForm {
    availability: RwSignal<String>,
    min_bedrooms: RwSignal<String>,
    max_rent: RwSignal<String>,
    floor_number: RwSignal<String>,
}

impl FilterForm {
    fn new() -> Self {
        Self {
            availability: RwSignal::new(String::new()),
            min_bedrooms: RwSignal::new(String::new()),
            max_rent: RwSignal::new(String::new()),
            floor_number: RwSignal::new(String::new()),
        }
    }

    fn reset(&self) {
        self.availability.set(String::new());
        self.min_bedrooms.set(String::new());
        self.max_rent.set(String::new());
        self.floor_number.set(String::new());
    }

    /// 空值与无法解析的值都视为"不限"
    fn to_filter(&self) -> ApartmentFilter {
        ApartmentFilter {
            is_available: match self.availability.get_untracked().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            min_bedrooms: self.min_bedrooms.get_untracked().trim().parse().ok(),
            max_rent: self.max_rent.get_untracked().trim().parse().ok(),
            floor_number: self.floor_number.get_untracked().trim().parse().ok(),
            limit: None,
        }
    }
}

fn confirm(message: &str) -> bool {
    web_sys::window()
        .and_then(|w| w.confirm_with_message(message).ok())
        .unwrap_or(false)
}

/// 按筛选条件拉取列表并写入状态
async fn refresh<C: HttpClient>(
    api: &ApiGateway<C>,
    filter: ApartmentFilter,
    state: RwSignal<FetchState<Vec<Apartment>>>,
) {
    state.set(FetchState::from_result(api.apartments(filter).await));
}

#[component]
pub fn ApartmentListPage() -> impl IntoView {
    let api = use_api();
    let auth = use_auth();
    let session = auth.session_signal();
    let role = move || session.with(|s| s.role());

    let form = FilterForm::new();
    let state = RwSignal::new(FetchState::<Vec<Apartment>>::Loading);
    let notice = RwSignal::new(Notice::None);

    let load = {
        let api = api.clone();
        move |filter: ApartmentFilter| {
            let api = api.clone();
            state.set(FetchState::Loading);
            spawn_local(async move { refresh(&api, filter, state).await });
        }
    };

    // 初始加载
    load(ApartmentFilter::default());

    let on_apply = {
        let load = load.clone();
        move |ev: leptos::ev::SubmitEvent| {
            ev.prevent_default();
            load(form.to_filter());
        }
    };

    // 重试沿用表单中当前的筛选条件
    let on_retry = {
        let load = load.clone();
        Callback::new(move |_: ()| load(form.to_filter()))
    };

    let on_reset = {
        let load = load.clone();
        move |_| {
            form.reset();
            load(ApartmentFilter::default());
        }
    };

    let on_delete = {
        let api = api.clone();
        Callback::new(move |id: i64| {
            if !confirm("Are you sure you want to delete this apartment?") {
                return;
            }
            let api = api.clone();
            spawn_local(async move {
                match api.delete_apartment(id).await {
                    Ok(()) => {
                        state.update(|s| {
                            if let FetchState::Loaded(list) = s {
                                list.retain(|a| a.id != id);
                            }
                        });
                        notice.set(Some(("Apartment deleted".to_string(), false)));
                    }
                    Err(e) => notice.set(Some((e.message, true))),
                }
            });
        })
    };

    let on_book = Callback::new(move |id: i64| request_booking(api.clone(), id, notice));

    let apartments = move || state.with(FetchState::data_or_default);

    view! {
        <div class="container mt-4">
            <h1 class="mb-4">"Available Apartments"</h1>

            <Notification notice=notice />
            {move || {
                state
                    .with(|s| s.error().cloned())
                    .map(|e| view! { <ErrorAlert message=e.message on_retry=on_retry /> })
            }}

            <div class="card mb-4">
                <div class="card-body">
                    <h5 class="card-title mb-3">"Filter Apartments"</h5>
                    <form on:submit=on_apply>
                        <div class="row g-3">
                            <div class="col-md-3">
                                <label for="isAvailable" class="form-label">"Availability"</label>
                                <select
                                    id="isAvailable"
                                    class="form-select"
                                    prop:value=form.availability
                                    on:change=move |ev| form.availability.set(event_target_value(&ev))
                                >
                                    <option value="">"All"</option>
                                    <option value="true">"Available"</option>
                                    <option value="false">"Not Available"</option>
                                </select>
                            </div>
                            <div class="col-md-3">
                                <label for="minBedrooms" class="form-label">"Min Bedrooms"</label>
                                <select
                                    id="minBedrooms"
                                    class="form-select"
                                    prop:value=form.min_bedrooms
                                    on:change=move |ev| form.min_bedrooms.set(event_target_value(&ev))
                                >
                                    <option value="">"Any"</option>
                                    <option value="1">"1"</option>
                                    <option value="2">"2"</option>
                                    <option value="3">"3"</option>
                                    <option value="4">"4+"</option>
                                </select>
                            </div>
                            <div class="col-md-3">
                                <label for="maxRent" class="form-label">"Max Rent ($)"</label>
                                <input
                                    id="maxRent"
                                    type="number"
                                    min="0"
                                    class="form-control"
                                    placeholder="Any"
                                    prop:value=form.max_rent
                                    on:input=move |ev| form.max_rent.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="col-md-3">
                                <label for="floorNumber" class="form-label">"Floor"</label>
                                <input
                                    id="floorNumber"
                                    type="number"
                                    class="form-control"
                                    placeholder="Any"
                                    prop:value=form.floor_number
                                    on:input=move |ev| form.floor_number.set(event_target_value(&ev))
                                />
                            </div>
                            <div class="col-12 mt-3">
                                <button type="submit" class="btn btn-primary">"Apply Filters"</button>
                                <button type="button" class="btn btn-outline-secondary ms-2" on:click=on_reset>
                                    "Reset"
                                </button>
                            </div>
                        </div>
                    </form>
                </div>
            </div>

            <div class="row">
                {move || {
                    if state.with(FetchState::is_loading) {
                        return view! {
                            <div class="col text-center py-5">
                                <div class="spinner-border text-primary" role="status">
                                    <span class="visually-hidden">"Loading..."</span>
                                </div>
                                <p class="mt-3">"Loading apartments..."</p>
                            </div>
                        }
                        .into_any();
                    }
                    let list = apartments();
                    if list.is_empty() {
                        return view! {
                            <div class="col">
                                <div class="alert alert-info" role="alert">
                                    "No apartments found matching your criteria."
                                </div>
                            </div>
                        }
                        .into_any();
                    }
                    let current_role = role();
                    let delete = (current_role == Some(Role::Admin)).then_some(on_delete);
                    let book = (current_role == Some(Role::Visitor)).then_some(on_book);
                    list.into_iter()
                        .map(|apartment| view! {
                            <ApartmentCard apartment=apartment on_delete=delete on_book=book />
                        })
                        .collect_view()
                        .into_any()
                }}
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MockHttpClient;
    use serde_json::json;

    #[test]
    fn test_blank_filter_form_requests_everything() {
        Owner::new().with(|| {
            assert_eq!(FilterForm::new().to_filter(), ApartmentFilter::default());
        });
    }

    #[test]
    fn test_filter_form_parses_inputs() {
        Owner::new().with(|| {
            let form = FilterForm::new();
            form.availability.set("false".into());
            form.min_bedrooms.set("2".into());
            form.max_rent.set(" 1500 ".into());
            form.floor_number.set("abc".into());

            let filter = form.to_filter();
            assert_eq!(filter.is_available, Some(false));
            assert_eq!(filter.min_bedrooms, Some(2));
            assert_eq!(filter.max_rent, Some(1500));
            assert_eq!(filter.floor_number, None);

            form.reset();
            assert_eq!(form.to_filter(), ApartmentFilter::default());
        });
    }

    #[tokio::test]
    async fn test_retry_uses_current_filter_after_failure() {
        let owner = Owner::new();
        let (form, state) = owner.with(|| {
            (
                FilterForm::new(),
                RwSignal::new(FetchState::<Vec<Apartment>>::Loading),
            )
        });

        let client = MockHttpClient::new();
        client.mock_response("http://ams.test/api/apartments?minBedrooms=2", 200, json!([]));
        let api = ApiGateway::new("http://ams.test/api", client, None::<String>);

        refresh(&api, ApartmentFilter::default(), state).await;
        state.with_untracked(|s| {
            assert_eq!(
                s.error().map(|e| e.message.as_str()),
                Some("Unable to fetch apartments")
            );
            assert!(s.data_or_default().is_empty());
        });

        form.min_bedrooms.set("2".into());
        refresh(&api, form.to_filter(), state).await;
        assert_eq!(state.get_untracked(), FetchState::Loaded(Vec::new()));
    }
}
