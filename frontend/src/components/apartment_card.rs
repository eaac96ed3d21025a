use crate::api::ApiGateway;
use crate::components::feedback::Notice;
use crate::components::format::{money, or_dash};
use ams_shared::Apartment;
use ams_shared::protocol::BookApartmentRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

const DEFAULT_IMAGE: &str = "https://via.placeholder.com/300x200?text=Apartment";

/// 单个公寓卡片
///
/// 管理员看到删除按钮；提供 `on_book` 时显示预订按钮。
#[component]
pub fn ApartmentCard(
    apartment: Apartment,
    #[prop(optional_no_strip)] on_delete: Option<Callback<i64>>,
    #[prop(optional_no_strip)] on_book: Option<Callback<i64>>,
) -> impl IntoView {
    let id = apartment.id;
    let available = apartment.is_available;
    let image = apartment
        .image_url
        .clone()
        .unwrap_or_else(|| DEFAULT_IMAGE.to_string());

    view! {
        <div class="col-md-4 mb-4">
            <div class="card apartment-card h-100">
                <img src=image class="card-img-top" alt=apartment.name.clone() />
                <div class="card-body d-flex flex-column">
                    <h5 class="card-title">{apartment.name.clone()}</h5>
                    <div class="card-text mb-2">
                        <p class="mb-1">
                            "Floor: " {or_dash(apartment.floor_number)} ", Unit: " {apartment.unit_number.clone()}
                        </p>
                        <p class="mb-1">
                            <strong>"Size: "</strong> {or_dash(apartment.area)} " sq ft"
                        </p>
                        <p class="mb-1">
                            <strong>"Beds/Baths: "</strong>
                            {or_dash(apartment.bedrooms)} " / " {or_dash(apartment.bathrooms)}
                        </p>
                        <p class="mb-1">
                            <strong>"Monthly Rent: "</strong> {money(apartment.rent)}
                        </p>
                        <div class="mt-2">
                            <span class={if available { "badge bg-success" } else { "badge bg-danger" }}>
                                {if available { "Available" } else { "Not Available" }}
                            </span>
                        </div>
                    </div>
                    <div class="mt-auto d-flex gap-2">
                        {on_delete.map(|delete| view! {
                            <button class="btn btn-danger flex-grow-1" on:click=move |_| delete.run(id)>
                                "Delete"
                            </button>
                        })}
                        {on_book.filter(|_| available).map(|book| view! {
                            <button class="btn btn-primary flex-grow-1" on:click=move |_| book.run(id)>
                                "Request Booking"
                            </button>
                        })}
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 提交预订申请，结果写入提示条
pub fn request_booking(api: ApiGateway, apartment_id: i64, notice: RwSignal<Notice>) {
    spawn_local(async move {
        let request = BookApartmentRequest {
            apartment_id,
            move_in_date: None,
            message: None,
        };
        match api.book_apartment(request).await {
            Ok(booking) => {
                tracing::info!(booking = booking.id, apartment_id, "booking requested");
                notice.set(Some((
                    "Booking request submitted. Management will review it shortly.".to_string(),
                    false,
                )));
            }
            Err(e) => notice.set(Some((e.message, true))),
        }
    });
}
