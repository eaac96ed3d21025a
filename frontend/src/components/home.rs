use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;

const SERVICES: [(&str, &str); 3] = [
    (
        "Apartment Management",
        "Browse available apartments, view details, and request bookings with ease.",
    ),
    (
        "Complaint Resolution",
        "Raise complaints, track status, and get timely resolutions for maintenance issues.",
    ),
    (
        "Rent Payments",
        "Pay rent online, view payment history, and manage recurring payments.",
    ),
];

const ROLES: [(&str, &str, [&str; 4]); 3] = [
    (
        "Apartment Admin",
        "primary",
        [
            "Manage apartment listings",
            "Handle resident complaints",
            "Process rental applications",
            "Monitor payments",
        ],
    ),
    (
        "Resident",
        "success",
        [
            "View apartment details",
            "Raise maintenance complaints",
            "Pay rent online",
            "Track payment history",
        ],
    ),
    (
        "Visitor",
        "info",
        [
            "Browse available apartments",
            "View apartment details",
            "Request apartment booking",
            "Register as a resident",
        ],
    ),
];

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <div class="container">
            <div class="row mt-5 mb-5">
                <div class="col-md-8">
                    <h1 class="display-4 fw-bold">"Welcome to Apartment Management System"</h1>
                    <p class="lead">
                        "A comprehensive solution for apartment owners, residents, and visitors."
                    </p>
                    <p>
                        "Our platform offers a seamless experience for managing apartments, handling complaints, processing payments, and much more."
                    </p>
                    <div class="d-grid gap-2 d-md-flex justify-content-md-start">
                        <Link to=AppRoute::Apartments class="btn btn-primary btn-lg px-4 me-md-2">
                            "View Apartments"
                        </Link>
                        <Link to=AppRoute::Register class="btn btn-outline-primary btn-lg px-4">
                            "Register"
                        </Link>
                    </div>
                </div>
            </div>

            <div class="row mb-5">
                <div class="col-12 text-center mb-4">
                    <h2 class="fw-bold">"Our Services"</h2>
                    <p class="lead">"Discover what we offer"</p>
                </div>
                {SERVICES
                    .into_iter()
                    .map(|(title, text)| view! {
                        <div class="col-md-4 mb-4">
                            <div class="card h-100 shadow-sm">
                                <div class="card-body text-center">
                                    <h3 class="card-title">{title}</h3>
                                    <p class="card-text">{text}</p>
                                </div>
                            </div>
                        </div>
                    })
                    .collect_view()}
            </div>

            <div class="row mb-5 bg-light py-5 rounded-3">
                <div class="col-12 text-center mb-4">
                    <h2 class="fw-bold">"User Roles"</h2>
                    <p class="lead">"Different features for different users"</p>
                </div>
                {ROLES
                    .into_iter()
                    .map(|(title, color, features)| view! {
                        <div class="col-md-4 mb-4">
                            <div class={format!("card h-100 border-{}", color)}>
                                <div class={format!("card-header bg-{} text-white", color)}>{title}</div>
                                <div class="card-body">
                                    <ul class="list-group list-group-flush">
                                        {features
                                            .into_iter()
                                            .map(|f| view! { <li class="list-group-item">{f}</li> })
                                            .collect_view()}
                                    </ul>
                                </div>
                            </div>
                        </div>
                    })
                    .collect_view()}
            </div>
        </div>
    }
}
