use crate::auth::use_auth;
use crate::web::route::{AppRoute, nav_links};
use crate::web::router::{Link, use_router};
use leptos::prelude::*;

#[component]
pub fn Navbar() -> impl IntoView {
    let auth = use_auth();
    let router = use_router();
    let session = auth.session_signal();

    let is_authenticated = move || session.with(|s| s.is_authenticated());

    // 注销后回到首页
    let on_logout = move |_| {
        auth.logout();
        router.navigate_to(AppRoute::Home);
    };

    view! {
        <nav class="navbar navbar-expand-lg navbar-dark bg-primary">
            <div class="container">
                <Link to=AppRoute::Home class="navbar-brand">"Apartment Management System"</Link>
                <div class="collapse navbar-collapse show" id="navbarNav">
                    <ul class="navbar-nav me-auto">
                        {move || {
                            nav_links(&session.get())
                                .into_iter()
                                .map(|link| view! {
                                    <li class="nav-item">
                                        <Link to=link.route class="nav-link">{link.label}</Link>
                                    </li>
                                })
                                .collect_view()
                        }}
                    </ul>
                    <ul class="navbar-nav">
                        <Show
                            when=is_authenticated
                            fallback=|| view! {
                                <li class="nav-item">
                                    <Link to=AppRoute::Login class="nav-link">"Login"</Link>
                                </li>
                                <li class="nav-item">
                                    <Link to=AppRoute::Register class="nav-link">"Register"</Link>
                                </li>
                            }
                        >
                            <li class="nav-item">
                                <button class="btn btn-outline-light" on:click=on_logout>"Logout"</button>
                            </li>
                        </Show>
                    </ul>
                </div>
            </div>
        </nav>
    }
}
