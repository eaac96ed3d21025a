//! 公寓管理前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `web::route`: 路由定义与角色守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）
//! - `auth`: 会话状态管理
//! - `api`: API 网关
//! - `components`: UI 组件层

mod api;
mod auth;
mod config;
mod fetch_state;
mod components {
    pub mod admin_dashboard;
    mod apartment_card;
    pub mod apartment_list;
    pub mod complaint_form;
    pub mod complaint_list;
    pub mod feedback;
    mod format;
    pub mod home;
    pub mod login;
    pub mod navbar;
    pub mod payment_page;
    pub mod register;
    pub mod resident_dashboard;
    pub mod visitor_dashboard;
}

use crate::api::ApiGateway;
use crate::auth::AuthContext;
use crate::components::admin_dashboard::AdminDashboardPage;
use crate::components::apartment_list::ApartmentListPage;
use crate::components::complaint_form::ComplaintFormPage;
use crate::components::complaint_list::ComplaintListPage;
use crate::components::feedback::Flash;
use crate::components::home::HomePage;
use crate::components::login::LoginPage;
use crate::components::navbar::Navbar;
use crate::components::payment_page::PaymentPage;
use crate::components::register::RegisterPage;
use crate::components::resident_dashboard::ResidentDashboardPage;
use crate::components::visitor_dashboard::VisitorDashboardPage;
use crate::config::ClientConfig;

use leptos::prelude::*;

// 原生 Web API 封装模块
// 此模块提供对浏览器原生 API 的轻量级封装，替代 gloo-* 系列 crate，
// 以减小 WASM 二进制体积。
pub(crate) mod web {
    mod console;
    mod http;
    pub mod route;
    pub mod router;
    mod storage;

    pub use console::init_logging;
    #[cfg(test)]
    pub use http::MockHttpClient;
    pub use http::{FetchClient, HttpClient, HttpError, HttpRequest, HttpResponse};
    #[cfg(test)]
    pub use storage::MemoryStorage;
    pub use storage::{KeyValueStore, LocalStorage};
}

use web::route::AppRoute;
use web::router::{Router, RouterOutlet};
use web::{FetchClient, LocalStorage};

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::Home => view! { <HomePage /> }.into_any(),
        AppRoute::Login => view! { <LoginPage /> }.into_any(),
        AppRoute::Register => view! { <RegisterPage /> }.into_any(),
        AppRoute::Apartments => view! { <ApartmentListPage /> }.into_any(),
        AppRoute::AdminDashboard => view! { <AdminDashboardPage /> }.into_any(),
        AppRoute::ResidentDashboard => view! { <ResidentDashboardPage /> }.into_any(),
        AppRoute::VisitorDashboard => view! { <VisitorDashboardPage /> }.into_any(),
        AppRoute::NewComplaint => view! { <ComplaintFormPage /> }.into_any(),
        AppRoute::Complaints => view! { <ComplaintListPage /> }.into_any(),
        AppRoute::Payments => view! { <PaymentPage /> }.into_any(),
        AppRoute::NotFound => view! {
            <div class="text-center mt-5">
                <h1 class="display-1 fw-bold text-danger">"404"</h1>
                <p class="lead">"Page not found"</p>
            </div>
        }
        .into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 加载配置并初始化日志
    let config = ClientConfig::load(&LocalStorage);
    web::init_logging(&config.log_filter);
    tracing::info!(api = %config.api_base_url, "starting client");

    // 2. 创建认证上下文（从 LocalStorage 恢复会话）
    let auth_ctx = AuthContext::restore(&config.token_storage_key);
    provide_context(auth_ctx);

    // 3. API 网关通过认证上下文读取令牌
    provide_context(ApiGateway::new(&config.api_base_url, FetchClient, auth_ctx));
    provide_context(Flash::new());

    // 4. 获取会话信号，用于注入路由服务（解耦！）
    let session = auth_ctx.session_signal();
    let on_session_expired = Callback::new(move |_: ()| auth_ctx.logout());

    view! {
        // 5. 路由器组件：注入会话信号实现守卫，令牌过期时强制注销
        <Router session=session on_session_expired=on_session_expired>
            <Navbar />
            <div class="container mt-4">
                <RouterOutlet matcher=route_matcher />
            </div>
        </Router>
    }
}
