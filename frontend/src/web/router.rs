//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，
//! 验证环节统一交给 `route::guard`。

use ams_shared::Session;
use chrono::{DateTime, Utc};
use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{Access, AppRoute, guard};

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 写入 History 状态（push 或 replace）
fn write_history_state(path: &str, use_push: bool) {
    let Some(history) = web_sys::window().and_then(|w| w.history().ok()) else {
        return;
    };
    let result = if use_push {
        history.push_state_with_url(&JsValue::NULL, "", Some(path))
    } else {
        history.replace_state_with_url(&JsValue::NULL, "", Some(path))
    };
    if let Err(e) = result {
        tracing::warn!(path, error = ?e, "history update failed");
    }
}

/// 对目标路由执行守卫，返回最终应展示的路由
fn resolve(target: AppRoute, session: &Session, now: DateTime<Utc>) -> AppRoute {
    match guard(target, session, now) {
        Access::Granted => target,
        Access::Redirect(redirect) => {
            tracing::info!(from = %target, to = %redirect, "[Router] redirecting");
            redirect
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 通过注入会话信号实现与认证系统的解耦。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    /// 会话状态（注入的信号，实现解耦）
    session: Signal<Session>,
    /// 令牌过期时的强制注销
    on_expired: Option<Callback<()>>,
}

impl RouterService {
    /// 创建新的路由服务
    ///
    /// 初始路由同样经过守卫，直接打开受保护地址时会被重定向。
    fn new(session: Signal<Session>, on_expired: Option<Callback<()>>) -> Self {
        let (current_route, set_route) = signal(AppRoute::default());
        let router = Self {
            current_route,
            set_route,
            session,
            on_expired,
        };

        let requested = AppRoute::from_path(&current_path());
        let initial_route = router.guarded(requested, &session.get_untracked());
        if initial_route != requested {
            write_history_state(initial_route.to_path(), false);
        }
        set_route.set(initial_route);
        router
    }

    /// 守卫目标路由；令牌已过期时先强制注销
    fn guarded(&self, target: AppRoute, session: &Session) -> AppRoute {
        let now = Utc::now();
        if session.is_expired(now) {
            tracing::info!("[Router] session expired, logging out");
            if let Some(on_expired) = self.on_expired {
                on_expired.run(());
            }
        }
        resolve(target, session, now)
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to(AppRoute::from_path(path));
    }

    pub fn navigate_to(&self, target: AppRoute) {
        let route = self.guarded(target, &self.session.get_untracked());
        if route != self.current_route.get_untracked() {
            write_history_state(route.to_path(), true);
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            let target = AppRoute::from_path(&current_path());
            // popstate 时也执行守卫逻辑
            let route = router.guarded(target, &router.session.get_untracked());
            if route != target {
                write_history_state(route.to_path(), false);
            }
            router.set_route.set(route);
        });

        if let Some(window) = web_sys::window() {
            if let Err(e) = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref())
            {
                tracing::warn!(error = ?e, "popstate listener not installed");
            }
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 会话变化时重新校验当前路由（登录离开登录页、注销离开受保护页）
    ///
    /// 登录后跳转落地页也由这里完成，用 replace 避免历史中出现重复条目。
    fn setup_session_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let session = router.session.get();
            let route = router.current_route.get_untracked();
            let resolved = router.guarded(route, &session);
            if resolved != route {
                write_history_state(resolved.to_path(), false);
                router.set_route.set(resolved);
            }
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: Signal<Session>, on_expired: Option<Callback<()>>) -> RouterService {
    let router = RouterService::new(session, on_expired);

    router.init_popstate_listener();
    router.setup_session_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 会话信号
    session: Signal<Session>,
    /// 导航时发现令牌过期的回调（通常是注销）
    #[prop(optional)]
    on_session_expired: Option<Callback<()>>,
    /// 子组件
    children: Children,
) -> impl IntoView {
    provide_router(session, on_session_expired);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由服务而不是整页跳转
#[component]
pub fn Link(
    /// 目标路由
    to: AppRoute,
    #[prop(optional, into)] class: String,
    children: Children,
) -> impl IntoView {
    let router = use_router();

    let on_click = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        router.navigate_to(to);
    };

    view! {
        <a href=to.to_path() class=class on:click=on_click>
            {children()}
        </a>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ams_shared::{Role, TokenClaims};
    use chrono::Duration;

    fn admin(expires_at: DateTime<Utc>) -> Session {
        Session::Authenticated(TokenClaims {
            role: Some(Role::Admin),
            expires_at,
            subject: None,
        })
    }

    #[test]
    fn test_fresh_login_is_sent_from_login_to_landing() {
        let now = Utc::now();
        let session = admin(now + Duration::hours(1));
        assert_eq!(resolve(AppRoute::Login, &session, now), AppRoute::AdminDashboard);
        assert_eq!(
            resolve(AppRoute::AdminDashboard, &session, now),
            AppRoute::AdminDashboard
        );
    }

    #[test]
    fn test_expired_session_resolves_to_login() {
        let now = Utc::now();
        let session = admin(now - Duration::minutes(1));
        assert_eq!(resolve(AppRoute::AdminDashboard, &session, now), AppRoute::Login);
    }
}
