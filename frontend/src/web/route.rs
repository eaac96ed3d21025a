//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、它们的访问要求，以及路由守卫的判定规则。
//!
//! 守卫只服务于界面体验，不是安全边界：真正的鉴权由外部服务在每个请求上完成。

use ams_shared::{Role, Session};
use chrono::{DateTime, Utc};
use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRoute {
    #[default]
    Home,
    Login,
    Register,
    Apartments,
    AdminDashboard,
    ResidentDashboard,
    VisitorDashboard,
    NewComplaint,
    Complaints,
    Payments,
    /// 页面未找到
    NotFound,
}

/// 路由的访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    Public,
    /// 需要登录；角色列表为空时任何已认证会话均可访问
    Protected(&'static [Role]),
}

/// 守卫判定结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Granted,
    Redirect(AppRoute),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        match path {
            "/" => Self::Home,
            "/login" => Self::Login,
            "/register" => Self::Register,
            "/apartments" => Self::Apartments,
            "/admin" => Self::AdminDashboard,
            "/resident" => Self::ResidentDashboard,
            "/visitor" => Self::VisitorDashboard,
            "/complaints/new" => Self::NewComplaint,
            "/complaints" => Self::Complaints,
            "/payments" => Self::Payments,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Apartments => "/apartments",
            Self::AdminDashboard => "/admin",
            Self::ResidentDashboard => "/resident",
            Self::VisitorDashboard => "/visitor",
            Self::NewComplaint => "/complaints/new",
            Self::Complaints => "/complaints",
            Self::Payments => "/payments",
            Self::NotFound => "/404",
        }
    }

    /// **核心守卫表：每个路由允许的角色**
    pub fn access(&self) -> RouteAccess {
        match self {
            Self::AdminDashboard => RouteAccess::Protected(&[Role::Admin]),
            Self::ResidentDashboard | Self::NewComplaint | Self::Payments => {
                RouteAccess::Protected(&[Role::Resident])
            }
            Self::VisitorDashboard => RouteAccess::Protected(&[Role::Visitor]),
            Self::Complaints => RouteAccess::Protected(&[Role::Admin, Role::Resident]),
            Self::Home | Self::Login | Self::Register | Self::Apartments | Self::NotFound => {
                RouteAccess::Public
            }
        }
    }

    /// 定义已认证用户是否应该离开此路由（登录、注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Register)
    }

    /// 登录后的落地页
    pub fn landing_for(session: &Session) -> Self {
        match session.role() {
            Some(Role::Admin) => Self::AdminDashboard,
            Some(Role::Resident) => Self::ResidentDashboard,
            Some(Role::Visitor) => Self::VisitorDashboard,
            None => Self::Home,
        }
    }

    /// 认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 角色不匹配时的重定向目标
    pub fn forbidden_redirect() -> Self {
        Self::Home
    }
}

/// 按访问要求判定会话在 `now` 时刻能否进入
///
/// 令牌已过期的会话按未登录处理。
pub fn check(access: RouteAccess, session: &Session, now: DateTime<Utc>) -> Access {
    match access {
        RouteAccess::Public => Access::Granted,
        RouteAccess::Protected(_) if !session.is_active(now) => {
            Access::Redirect(AppRoute::auth_failure_redirect())
        }
        RouteAccess::Protected(roles)
            if !roles.is_empty() && !session.role().is_some_and(|r| roles.contains(&r)) =>
        {
            Access::Redirect(AppRoute::forbidden_redirect())
        }
        RouteAccess::Protected(_) => Access::Granted,
    }
}

/// 路由守卫：当前会话在 `now` 时刻能否进入目标路由
pub fn guard(route: AppRoute, session: &Session, now: DateTime<Utc>) -> Access {
    if route.should_redirect_when_authenticated() && session.is_active(now) {
        return Access::Redirect(AppRoute::landing_for(session));
    }
    check(route.access(), session, now)
}

/// 导航栏中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub route: AppRoute,
    pub label: &'static str,
}

const fn link(route: AppRoute, label: &'static str) -> NavLink {
    NavLink { route, label }
}

/// 按会话返回导航栏链接
pub fn nav_links(session: &Session) -> Vec<NavLink> {
    let mut links = vec![
        link(AppRoute::Home, "Home"),
        link(AppRoute::Apartments, "Apartments"),
    ];
    if session.is_authenticated() {
        match session.role() {
            Some(Role::Admin) => links.extend([
                link(AppRoute::AdminDashboard, "Admin Dashboard"),
                link(AppRoute::Complaints, "Complaints"),
            ]),
            Some(Role::Resident) => links.extend([
                link(AppRoute::ResidentDashboard, "Resident Dashboard"),
                link(AppRoute::Complaints, "My Complaints"),
                link(AppRoute::Payments, "Payments"),
            ]),
            Some(Role::Visitor) => {
                links.push(link(AppRoute::VisitorDashboard, "Visitor Dashboard"))
            }
            None => {}
        }
    }
    links
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ams_shared::TokenClaims;
    use chrono::Duration;

    const ALL_ROUTES: [AppRoute; 11] = [
        AppRoute::Home,
        AppRoute::Login,
        AppRoute::Register,
        AppRoute::Apartments,
        AppRoute::AdminDashboard,
        AppRoute::ResidentDashboard,
        AppRoute::VisitorDashboard,
        AppRoute::NewComplaint,
        AppRoute::Complaints,
        AppRoute::Payments,
        AppRoute::NotFound,
    ];

    fn session(role: Option<Role>) -> Session {
        Session::Authenticated(TokenClaims {
            role,
            expires_at: Utc::now() + Duration::hours(1),
            subject: None,
        })
    }

    #[test]
    fn test_paths_round_trip() {
        for route in ALL_ROUTES.into_iter().filter(|r| *r != AppRoute::NotFound) {
            assert_eq!(AppRoute::from_path(route.to_path()), route);
        }
        assert_eq!(AppRoute::from_path("/complaints/"), AppRoute::Complaints);
        assert_eq!(AppRoute::from_path("/residents"), AppRoute::NotFound);
    }

    #[test]
    fn test_anonymous_is_sent_to_login_from_every_protected_page() {
        let anon = Session::Anonymous;
        for route in ALL_ROUTES {
            let expected = match route.access() {
                RouteAccess::Protected(_) => Access::Redirect(AppRoute::Login),
                RouteAccess::Public => Access::Granted,
            };
            assert_eq!(guard(route, &anon, Utc::now()), expected, "route {}", route);
        }
    }

    #[test]
    fn test_admin_token_on_resident_and_admin_pages() {
        let admin = session(Some(Role::Admin));
        assert_eq!(
            guard(AppRoute::ResidentDashboard, &admin, Utc::now()),
            Access::Redirect(AppRoute::Home)
        );
        assert_eq!(guard(AppRoute::AdminDashboard, &admin, Utc::now()), Access::Granted);
        assert_eq!(guard(AppRoute::Complaints, &admin, Utc::now()), Access::Granted);
    }

    #[test]
    fn test_roles_outside_allowed_set_go_home() {
        for role in Role::ALL {
            let s = session(Some(role));
            for route in ALL_ROUTES {
                if let RouteAccess::Protected(roles) = route.access() {
                    let expected = if roles.contains(&role) {
                        Access::Granted
                    } else {
                        Access::Redirect(AppRoute::Home)
                    };
                    assert_eq!(guard(route, &s, Utc::now()), expected, "{} on {}", role, route);
                }
            }
        }
    }

    #[test]
    fn test_unknown_role_is_kept_out_of_role_pages() {
        let s = session(None);
        assert_eq!(
            guard(AppRoute::Payments, &s, Utc::now()),
            Access::Redirect(AppRoute::Home)
        );
        assert_eq!(guard(AppRoute::Apartments, &s, Utc::now()), Access::Granted);
    }

    #[test]
    fn test_empty_role_set_admits_any_authenticated_session() {
        let any = RouteAccess::Protected(&[]);
        assert_eq!(check(any, &session(None), Utc::now()), Access::Granted);
        for role in Role::ALL {
            assert_eq!(check(any, &session(Some(role)), Utc::now()), Access::Granted);
        }
        assert_eq!(
            check(any, &Session::Anonymous, Utc::now()),
            Access::Redirect(AppRoute::Login)
        );
    }

    #[test]
    fn test_authenticated_users_leave_login_for_landing() {
        assert_eq!(
            guard(AppRoute::Login, &session(Some(Role::Visitor)), Utc::now()),
            Access::Redirect(AppRoute::VisitorDashboard)
        );
        assert_eq!(
            guard(AppRoute::Register, &session(None), Utc::now()),
            Access::Redirect(AppRoute::Home)
        );
        assert_eq!(guard(AppRoute::Login, &Session::Anonymous, Utc::now()), Access::Granted);
    }

    #[test]
    fn test_landing_follows_role() {
        assert_eq!(
            AppRoute::landing_for(&session(Some(Role::Admin))),
            AppRoute::AdminDashboard
        );
        assert_eq!(
            AppRoute::landing_for(&session(Some(Role::Resident))),
            AppRoute::ResidentDashboard
        );
        assert_eq!(AppRoute::landing_for(&Session::Anonymous), AppRoute::Home);
    }

    #[test]
    fn test_nav_links_follow_role() {
        let labels = |s: &Session| nav_links(s).iter().map(|l| l.label).collect::<Vec<_>>();
        assert_eq!(labels(&Session::Anonymous), vec!["Home", "Apartments"]);
        assert_eq!(
            labels(&session(Some(Role::Resident))),
            vec![
                "Home",
                "Apartments",
                "Resident Dashboard",
                "My Complaints",
                "Payments"
            ]
        );
    }

    #[test]
    fn test_expired_token_is_treated_as_logged_out() {
        let expired = Session::Authenticated(TokenClaims {
            role: Some(Role::Admin),
            expires_at: Utc::now() - Duration::hours(1),
            subject: None,
        });
        assert_eq!(
            guard(AppRoute::AdminDashboard, &expired, Utc::now()),
            Access::Redirect(AppRoute::Login)
        );
        assert_eq!(guard(AppRoute::Login, &expired, Utc::now()), Access::Granted);
    }

    #[test]
    fn test_guard_reads_expiry_at_navigation_time() {
        let resident = session(Some(Role::Resident));
        let later = Utc::now() + Duration::hours(2);
        assert_eq!(guard(AppRoute::Payments, &resident, Utc::now()), Access::Granted);
        assert_eq!(
            guard(AppRoute::Payments, &resident, later),
            Access::Redirect(AppRoute::Login)
        );
    }
}
