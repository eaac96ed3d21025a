//! 认证模块
//!
//! 管理会话状态，与路由系统解耦。
//! 会话对象在 `App` 中创建并通过 Context 注入，
//! 令牌的读写只经过这里的 `restore` / `login` / `logout`。

use crate::api::TokenSource;
use crate::web::{KeyValueStore, LocalStorage};
use ams_shared::{DecodeError, Session};
use chrono::{DateTime, Utc};
use leptos::prelude::*;

/// 认证状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    /// 当前持有的令牌（仅在解码成功后存在）
    pub token: Option<String>,
    /// 由令牌派生的会话
    pub session: Session,
}

impl AuthState {
    /// 启动时从存储恢复
    ///
    /// 令牌无法解码或已过期时将其删除，按未认证处理。
    pub fn restore(store: &impl KeyValueStore, key: &str, now: DateTime<Utc>) -> Self {
        let Some(token) = store.get(key) else {
            return Self::default();
        };

        match Session::restore(&token, now) {
            Ok(session) => {
                tracing::info!(role = ?session.role(), "session restored from storage");
                Self {
                    token: Some(token),
                    session,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding stored token");
                store.delete(key);
                Self::default()
            }
        }
    }

    /// 登录成功后建立会话，解码失败时不持久化令牌
    pub fn establish(
        store: &impl KeyValueStore,
        key: &str,
        token: String,
        now: DateTime<Utc>,
    ) -> Result<Self, DecodeError> {
        let session = Session::restore(&token, now)?;
        if !store.set(key, &token) {
            tracing::warn!("token could not be persisted, session is memory-only");
        }
        Ok(Self {
            token: Some(token),
            session,
        })
    }

    pub fn clear(store: &impl KeyValueStore, key: &str) -> Self {
        store.delete(key);
        Self::default()
    }
}

/// 认证上下文
///
/// 包含会话信号与存储键名，通过 Context 在组件间共享。
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    storage_key: StoredValue<String>,
}

impl AuthContext {
    /// 创建认证上下文并从 LocalStorage 恢复会话
    pub fn restore(storage_key: &str) -> Self {
        let state = AuthState::restore(&LocalStorage, storage_key, Utc::now());
        Self {
            state: RwSignal::new(state),
            storage_key: StoredValue::new(storage_key.to_string()),
        }
    }

    /// 获取会话信号（用于路由服务注入）
    pub fn session_signal(&self) -> Signal<Session> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.session.clone()))
    }

    pub fn session(&self) -> Session {
        self.state.with(|s| s.session.clone())
    }

    /// 用登录响应中的令牌建立会话
    pub fn login(&self, token: String) -> Result<Session, DecodeError> {
        let key = self.storage_key.get_value();
        let next = AuthState::establish(&LocalStorage, &key, token, Utc::now())?;
        let session = next.session.clone();
        self.state.set(next);
        tracing::info!(role = ?session.role(), "logged in");
        Ok(session)
    }

    /// 注销并清除令牌
    ///
    /// 导航由路由服务的会话监听自动处理。
    pub fn logout(&self) {
        let key = self.storage_key.get_value();
        self.state.set(AuthState::clear(&LocalStorage, &key));
        tracing::info!("logged out");
    }
}

impl TokenSource for AuthContext {
    fn token(&self) -> Option<String> {
        self.state.with_untracked(|s| s.token.clone())
    }
}

/// 从 Context 获取认证上下文
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiGateway;
    use crate::web::route::AppRoute;
    use crate::web::{MemoryStorage, MockHttpClient};
    use ams_shared::Role;
    use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
    use chrono::Duration;
    use serde_json::json;

    const KEY: &str = "token";

    fn token(role: &str, exp: DateTime<Utc>) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256"}"#);
        let payload = URL_SAFE_NO_PAD.encode(json!({ "role": role, "exp": exp.timestamp() }).to_string());
        format!("{}.{}.sig", header, payload)
    }

    #[test]
    fn test_restore_without_token_is_anonymous() {
        let store = MemoryStorage::default();
        let state = AuthState::restore(&store, KEY, Utc::now());
        assert_eq!(state, AuthState::default());
    }

    #[test]
    fn test_restore_valid_token() {
        let store = MemoryStorage::default();
        let now = Utc::now();
        let t = token("RESIDENT", now + Duration::hours(2));
        store.set(KEY, &t);

        let state = AuthState::restore(&store, KEY, now);
        assert_eq!(state.token.as_deref(), Some(t.as_str()));
        assert_eq!(state.session.role(), Some(Role::Resident));
    }

    #[test]
    fn test_corrupt_token_is_discarded() {
        let store = MemoryStorage::default();
        store.set(KEY, "garbage");

        let state = AuthState::restore(&store, KEY, Utc::now());
        assert!(!state.session.is_authenticated());
        assert!(state.token.is_none());
        assert_eq!(store.get(KEY), None);
    }

    #[test]
    fn test_expired_token_is_discarded() {
        let store = MemoryStorage::default();
        let now = Utc::now();
        store.set(KEY, &token("ADMIN", now - Duration::seconds(1)));

        let state = AuthState::restore(&store, KEY, now);
        assert!(!state.session.is_authenticated());
        assert_eq!(store.get(KEY), None);
    }

    #[test]
    fn test_establish_persists_decodable_token() {
        let store = MemoryStorage::default();
        let now = Utc::now();
        let t = token("ADMIN", now + Duration::hours(1));

        let state = AuthState::establish(&store, KEY, t.clone(), now).unwrap();
        assert_eq!(state.session.role(), Some(Role::Admin));
        assert_eq!(store.get(KEY), Some(t));
    }

    #[test]
    fn test_establish_rejects_bad_token_without_persisting() {
        let store = MemoryStorage::default();
        let result = AuthState::establish(&store, KEY, "nope".into(), Utc::now());
        assert!(result.is_err());
        assert_eq!(store.get(KEY), None);
    }

    #[test]
    fn test_clear_removes_token() {
        let store = MemoryStorage::default();
        store.set(KEY, "x.y.z");
        let state = AuthState::clear(&store, KEY);
        assert_eq!(state, AuthState::default());
        assert_eq!(store.get(KEY), None);
    }

    #[tokio::test]
    async fn test_login_token_drives_session_and_landing() {
        let now = Utc::now();
        let t = token("RESIDENT", now + Duration::hours(1));
        let client = MockHttpClient::new();
        client.mock_response(
            "http://ams.test/api/auth/login",
            200,
            json!({ "token": t.clone(), "type": "Bearer" }),
        );
        let api = ApiGateway::new("http://ams.test/api", client, None::<String>);
        let store = MemoryStorage::default();

        let response = api.login("rin@example.com".into(), "pw".into()).await.unwrap();
        let state = AuthState::establish(&store, KEY, response.token, now).unwrap();

        assert_eq!(state.session.role(), Some(Role::Resident));
        assert_eq!(store.get(KEY), Some(t));
        assert_eq!(
            AppRoute::landing_for(&state.session),
            AppRoute::ResidentDashboard
        );
    }
}
