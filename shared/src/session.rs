//! 会话模块
//!
//! 从不透明的 Bearer 令牌中解出角色声明与过期时间。
//! 客户端从不校验签名，真正的鉴权始终由外部服务完成。

use crate::Role;
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 令牌解码错误
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("token is not a three-part JWT")]
    Malformed,
    #[error("token payload is not valid base64url: {0}")]
    Encoding(String),
    #[error("token payload is not valid claims JSON: {0}")]
    Payload(String),
    #[error("token expiry {0} is out of range")]
    InvalidExpiry(i64),
    #[error("token expired at {0}")]
    Expired(DateTime<Utc>),
}

/// 令牌载荷中客户端关心的字段
#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    role: Option<String>,
    exp: i64,
    #[serde(default)]
    sub: Option<String>,
}

/// 解码后的令牌声明
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenClaims {
    /// 未知或缺失的角色声明记为 `None`
    pub role: Option<Role>,
    pub expires_at: DateTime<Utc>,
    pub subject: Option<String>,
}

/// 解码令牌（纯函数，无副作用）
pub fn decode(token: &str) -> Result<TokenClaims, DecodeError> {
    let mut segments = token.trim().split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(header), Some(payload), Some(_signature), None)
            if !header.is_empty() && !payload.is_empty() =>
        {
            payload
        }
        _ => return Err(DecodeError::Malformed),
    };

    // 部分签发方会保留 base64 填充
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| DecodeError::Encoding(e.to_string()))?;

    let raw: RawClaims =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Payload(e.to_string()))?;

    let expires_at =
        DateTime::from_timestamp(raw.exp, 0).ok_or(DecodeError::InvalidExpiry(raw.exp))?;

    let role = raw.role.as_deref().and_then(Role::from_claim);
    if role.is_none() {
        tracing::warn!(claim = ?raw.role, "token carries no recognised role");
    }

    Ok(TokenClaims {
        role,
        expires_at,
        subject: raw.sub,
    })
}

/// 客户端会话
///
/// 完全由令牌派生，自身不做持久化。
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Anonymous,
    Authenticated(TokenClaims),
}

impl Session {
    /// 从存储的令牌恢复会话，已过期的令牌同样视为解码失败
    pub fn restore(token: &str, now: DateTime<Utc>) -> Result<Self, DecodeError> {
        let claims = decode(token)?;
        if claims.expires_at <= now {
            return Err(DecodeError::Expired(claims.expires_at));
        }
        Ok(Self::Authenticated(claims))
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    /// 已认证且令牌在 `now` 时刻仍未过期
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self {
            Self::Authenticated(claims) => claims.expires_at > now,
            Self::Anonymous => false,
        }
    }

    /// 已认证但令牌在 `now` 时刻已过期，需要强制注销
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.is_authenticated() && !self.is_active(now)
    }

    pub fn role(&self) -> Option<Role> {
        match self {
            Self::Authenticated(claims) => claims.role,
            Self::Anonymous => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose::URL_SAFE;
    use chrono::Duration;
    use serde_json::{Value, json};

    fn make_token(claims: Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{}.{}.signature", header, payload)
    }

    fn in_one_hour() -> i64 {
        (Utc::now() + Duration::hours(1)).timestamp()
    }

    #[test]
    fn test_decode_role_and_expiry() {
        let exp = in_one_hour();
        let token = make_token(json!({ "sub": "ada@example.com", "role": "ADMIN", "exp": exp }));

        let claims = decode(&token).unwrap();
        assert_eq!(claims.role, Some(Role::Admin));
        assert_eq!(claims.expires_at.timestamp(), exp);
        assert_eq!(claims.subject.as_deref(), Some("ada@example.com"));
    }

    #[test]
    fn test_malformed_tokens_fail() {
        let cases = [
            "",
            "not-a-token",
            "a.b",
            "a.b.c.d",
            ".payload.sig",
            "header..sig",
            "header.@@@.sig",
        ];
        for token in cases {
            assert!(decode(token).is_err(), "expected failure for {:?}", token);
        }
    }

    #[test]
    fn test_payload_must_be_claims_json() {
        let header = URL_SAFE_NO_PAD.encode("{}");
        let not_json = URL_SAFE_NO_PAD.encode("hello");
        let token = format!("{}.{}.sig", header, not_json);
        assert!(matches!(decode(&token), Err(DecodeError::Payload(_))));

        let missing_exp = make_token(json!({ "role": "ADMIN" }));
        assert!(matches!(decode(&missing_exp), Err(DecodeError::Payload(_))));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let header = URL_SAFE.encode("{}");
        // 长度为 4 的倍数以外的载荷会带上 `=` 填充
        let payload = URL_SAFE.encode(r#"{"role":"VISITOR","exp":4102444800}"#);
        assert!(payload.ends_with('='));

        let token = format!("{}.{}.sig", header, payload);
        assert_eq!(decode(&token).unwrap().role, Some(Role::Visitor));
    }

    #[test]
    fn test_unknown_role_decodes_without_role() {
        let token = make_token(json!({ "role": "JANITOR", "exp": in_one_hour() }));
        assert_eq!(decode(&token).unwrap().role, None);
    }

    #[test]
    fn test_restore_rejects_expired_token() {
        let past = (Utc::now() - Duration::minutes(5)).timestamp();
        let token = make_token(json!({ "role": "RESIDENT", "exp": past }));

        assert!(decode(&token).is_ok());
        assert!(matches!(
            Session::restore(&token, Utc::now()),
            Err(DecodeError::Expired(_))
        ));
    }

    #[test]
    fn test_restore_valid_token() {
        let token = make_token(json!({ "role": "RESIDENT", "exp": in_one_hour() }));
        let session = Session::restore(&token, Utc::now()).unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Resident));
    }

    #[test]
    fn test_anonymous_session_has_no_role() {
        let session = Session::default();
        assert!(!session.is_authenticated());
        assert_eq!(session.role(), None);
    }

    #[test]
    fn test_session_lapses_once_expiry_passes() {
        let token = make_token(json!({ "role": "ADMIN", "exp": in_one_hour() }));
        let session = Session::restore(&token, Utc::now()).unwrap();

        assert!(session.is_active(Utc::now()));
        assert!(!session.is_expired(Utc::now()));

        let later = Utc::now() + Duration::hours(2);
        assert!(!session.is_active(later));
        assert!(session.is_expired(later));
        assert!(!Session::Anonymous.is_expired(later));
    }
}
