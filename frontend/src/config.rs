//! 客户端配置
//!
//! 编译期通过 `AMS_API_URL` / `AMS_LOG` 覆盖默认值，
//! 运行期可在 LocalStorage 中写入 `ams_api_url` 指向其他后端。

use crate::web::KeyValueStore;

pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_LOG_FILTER: &str = "info";
/// 令牌在 LocalStorage 中的固定键名
pub const TOKEN_STORAGE_KEY: &str = "token";
pub const API_URL_STORAGE_KEY: &str = "ams_api_url";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub token_storage_key: String,
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: normalize_base_url(option_env!("AMS_API_URL").unwrap_or(DEFAULT_API_URL)),
            token_storage_key: TOKEN_STORAGE_KEY.to_string(),
            log_filter: option_env!("AMS_LOG")
                .unwrap_or(DEFAULT_LOG_FILTER)
                .to_string(),
        }
    }
}

impl ClientConfig {
    /// 加载配置：编译期默认值，叠加存储中的后端地址覆盖
    pub fn load(store: &impl KeyValueStore) -> Self {
        let config = Self::default();
        match store.get(API_URL_STORAGE_KEY) {
            Some(url) if !url.trim().is_empty() => config.with_base_url(&url),
            _ => config,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.api_base_url = normalize_base_url(url);
        self
    }
}

fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::MemoryStorage;

    #[test]
    fn test_base_url_is_normalized() {
        let config = ClientConfig::default().with_base_url(" https://ams.example.com/api/ ");
        assert_eq!(config.api_base_url, "https://ams.example.com/api");
    }

    #[test]
    fn test_stored_url_overrides_default() {
        let store = MemoryStorage::default();
        store.set(API_URL_STORAGE_KEY, "http://10.0.0.5:8080/api/");

        let config = ClientConfig::load(&store);
        assert_eq!(config.api_base_url, "http://10.0.0.5:8080/api");
        assert_eq!(config.token_storage_key, "token");
    }

    #[test]
    fn test_blank_stored_url_is_ignored() {
        let store = MemoryStorage::default();
        store.set(API_URL_STORAGE_KEY, "   ");

        assert_eq!(ClientConfig::load(&store), ClientConfig::default());
    }
}
