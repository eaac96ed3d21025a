//! 页面数据加载状态

use ams_shared::ApiError;

/// 单次拉取的三态结果，页面按它渲染加载中 / 错误 / 数据
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    Loading,
    Failed(ApiError),
    Loaded(T),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        Self::Loading
    }
}

impl<T> FetchState<T> {
    pub fn from_result(result: Result<T, ApiError>) -> Self {
        match result {
            Ok(data) => Self::Loaded(data),
            Err(e) => Self::Failed(e),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn error(&self) -> Option<&ApiError> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            Self::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

impl<T: Clone + Default> FetchState<T> {
    /// 已加载时返回数据，否则返回空集合
    ///
    /// 列表页失败时保持为空，错误信息单独展示。
    pub fn data_or_default(&self) -> T {
        self.data().cloned().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_list_stays_empty() {
        let state: FetchState<Vec<u32>> =
            FetchState::from_result(Err(ApiError::new("Unable to fetch apartments")));

        assert!(!state.is_loading());
        assert_eq!(state.data_or_default(), Vec::<u32>::new());
        assert_eq!(
            state.error().map(|e| e.message.as_str()),
            Some("Unable to fetch apartments")
        );
    }

    #[test]
    fn test_loaded_exposes_data() {
        let state = FetchState::from_result(Ok(vec![1, 2]));
        assert_eq!(state.data(), Some(&vec![1, 2]));
        assert!(state.error().is_none());
    }

    #[test]
    fn test_default_is_loading() {
        assert!(FetchState::<()>::default().is_loading());
    }
}
