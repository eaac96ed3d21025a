//! 表单状态管理模块
//!
//! 将零散的 signal 整合为 `FormState` 结构体，负责：
//! - 数据的持有
//! - 数据的重置
//! - 数据到请求对象的转换

use ams_shared::protocol::CreateComplaintRequest;
use ams_shared::{ComplaintCategory, ComplaintPriority};
use leptos::prelude::*;

/// 表单状态结构体
///
/// 使用 `RwSignal` 因为它实现了 `Copy` trait，非常适合作为 Props 在组件间传递。
#[derive(Clone, Copy)]
pub struct FormState {
    pub title: RwSignal<String>,
    pub description: RwSignal<String>,
    pub category: RwSignal<ComplaintCategory>,
    pub priority: RwSignal<ComplaintPriority>,
}

impl FormState {
    /// 创建新的表单状态，类别默认"维修"，优先级默认"中"
    pub fn new() -> Self {
        Self {
            title: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            category: RwSignal::new(ComplaintCategory::Maintenance),
            priority: RwSignal::new(ComplaintPriority::Medium),
        }
    }

    /// 重置表单到初始状态
    pub fn reset(&self) {
        self.title.set(String::new());
        self.description.set(String::new());
        self.category.set(ComplaintCategory::Maintenance);
        self.priority.set(ComplaintPriority::Medium);
    }

    /// 将表单状态转换为 API 请求对象
    pub fn to_request(&self) -> CreateComplaintRequest {
        CreateComplaintRequest {
            title: self.title.get_untracked().trim().to_string(),
            description: self.description.get_untracked().trim().to_string(),
            category: self.category.get_untracked(),
            priority: self.priority.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_carries_selected_values() {
        Owner::new().with(|| {
            let state = FormState::new();
            state.title.set("  Leaking tap ".into());
            state.description.set("Kitchen tap drips all night".into());
            state.category.set(ComplaintCategory::Plumbing);
            state.priority.set(ComplaintPriority::High);

            let req = state.to_request();
            assert_eq!(req.title, "Leaking tap");
            assert_eq!(req.category, ComplaintCategory::Plumbing);
            assert_eq!(req.priority, ComplaintPriority::High);
        });
    }

    #[test]
    fn test_reset_restores_defaults() {
        Owner::new().with(|| {
            let state = FormState::new();
            state.title.set("x".into());
            state.priority.set(ComplaintPriority::Critical);
            state.reset();

            let req = state.to_request();
            assert!(req.title.is_empty());
            assert_eq!(req.category, ComplaintCategory::Maintenance);
            assert_eq!(req.priority, ComplaintPriority::Medium);
        });
    }
}
