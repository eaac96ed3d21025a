//! 通用反馈组件：加载指示、错误提示与跨页面提示消息

use leptos::prelude::*;
use std::time::Duration;

/// 操作结果提示：消息内容, 是否出错
pub type Notice = Option<(String, bool)>;

#[component]
pub fn LoadingSpinner(#[prop(into)] label: String) -> impl IntoView {
    view! {
        <div class="container mt-5 text-center">
            <div class="spinner-border text-primary" role="status">
                <span class="visually-hidden">"Loading..."</span>
            </div>
            <p class="mt-3">{label}</p>
        </div>
    }
}

/// 页面内错误提示，可选"重试"按钮
#[component]
pub fn ErrorAlert(
    #[prop(into)] message: String,
    #[prop(optional)] on_retry: Option<Callback<()>>,
) -> impl IntoView {
    view! {
        <div class="alert alert-danger" role="alert">
            {message}
            {on_retry.map(|retry| view! {
                <button class="btn btn-outline-danger ms-3" on:click=move |_| retry.run(())>
                    "Retry"
                </button>
            })}
        </div>
    }
}

const NOTICE_TTL: Duration = Duration::from_secs(3);

/// 可取消的延时任务
///
/// 重新设定时先清除上一个定时器；所属组件卸载时自动清除。
#[derive(Clone, Copy)]
pub struct PendingTimer(StoredValue<Option<TimeoutHandle>>);

impl PendingTimer {
    pub fn new() -> Self {
        let timer = Self(StoredValue::new(None));
        on_cleanup(move || timer.cancel());
        timer
    }

    pub fn arm(&self, callback: impl FnOnce() + 'static, delay: Duration) {
        if self.0.is_disposed() {
            return;
        }
        match set_timeout_with_handle(callback, delay) {
            Ok(handle) => {
                if let Some(previous) = self.replace(Some(handle)) {
                    previous.clear();
                }
            }
            Err(e) => tracing::warn!(error = ?e, "timer not scheduled"),
        }
    }

    pub fn cancel(&self) {
        if let Some(previous) = self.replace(None) {
            previous.clear();
        }
    }

    /// 存入新句柄，返回待清除的旧句柄
    fn replace(&self, next: Option<TimeoutHandle>) -> Option<TimeoutHandle> {
        self.0
            .try_update_value(|slot| std::mem::replace(slot, next))
            .flatten()
    }
}

impl Default for PendingTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// 操作结果提示条，3 秒后自动消失
#[component]
pub fn Notification(notice: RwSignal<Notice>) -> impl IntoView {
    let timer = PendingTimer::new();
    Effect::new(move |_| {
        if notice.with(Option::is_some) {
            timer.arm(move || notice.set(None), NOTICE_TTL);
        } else {
            timer.cancel();
        }
    });

    view! {
        <Show when=move || notice.with(Option::is_some)>
            <div
                class=move || {
                    if notice.with(|n| n.as_ref().is_some_and(|(_, is_err)| *is_err)) {
                        "alert alert-danger"
                    } else {
                        "alert alert-success"
                    }
                }
                role="alert"
            >
                {move || notice.with(|n| n.as_ref().map(|(msg, _)| msg.clone()).unwrap_or_default())}
            </div>
        </Show>
    }
}

/// 跨页面的一次性提示（例如注册成功后在登录页显示）
#[derive(Clone, Copy)]
pub struct Flash(RwSignal<Option<String>>);

impl Flash {
    pub fn new() -> Self {
        Self(RwSignal::new(None))
    }

    pub fn push(&self, message: impl Into<String>) {
        self.0.set(Some(message.into()));
    }

    /// 取出并清空提示
    pub fn take(&self) -> Option<String> {
        self.0.try_update(Option::take).flatten()
    }
}

impl Default for Flash {
    fn default() -> Self {
        Self::new()
    }
}

pub fn use_flash() -> Flash {
    use_context::<Flash>().expect("Flash should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_is_consumed_once() {
        let owner = Owner::new();
        owner.with(|| {
            let flash = Flash::new();
            flash.push("Registration successful! Please log in.");
            assert_eq!(
                flash.take().as_deref(),
                Some("Registration successful! Please log in.")
            );
            assert_eq!(flash.take(), None);
        });
    }

    #[test]
    fn test_rearming_hands_back_previous_timer() {
        let owner = Owner::new();
        owner.with(|| {
            let timer = PendingTimer::new();
            assert_eq!(timer.replace(Some(TimeoutHandle(1))), None);
            assert_eq!(timer.replace(Some(TimeoutHandle(2))), Some(TimeoutHandle(1)));
            assert_eq!(timer.replace(None), Some(TimeoutHandle(2)));
        });
    }
}
