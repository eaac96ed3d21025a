use crate::api::use_api;
use crate::auth::use_auth;
use crate::components::feedback::use_flash;
use crate::web::route::AppRoute;
use crate::web::router::Link;
use leptos::prelude::*;
use leptos::task::spawn_local;

pub const LOGIN_FAILED: &str = "Login failed. Please check your credentials.";

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let api = use_api();
    let notice = use_flash().take();

    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_is_submitting.set(true);

        let api = api.clone();
        spawn_local(async move {
            let result = api
                .login(email.get_untracked(), password.get_untracked())
                .await;
            set_is_submitting.set(false);

            match result {
                // 跳转到角色落地页由路由服务的会话监听完成
                Ok(response) => match auth.login(response.token) {
                    Ok(session) => {
                        tracing::debug!(landing = %AppRoute::landing_for(&session), "login accepted")
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "login returned an unusable token");
                        set_error_msg.set(Some(LOGIN_FAILED.to_string()));
                    }
                },
                Err(e) => set_error_msg.set(Some(e.message)),
            }
        });
    };

    view! {
        <div class="row justify-content-center mt-5">
            <div class="col-md-6">
                <div class="card">
                    <div class="card-header bg-primary text-white">
                        <h4 class="mb-0">"Login"</h4>
                    </div>
                    <div class="card-body">
                        {notice.map(|n| view! { <div class="alert alert-success" role="alert">{n}</div> })}
                        <Show when=move || error_msg.with(Option::is_some)>
                            <div class="alert alert-danger" role="alert">
                                {move || error_msg.get().unwrap_or_default()}
                            </div>
                        </Show>
                        <form on:submit=on_submit>
                            <div class="mb-3">
                                <label for="email" class="form-label">"Email"</label>
                                <input
                                    id="email"
                                    type="email"
                                    class="form-control"
                                    on:input=move |ev| set_email.set(event_target_value(&ev))
                                    prop:value=email
                                    required
                                />
                            </div>
                            <div class="mb-3">
                                <label for="password" class="form-label">"Password"</label>
                                <input
                                    id="password"
                                    type="password"
                                    class="form-control"
                                    on:input=move |ev| set_password.set(event_target_value(&ev))
                                    prop:value=password
                                    required
                                />
                            </div>
                            <div class="d-grid">
                                <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() { "Logging in..." } else { "Login" }}
                                </button>
                            </div>
                        </form>
                        <div class="mt-3 text-center">
                            <p>
                                "Don't have an account? "
                                <Link to=AppRoute::Register>"Register here"</Link>
                            </p>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}
