use crate::api::use_api;
use crate::components::feedback::use_flash;
use crate::web::route::AppRoute;
use crate::web::router::{Link, use_router};
use ams_shared::protocol::RegisterRequest;
use leptos::prelude::*;
use leptos::task::spawn_local;

const REGISTERED: &str = "Registration successful! Please log in.";

/// 注册表单状态
#[derive(Clone, Copy)]
struct RegisterForm {
    first_name: RwSignal<String>,
    last_name: RwSignal<String>,
    email: RwSignal<String>,
    phone: RwSignal<String>,
    password: RwSignal<String>,
}

impl RegisterForm {
    fn new() -> Self {
        Self {
            first_name: RwSignal::new(String::new()),
            last_name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            phone: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
        }
    }

    /// 电话为空时不提交该字段
    fn to_request(&self) -> RegisterRequest {
        let phone = self.phone.get_untracked();
        RegisterRequest {
            first_name: self.first_name.get_untracked().trim().to_string(),
            last_name: self.last_name.get_untracked().trim().to_string(),
            email: self.email.get_untracked().trim().to_string(),
            password: self.password.get_untracked(),
            phone: (!phone.trim().is_empty()).then(|| phone.trim().to_string()),
        }
    }
}

#[component]
fn TextField(
    id: &'static str,
    label: &'static str,
    #[prop(default = "text")] kind: &'static str,
    #[prop(optional)] required: bool,
    value: RwSignal<String>,
) -> impl IntoView {
    view! {
        <div class="mb-3">
            <label for=id class="form-label">{label}</label>
            <input
                id=id
                type=kind
                class="form-control"
                on:input=move |ev| value.set(event_target_value(&ev))
                prop:value=value
                required=required
            />
        </div>
    }
}

#[component]
pub fn RegisterPage() -> impl IntoView {
    let api = use_api();
    let router = use_router();
    let flash = use_flash();

    let form = RegisterForm::new();
    let (is_submitting, set_is_submitting) = signal(false);
    let (error_msg, set_error_msg) = signal(Option::<String>::None);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        set_error_msg.set(None);
        set_is_submitting.set(true);

        let api = api.clone();
        let request = form.to_request();
        spawn_local(async move {
            let result = api.register(request).await;
            set_is_submitting.set(false);
            match result {
                Ok(()) => {
                    flash.push(REGISTERED);
                    router.navigate_to(AppRoute::Login);
                }
                Err(e) => set_error_msg.set(Some(e.message)),
            }
        });
    };

    view! {
        <div class="row justify-content-center mt-5">
            <div class="col-md-6">
                <div class="card">
                    <div class="card-header bg-primary text-white">
                        <h4 class="mb-0">"Register"</h4>
                    </div>
                    <div class="card-body">
                        <Show when=move || error_msg.with(Option::is_some)>
                            <div class="alert alert-danger" role="alert">
                                {move || error_msg.get().unwrap_or_default()}
                            </div>
                        </Show>
                        <form on:submit=on_submit>
                            <div class="row">
                                <div class="col-md-6">
                                    <TextField id="firstName" label="First Name" required=true value=form.first_name />
                                </div>
                                <div class="col-md-6">
                                    <TextField id="lastName" label="Last Name" required=true value=form.last_name />
                                </div>
                            </div>
                            <TextField id="email" label="Email" kind="email" required=true value=form.email />
                            <TextField id="phone" label="Phone" kind="tel" value=form.phone />
                            <TextField id="password" label="Password" kind="password" required=true value=form.password />
                            <div class="d-grid">
                                <button type="submit" class="btn btn-primary" disabled=move || is_submitting.get()>
                                    {move || if is_submitting.get() { "Registering..." } else { "Register" }}
                                </button>
                            </div>
                        </form>
                        <div class="mt-3 text-center">
                            <p>
                                "Already have an account? "
                                <Link to=AppRoute::Login>"Login here"</Link>
                            </p>
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_phone_is_omitted() {
        Owner::new().with(|| {
            let form = RegisterForm::new();
            form.first_name.set(" Ada ".into());
            form.last_name.set("Lovelace".into());
            form.email.set("ada@example.com".into());
            form.password.set("secret".into());
            form.phone.set("   ".into());

            let req = form.to_request();
            assert_eq!(req.first_name, "Ada");
            assert_eq!(req.phone, None);

            form.phone.set("555-0100".into());
            assert_eq!(form.to_request().phone.as_deref(), Some("555-0100"));
        });
    }
}
