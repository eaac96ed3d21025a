//! 付款页（住户）：提交付款并查看历史记录

use crate::api::use_api;
use crate::components::feedback::{ErrorAlert, LoadingSpinner, Notice, Notification};
use crate::components::format::{date, money, payment_badge};
use crate::fetch_state::FetchState;
use ams_shared::protocol::MakePaymentRequest;
use ams_shared::{Payment, PaymentType};
use leptos::prelude::*;
use leptos::task::spawn_local;

const PAYMENT_METHODS: [(&str, &str); 3] = [
    ("CREDIT_CARD", "Credit Card"),
    ("DEBIT_CARD", "Debit Card"),
    ("BANK_TRANSFER", "Bank Transfer"),
];

#[derive(Clone, Copy)]
struct PaymentForm {
    payment_type: RwSignal<PaymentType>,
    amount: RwSignal<String>,
    description: RwSignal<String>,
    method: RwSignal<String>,
}

impl PaymentForm {
    fn new() -> Self {
        Self {
            payment_type: RwSignal::new(PaymentType::Rent),
            amount: RwSignal::new(String::new()),
            description: RwSignal::new(String::new()),
            method: RwSignal::new(PAYMENT_METHODS[0].0.to_string()),
        }
    }

    fn reset(&self) {
        self.payment_type.set(PaymentType::Rent);
        self.amount.set(String::new());
        self.description.set(String::new());
        self.method.set(PAYMENT_METHODS[0].0.to_string());
    }

    /// 金额必须是正数，否则返回 `None`
    fn to_request(&self) -> Option<MakePaymentRequest> {
        let amount: f64 = self.amount.get_untracked().trim().parse().ok()?;
        if !amount.is_finite() || amount <= 0.0 {
            return None;
        }
        let description = self.description.get_untracked();
        Some(MakePaymentRequest {
            payment_type: self.payment_type.get_untracked(),
            amount,
            description: (!description.trim().is_empty()).then(|| description.trim().to_string()),
            payment_method: self.method.get_untracked(),
        })
    }
}

#[component]
pub fn PaymentPage() -> impl IntoView {
    let api = use_api();
    let form = PaymentForm::new();
    let history = RwSignal::new(FetchState::<Vec<Payment>>::Loading);
    let notice = RwSignal::new(Notice::None);
    let (submitting, set_submitting) = signal(false);

    let load = {
        let api = api.clone();
        Callback::new(move |_: ()| {
            let api = api.clone();
            history.set(FetchState::Loading);
            spawn_local(async move {
                history.set(FetchState::from_result(api.payment_history().await));
            });
        })
    };

    load.run(());

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        let Some(request) = form.to_request() else {
            notice.set(Some(("Please enter a valid amount.".to_string(), true)));
            return;
        };

        set_submitting.set(true);
        let api = api.clone();
        spawn_local(async move {
            match api.make_payment(request).await {
                Ok(payment) => {
                    history.update(|s| {
                        if let FetchState::Loaded(list) = s {
                            list.insert(0, payment);
                        }
                    });
                    form.reset();
                    notice.set(Some(("Payment submitted successfully!".to_string(), false)));
                }
                Err(e) => notice.set(Some((e.message, true))),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="container mt-4">
            <h1 class="mb-4">"Payments"</h1>
            <Notification notice=notice />

            <div class="row">
                <div class="col-md-5 mb-4">
                    <div class="card">
                        <div class="card-header bg-primary text-white">
                            <h5 class="mb-0">"Make a Payment"</h5>
                        </div>
                        <div class="card-body">
                            <form on:submit=on_submit>
                                <div class="mb-3">
                                    <label for="paymentType" class="form-label">"Payment Type"</label>
                                    <select
                                        id="paymentType"
                                        class="form-select"
                                        on:change=move |ev| {
                                            if let Some(t) = PaymentType::parse(&event_target_value(&ev)) {
                                                form.payment_type.set(t);
                                            }
                                        }
                                        prop:value=move || form.payment_type.get().as_str()
                                    >
                                        {PaymentType::SELECTABLE
                                            .into_iter()
                                            .map(|t| view! { <option value=t.as_str()>{t.label()}</option> })
                                            .collect_view()}
                                    </select>
                                </div>
                                <div class="mb-3">
                                    <label for="amount" class="form-label">"Amount ($)"</label>
                                    <input
                                        id="amount"
                                        type="number"
                                        min="0.01"
                                        step="0.01"
                                        class="form-control"
                                        on:input=move |ev| form.amount.set(event_target_value(&ev))
                                        prop:value=move || form.amount.get()
                                        required
                                    />
                                </div>
                                <div class="mb-3">
                                    <label for="paymentMethod" class="form-label">"Payment Method"</label>
                                    <select
                                        id="paymentMethod"
                                        class="form-select"
                                        on:change=move |ev| form.method.set(event_target_value(&ev))
                                        prop:value=move || form.method.get()
                                    >
                                        {PAYMENT_METHODS
                                            .into_iter()
                                            .map(|(value, label)| view! { <option value=value>{label}</option> })
                                            .collect_view()}
                                    </select>
                                </div>
                                <div class="mb-3">
                                    <label for="paymentDescription" class="form-label">"Description"</label>
                                    <input
                                        id="paymentDescription"
                                        type="text"
                                        class="form-control"
                                        on:input=move |ev| form.description.set(event_target_value(&ev))
                                        prop:value=move || form.description.get()
                                    />
                                </div>
                                <div class="d-grid">
                                    <button type="submit" class="btn btn-primary" disabled=move || submitting.get()>
                                        {move || if submitting.get() { "Processing..." } else { "Pay Now" }}
                                    </button>
                                </div>
                            </form>
                        </div>
                    </div>
                </div>

                <div class="col-md-7 mb-4">
                    <div class="card">
                        <div class="card-header bg-success text-white">
                            <h5 class="mb-0">"Payment History"</h5>
                        </div>
                        <div class="card-body">
                            {move || match history.get() {
                                FetchState::Loading => view! { <LoadingSpinner label="Loading payments..." /> }.into_any(),
                                FetchState::Failed(e) => view! { <ErrorAlert message=e.message on_retry=load /> }.into_any(),
                                FetchState::Loaded(list) if list.is_empty() => view! {
                                    <p class="text-center mt-3">"No payment history available"</p>
                                }
                                .into_any(),
                                FetchState::Loaded(list) => view! { <PaymentTable payments=list /> }.into_any(),
                            }}
                        </div>
                    </div>
                </div>
            </div>
        </div>
    }
}

/// 付款记录表格，住户面板复用
#[component]
pub fn PaymentTable(payments: Vec<Payment>) -> impl IntoView {
    view! {
        <div class="table-responsive">
            <table class="table table-hover">
                <thead>
                    <tr>
                        <th>"Date"</th>
                        <th>"Type"</th>
                        <th>"Description"</th>
                        <th>"Status"</th>
                        <th class="text-end">"Amount"</th>
                    </tr>
                </thead>
                <tbody>
                    {payments
                        .into_iter()
                        .map(|p| view! {
                            <tr>
                                <td>{date(p.payment_date.or(p.due_date))}</td>
                                <td>{p.payment_type.label()}</td>
                                <td>{p.description.unwrap_or_default()}</td>
                                <td><span class=payment_badge(p.status)>{p.status.label()}</span></td>
                                <td class="text-end">{money(p.amount)}</td>
                            </tr>
                        })
                        .collect_view()}
                </tbody>
            </table>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_positive() {
        Owner::new().with(|| {
            let form = PaymentForm::new();
            assert!(form.to_request().is_none());

            form.amount.set("-5".into());
            assert!(form.to_request().is_none());

            form.amount.set("1200.50".into());
            form.payment_type.set(PaymentType::Deposit);
            let req = form.to_request().unwrap();
            assert_eq!(req.amount, 1200.5);
            assert_eq!(req.payment_type, PaymentType::Deposit);
            assert_eq!(req.payment_method, "CREDIT_CARD");
            assert_eq!(req.description, None);
        });
    }
}
