//! Password reset request page.

use dioxus::prelude::*;

use crate::app::api::AuthMode;
use crate::app::client::use_api;
use crate::app::components::{ErrorAlert, Layout, TextField};
use crate::app::validation::validate_reset_request;

#[component]
pub fn ForgotPassword() -> Element {
    let api = use_api(AuthMode::Anonymous);
    let mut email = use_signal(String::new);
    let mut field_error = use_signal(|| None::<String>);
    let mut failure = use_signal(|| None::<String>);
    let mut sent = use_signal(|| false);
    let mut sending = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            sent.set(false);
            failure.set(None);
            let address = match validate_reset_request(&email()) {
                Ok(address) => address,
                Err(e) => {
                    field_error.set(e.get("email").map(str::to_string));
                    return;
                }
            };
            field_error.set(None);
            sending.set(true);
            match api.request_password_reset(&address).await {
                Ok(()) => sent.set(true),
                Err(e) if e.is_cancelled() => return,
                Err(e) => failure.set(Some(e.to_string())),
            }
            sending.set(false);
        }
    };

    rsx! {
        Layout { title: "Forgot password",
            h1 { "Forgot your password?" }
            p { class: "text-muted", "Enter your email and we will send you a reset link." }
            if let Some(msg) = failure() {
                ErrorAlert { message: msg, on_dismiss: move |_| failure.set(None) }
            }
            if sent() {
                div { class: "alert-success", role: "status",
                    "Password reset link has been sent. Please check your email."
                }
            }
            form { onsubmit: submit, novalidate: true,
                TextField {
                    label: "Email",
                    input_type: "email",
                    value: email(),
                    error: field_error(),
                    on_input: move |v| email.set(v),
                }
                button { class: "btn", r#type: "submit", disabled: sending(),
                    if sending() { "Sending..." } else { "Send reset link" }
                }
            }
        }
    }
}
