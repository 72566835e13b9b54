//! New password form reached from the reset email.

use std::time::Duration;

use dioxus::prelude::*;

use crate::app::api::AuthMode;
use crate::app::client::use_api;
use crate::app::components::{ErrorAlert, Layout, TextField};
use crate::app::models::PasswordReset as ResetBody;
use crate::app::validation::{validate_password_reset, ValidationErrors};
use crate::app::Route;

/// Pause on the success message before going to the login page
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
const REDIRECT_DELAY: Duration = Duration::from_secs(2);

#[component]
pub fn PasswordReset() -> Element {
    let api = use_api(AuthMode::Anonymous);
    let nav = use_navigator();
    let mut password = use_signal(String::new);
    let mut confirmation = use_signal(String::new);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut failure = use_signal(|| None::<String>);
    let mut done = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            let body = ResetBody {
                new_password: password(),
                confirmation: confirmation(),
            };
            if let Err(e) = validate_password_reset(&body) {
                errors.set(Some(e));
                return;
            }
            errors.set(None);
            failure.set(None);
            match api.reset_password(&body).await {
                Ok(()) => {
                    password.set(String::new());
                    confirmation.set(String::new());
                    done.set(true);
                    #[cfg(target_arch = "wasm32")]
                    gloo_timers::future::sleep(REDIRECT_DELAY).await;
                    nav.push(Route::Login {});
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => failure.set(Some(e.to_string())),
            }
        }
    };

    let err = move |field: &str| {
        errors
            .read()
            .as_ref()
            .and_then(|e| e.get(field))
            .map(str::to_string)
    };

    rsx! {
        Layout { title: "Reset password",
            h1 { "Reset password" }
            if let Some(msg) = failure() {
                ErrorAlert { message: msg, on_dismiss: move |_| failure.set(None) }
            }
            if done() {
                div { class: "alert-success", role: "status", "Password reset successful" }
            }
            form { onsubmit: submit, novalidate: true,
                TextField {
                    label: "New password",
                    input_type: "password",
                    value: password(),
                    error: err("new_password"),
                    on_input: move |v| password.set(v),
                }
                TextField {
                    label: "Confirm password",
                    input_type: "password",
                    value: confirmation(),
                    error: err("confirmation"),
                    on_input: move |v| confirmation.set(v),
                }
                button { class: "btn", r#type: "submit", "Reset password" }
            }
        }
    }
}
