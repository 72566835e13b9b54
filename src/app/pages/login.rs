//! Customer and admin login pages.

use dioxus::prelude::*;

use crate::app::api::{ApiError, AuthMode};
use crate::app::client::use_api;
use crate::app::components::{ErrorAlert, Layout, TextField};
use crate::app::models::{Credentials, LoginResponse};
use crate::app::session::SessionKind;
use crate::app::validation::{validate_credentials, ValidationErrors};
use crate::app::Route;

#[component]
pub fn Login() -> Element {
    rsx! {
        Layout { title: "Log in", nav_active: "login",
            LoginForm { kind: SessionKind::User }
            p {
                Link { to: Route::ForgotPassword {}, "Forgot your password?" }
                " · "
                Link { to: Route::Register {}, "Create an account" }
            }
        }
    }
}

#[component]
pub fn AdminLogin() -> Element {
    let api = use_api(AuthMode::Anonymous);
    let nav = use_navigator();

    // Already signed in: straight to the back-office
    use_effect(move || {
        if api.tokens().get(SessionKind::Admin).is_some() {
            nav.replace(Route::ListUsers {});
        }
    });

    rsx! {
        document::Title { "Admin - Riad Booking" }
        document::Link { rel: "stylesheet", href: asset!("/public/riad.css") }
        main { style: "max-width:28rem;",
            h2 { "Riad Admin" }
            LoginForm { kind: SessionKind::Admin }
        }
    }
}

/// Token from a login response.
///
/// The admin endpoint reports failures in the body (`status`, `message`) even on 200.
fn accept_login(kind: SessionKind, response: LoginResponse) -> Result<String, String> {
    if kind.is_admin() && response.status.is_some_and(|s| s != 200) {
        return Err(response
            .message
            .unwrap_or_else(|| "Login failed. Please try again.".to_string()));
    }
    response
        .token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            response
                .message
                .unwrap_or_else(|| "Login failed. Please try again.".to_string())
        })
}

#[component]
fn LoginForm(kind: SessionKind) -> Element {
    let api = use_api(AuthMode::Anonymous);
    let nav = use_navigator();
    let mut credentials = use_signal(Credentials::default);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut failure = use_signal(|| None::<String>);
    let mut loading = use_signal(|| false);
    let mut show_password = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            let creds = credentials.read().clone();
            if let Err(e) = validate_credentials(&creds) {
                errors.set(Some(e));
                return;
            }
            errors.set(None);
            failure.set(None);
            loading.set(true);

            let result = match kind {
                SessionKind::Admin => api.admin_login(&creds).await,
                SessionKind::User => api.login(&creds).await,
            };
            match result.map_err(|e| match e {
                ApiError::Unauthorized(_) => "Invalid credentials".to_string(),
                other => other.to_string(),
            }) {
                Ok(response) => match accept_login(kind, response) {
                    Ok(token) => {
                        api.tokens().set(kind, &token);
                        tracing::debug!("Logged in ({})", kind.storage_key());
                        let next = match kind {
                            SessionKind::Admin => Route::ListUsers {},
                            SessionKind::User => Route::Home {},
                        };
                        nav.push(next);
                    }
                    Err(msg) => failure.set(Some(msg)),
                },
                Err(msg) => failure.set(Some(msg)),
            }
            loading.set(false);
        }
    };

    let err = move |field: &str| {
        errors
            .read()
            .as_ref()
            .and_then(|e| e.get(field))
            .map(str::to_string)
    };
    let creds = credentials.read().clone();

    rsx! {
        form { onsubmit: submit, novalidate: true,
            h1 { "Log in" }
            if let Some(msg) = failure() {
                ErrorAlert { message: msg, on_dismiss: move |_| failure.set(None) }
            }
            TextField {
                label: "Username",
                value: creds.username,
                error: err("username"),
                on_input: move |v| credentials.write().username = v,
            }
            TextField {
                label: "Password",
                input_type: if show_password() { "text".to_string() } else { "password".to_string() },
                value: creds.password,
                error: err("password"),
                on_input: move |v| credentials.write().password = v,
            }
            label {
                input {
                    r#type: "checkbox",
                    checked: show_password(),
                    onchange: move |e| show_password.set(e.checked()),
                }
                " Show password"
            }
            div { style: "margin-top:1rem;",
                button { class: "btn", r#type: "submit", disabled: loading(),
                    if loading() { "Signing in..." } else { "Log in" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_body_status_is_honoured() {
        let rejected = LoginResponse {
            token: None,
            status: Some(401),
            message: Some("Access denied".into()),
        };
        assert_eq!(
            accept_login(SessionKind::Admin, rejected),
            Err("Access denied".to_string())
        );

        let ok = LoginResponse {
            token: Some("jwt".into()),
            status: Some(200),
            message: None,
        };
        assert_eq!(accept_login(SessionKind::Admin, ok), Ok("jwt".to_string()));
    }

    #[test]
    fn user_login_needs_a_token() {
        assert!(accept_login(SessionKind::User, LoginResponse::default()).is_err());
        let ok = LoginResponse {
            token: Some("jwt".into()),
            ..Default::default()
        };
        assert_eq!(accept_login(SessionKind::User, ok), Ok("jwt".to_string()));
    }
}
