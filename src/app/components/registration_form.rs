//! Account registration form, shared by the sign-up page and the admin "add user" modal.

use dioxus::prelude::*;

use super::error_alert::ErrorAlert;
use super::form_inputs::TextField;
use crate::app::api::AuthMode;
use crate::app::client::use_api;
use crate::app::models::Registration;
use crate::app::validation::{validate_registration, ValidationErrors};

#[component]
pub fn RegistrationForm(
    /// Label of the submit button
    submit_label: String,
    /// Called after the backend accepted the registration
    on_registered: EventHandler<()>,
) -> Element {
    let api = use_api(AuthMode::Anonymous);
    let mut form = use_signal(Registration::default);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut failure = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            let body = form.read().clone();
            if let Err(e) = validate_registration(&body) {
                errors.set(Some(e));
                return;
            }
            errors.set(None);
            saving.set(true);
            match api.register(&body).await {
                Ok(()) => {
                    form.set(Registration::default());
                    failure.set(None);
                    on_registered.call(());
                }
                Err(e) if e.is_cancelled() => return,
                Err(e) => failure.set(Some(e.to_string())),
            }
            saving.set(false);
        }
    };

    let err = move |field: &str| {
        errors
            .read()
            .as_ref()
            .and_then(|e| e.get(field))
            .map(str::to_string)
    };
    let f = form.read().clone();

    rsx! {
        form { onsubmit: submit, novalidate: true,
            if let Some(msg) = failure() {
                ErrorAlert { message: msg, on_dismiss: move |_| failure.set(None) }
            }
            TextField { label: "Username", value: f.username, error: err("username"),
                on_input: move |v| form.write().username = v }
            TextField { label: "Email", input_type: "email", value: f.email, error: err("email"),
                on_input: move |v| form.write().email = v }
            TextField { label: "Password", input_type: "password", value: f.password, error: err("password"),
                on_input: move |v| form.write().password = v }
            TextField { label: "Confirm password", input_type: "password", value: f.password_confirmation,
                error: err("password_confirmation"),
                on_input: move |v| form.write().password_confirmation = v }
            TextField { label: "First name", value: f.firstname, error: err("firstname"),
                on_input: move |v| form.write().firstname = v }
            TextField { label: "Last name", value: f.secondname, error: err("secondname"),
                on_input: move |v| form.write().secondname = v }
            TextField { label: "CIN", value: f.cin, error: err("cin"),
                on_input: move |v| form.write().cin = v }
            TextField { label: "Address", value: f.address, error: err("address"),
                on_input: move |v| form.write().address = v }
            TextField { label: "Phone", input_type: "tel", value: f.tele, error: err("tele"),
                placeholder: "+212 6 12 34 56 78",
                on_input: move |v| form.write().tele = v }
            button { class: "btn", r#type: "submit", disabled: saving(),
                if saving() { "Saving..." } else { "{submit_label}" }
            }
        }
    }
}
