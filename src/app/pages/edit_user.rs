//! Admin user editor. Only changed fields are sent.

use dioxus::prelude::*;

use crate::app::client::use_admin_api;
use crate::app::components::{ErrorAlert, Spinner, TextField};
use crate::app::flash::use_flash;
use crate::app::guard::AdminPage;
use crate::app::models::{EntityId, UserDraft};
use crate::app::validation::{validate_user_update, ValidationErrors};
use crate::app::Route;

const MSG_NO_CHANGES: &str = "No changes detected.";

#[component]
pub fn EditUser(user_id: EntityId) -> Element {
    rsx! {
        AdminPage { title: "Edit user", nav_active: "users",
            UserEditorLoader { user_id }
        }
    }
}

#[component]
fn UserEditorLoader(user_id: EntityId) -> Element {
    let api = use_admin_api();

    let mut user = use_resource(use_reactive((&user_id,), move |(id,)| {
        let api = api.clone();
        async move { api.user(id).await }
    }));

    let state = user.read().clone();
    match state {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! {
            ErrorAlert { message: e.to_string(), on_retry: move |_| user.restart() }
        },
        Some(Ok(u)) => rsx! {
            UserEditor { user_id, initial: UserDraft::from(&u) }
        },
    }
}

#[component]
fn UserEditor(user_id: EntityId, initial: UserDraft) -> Element {
    let api = use_admin_api();
    let flash = use_flash();
    let nav = use_navigator();
    let mut draft = use_signal({
        let initial = initial.clone();
        move || initial
    });
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut notice = use_signal(|| None::<String>);
    let mut saving = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        let initial = initial.clone();
        async move {
            let Some(update) = draft.read().diff(&initial) else {
                notice.set(Some(MSG_NO_CHANGES.to_string()));
                return;
            };
            if let Err(e) = validate_user_update(&update) {
                errors.set(Some(e));
                return;
            }
            errors.set(None);
            notice.set(None);
            saving.set(true);
            match api.update_user(user_id, &update).await {
                Ok(()) => {
                    flash.success("User updated successfully!");
                    nav.push(Route::ListUsers {});
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => notice.set(Some(format!("Failed to update user: {e}"))),
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
    let d = draft.read().clone();

    rsx! {
        h1 { "Edit {d.username}" }
        form { onsubmit: submit, novalidate: true,
            if let Some(msg) = notice() {
                ErrorAlert { message: msg, on_dismiss: move |_| notice.set(None) }
            }
            TextField { label: "Username", value: d.username, error: err("username"),
                on_input: move |v| draft.write().username = v }
            TextField { label: "Email", input_type: "email", value: d.email, error: err("email"),
                on_input: move |v| draft.write().email = v }
            TextField { label: "Roles", value: d.roles, placeholder: "ROLE_USER, ROLE_ADMIN",
                on_input: move |v| draft.write().roles = v }
            TextField { label: "First name", value: d.firstname,
                on_input: move |v| draft.write().firstname = v }
            TextField { label: "Last name", value: d.secondname,
                on_input: move |v| draft.write().secondname = v }
            TextField { label: "Phone", input_type: "tel", value: d.tele, error: err("tele"),
                on_input: move |v| draft.write().tele = v }
            TextField { label: "Address", value: d.address,
                on_input: move |v| draft.write().address = v }
            TextField { label: "New password", input_type: "password", value: d.password,
                placeholder: "Leave empty to keep the current password",
                on_input: move |v| draft.write().password = v }
            button { class: "btn", r#type: "submit", disabled: saving(),
                if saving() { "Saving..." } else { "Save changes" }
            }
            Link { class: "btn btn-ghost", to: Route::ListUsers {}, "Cancel" }
        }
    }
}
