//! Admin user list.

use dioxus::prelude::*;

use crate::app::client::use_admin_api;
use crate::app::components::{ErrorAlert, Modal, RegistrationForm, Spinner};
use crate::app::flash::use_flash;
use crate::app::guard::AdminPage;
use crate::app::modals::{use_modals, ModalKey};
use crate::app::models::{EntityId, User};
use crate::app::Route;

#[component]
pub fn ListUsers() -> Element {
    rsx! {
        AdminPage { title: "Users", nav_active: "users",
            UsersPanel {}
        }
    }
}

#[component]
fn UsersPanel() -> Element {
    let api = use_admin_api();
    let modals = use_modals();
    let flash = use_flash();
    let mut search = use_signal(String::new);
    let mut confirm_delete = use_signal(|| None::<EntityId>);

    let mut users = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.users().await }
        }
    });

    let delete = move |id: EntityId| {
        let api = api.clone();
        async move {
            confirm_delete.set(None);
            match api.delete_user(id).await {
                Ok(()) => {
                    flash.success("User deleted successfully!");
                    users.restart();
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to delete user: {e}")),
            }
        }
    };

    let list = match users.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| users.restart() }
            }
        }
        Some(Ok(list)) => list,
    };
    let needle = search();
    let needle = needle.trim();
    let rows: Vec<User> = list
        .items
        .into_iter()
        .filter(|u| needle.is_empty() || u.matches(needle))
        .collect();

    rsx! {
        div { class: "toolbar",
            h1 { "Users" }
            input {
                r#type: "search",
                placeholder: "Search by email or username",
                value: "{search}",
                oninput: move |e| search.set(e.value()),
            }
            button { class: "btn", onclick: move |_| modals.open(ModalKey::AddUser), "Add user" }
        }

        table { class: "data",
            thead {
                tr {
                    th { "Username" }
                    th { "Name" }
                    th { "Email" }
                    th { "Roles" }
                    th { "" }
                }
            }
            tbody {
                for user in rows {
                    if let Some(id) = user.entity_id() {
                        tr { key: "{id}",
                            td {
                                Link { to: Route::UserDetail { user_id: id }, "{user.username}" }
                            }
                            td { "{user.display_name()}" }
                            td { "{user.email}" }
                            td { "{user.roles_label()}" }
                            td {
                                Link { class: "btn btn-ghost btn-sm",
                                    to: Route::EditUser { user_id: id }, "Edit" }
                                if confirm_delete() == Some(id) {
                                    button { class: "btn btn-danger btn-sm",
                                        onclick: {
                                            let delete = delete.clone();
                                            move |_| delete(id)
                                        },
                                        "Confirm delete"
                                    }
                                    button { class: "btn btn-ghost btn-sm",
                                        onclick: move |_| confirm_delete.set(None), "Cancel" }
                                } else {
                                    button { class: "btn btn-danger btn-sm",
                                        onclick: move |_| confirm_delete.set(Some(id)), "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }

        Modal { modal: ModalKey::AddUser, title: "Add user",
            RegistrationForm {
                submit_label: "Add user",
                on_registered: move |_| {
                    flash.success("User added successfully!");
                    modals.close(ModalKey::AddUser);
                    users.restart();
                },
            }
        }
    }
}
