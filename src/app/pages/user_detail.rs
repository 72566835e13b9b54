//! Read-only admin view of one user.

use dioxus::prelude::*;

use crate::app::client::{use_admin_api, use_client_config};
use crate::app::components::{ErrorAlert, Spinner};
use crate::app::guard::AdminPage;
use crate::app::models::{EntityId, User};
use crate::app::Route;

#[component]
pub fn UserDetail(user_id: EntityId) -> Element {
    rsx! {
        AdminPage { title: "User", nav_active: "users",
            UserCard { user_id }
        }
    }
}

#[component]
fn UserCard(user_id: EntityId) -> Element {
    let api = use_admin_api();
    let config = use_client_config();

    let mut user = use_resource(use_reactive((&user_id,), move |(id,)| {
        let api = api.clone();
        async move { api.user(id).await }
    }));

    let user: User = match user.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| user.restart() }
            }
        }
        Some(Ok(u)) => u,
    };

    let field = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());

    rsx! {
        div { class: "toolbar",
            h1 { "{user.display_name()}" }
            Link { class: "btn", to: Route::EditUser { user_id }, "Edit" }
        }
        if let Some(url) = user.image_url.as_deref() {
            img { class: "avatar", src: config.asset_url(url), alt: "{user.username}" }
        }
        dl { class: "details",
            dt { "Username" }
            dd { "{user.username}" }
            dt { "Email" }
            dd { "{user.email}" }
            dt { "Roles" }
            dd { "{user.roles_label()}" }
            dt { "First name" }
            dd { {field(&user.firstname)} }
            dt { "Last name" }
            dd { {field(&user.secondname)} }
            dt { "CIN" }
            dd { {field(&user.cin)} }
            dt { "Address" }
            dd { {field(&user.address)} }
            dt { "Phone" }
            dd { {field(&user.tele)} }
        }
        Link { to: Route::ListUsers {}, "Back to users" }
    }
}
