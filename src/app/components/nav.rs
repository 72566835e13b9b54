//! Navigation bars.

use dioxus::prelude::*;

use crate::app::api::AuthMode;
use crate::app::client::use_api;
use crate::app::flash::use_flash;
use crate::app::session::SessionKind;
use crate::app::Route;

/// Link that is highlighted when `id == active`
#[component]
fn NavLink(to: Route, id: &'static str, label: &'static str, active: String) -> Element {
    rsx! {
        li {
            if active == id {
                Link { to: to, "aria-current": "page", "{label}" }
            } else {
                Link { to: to, "{label}" }
            }
        }
    }
}

/// Navigation bar for public and customer pages.
#[component]
pub fn PublicNav(#[props(default)] active: String) -> Element {
    let api = use_api(AuthMode::Optional(SessionKind::User));
    let nav = use_navigator();
    let flash = use_flash();
    let mut logged_in = use_signal({
        let api = api.clone();
        move || api.tokens().get(SessionKind::User).is_some()
    });

    let logout = move |_: MouseEvent| {
        let api = api.clone();
        async move {
            if let Err(e) = api.logout().await {
                tracing::warn!("Logout request failed: {}", e);
            }
            api.tokens().clear(SessionKind::User);
            logged_in.set(false);
            flash.info("You have been logged out.");
            nav.push(Route::Home {});
        }
    };

    rsx! {
        nav { class: "topbar",
            ul {
                li {
                    Link { to: Route::Home {}, strong { "Riad Booking" } }
                }
            }
            ul {
                NavLink { to: Route::Home {}, id: "home", label: "Riads", active: active.clone() }
                if logged_in() {
                    NavLink { to: Route::Profile {}, id: "profile", label: "My profile", active: active.clone() }
                    li {
                        button { class: "btn btn-ghost btn-sm", onclick: logout, "Sign out" }
                    }
                } else {
                    NavLink { to: Route::Login {}, id: "login", label: "Log in", active: active.clone() }
                    NavLink { to: Route::Register {}, id: "register", label: "Register", active: active.clone() }
                }
            }
        }
    }
}

/// Back-office navigation bar with the signed-in admin and a logout button.
#[component]
pub fn AdminNav(#[props(default)] active: String) -> Element {
    let api = use_api(AuthMode::Optional(SessionKind::Admin));
    let nav = use_navigator();

    let me = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.current_user().await.ok() }
        }
    });

    let logout = move |_: MouseEvent| {
        let api = api.clone();
        async move {
            if let Err(e) = api.logout().await {
                tracing::warn!("Logout request failed: {}", e);
            }
            api.tokens().clear(SessionKind::Admin);
            nav.push(Route::AdminLogin {});
        }
    };

    let who = me
        .read()
        .clone()
        .flatten()
        .map(|u| u.display_name())
        .unwrap_or_default();

    rsx! {
        nav { class: "topbar",
            ul {
                li { strong { "Riad Admin" } }
            }
            ul {
                NavLink { to: Route::AdminRiads {}, id: "riads", label: "Riads", active: active.clone() }
                NavLink { to: Route::ListRooms {}, id: "rooms", label: "Rooms", active: active.clone() }
                NavLink { to: Route::ListUsers {}, id: "users", label: "Users", active: active.clone() }
                NavLink { to: Route::Reservations {}, id: "reservations", label: "Reservations", active: active.clone() }
                if !who.is_empty() {
                    li { span { class: "text-muted", "{who}" } }
                }
                li {
                    button { class: "btn btn-ghost btn-sm", onclick: logout, "Sign out" }
                }
            }
        }
    }
}
