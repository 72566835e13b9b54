//! Dioxus single-page application.
//!
//! `App` sets up the shared context (client config, flash channel, modal
//! registry) once at the root and hands over to the router.

use dioxus::prelude::*;

pub mod api;
pub mod cancel;
pub mod client;
pub mod components;
pub mod flash;
pub mod guard;
pub mod modals;
pub mod models;
pub mod pages;
pub mod session;
pub mod validation;

use client::use_config_provider;
use components::{FlashBanner, Spinner};
use flash::use_flash_provider;
use modals::use_modal_provider;
use pages::{
    AdminLogin, AdminRiads, EditUser, ForgotPassword, Home, ListRooms, ListUsers, Login,
    NotFound, PasswordReset, Profile, Register, Reservations, RiadDetail, Unauthorized,
    UserDetail,
};

/// Root app component with routing
#[component]
pub fn App() -> Element {
    // Runtime config first: the flash duration and API base come from it
    let config = use_config_provider();

    use_flash_provider(config.config);
    use_modal_provider();

    if !(config.loaded)() {
        return rsx! { Spinner {} };
    }

    rsx! {
        FlashBanner {}
        Router::<Route> {}
    }
}

/// Application routes
#[derive(Clone, Routable, Debug, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/")]
    Home {},
    #[route("/login")]
    Login {},
    #[route("/register")]
    Register {},
    #[route("/forgotPassword")]
    ForgotPassword {},
    #[route("/password-reset")]
    PasswordReset {},
    #[route("/riad/:id")]
    RiadDetail { id: u64 },
    #[route("/profile")]
    Profile {},

    #[route("/admin")]
    AdminLogin {},
    #[redirect("/admin/riads", || Route::AdminRiads {})]
    #[route("/listRiads")]
    AdminRiads {},
    #[route("/listRooms")]
    ListRooms {},
    #[route("/listUsers")]
    ListUsers {},
    #[route("/users/:user_id")]
    UserDetail { user_id: u64 },
    #[route("/edit-user/:user_id")]
    EditUser { user_id: u64 },
    #[route("/reservations")]
    Reservations {},

    #[route("/unauthorized")]
    Unauthorized {},
    #[route("/:..segments")]
    NotFound { segments: Vec<String> },
}
