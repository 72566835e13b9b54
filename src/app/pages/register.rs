//! Customer sign-up page.

use dioxus::prelude::*;

use crate::app::components::{Layout, RegistrationForm};
use crate::app::flash::use_flash;
use crate::app::Route;

#[component]
pub fn Register() -> Element {
    let flash = use_flash();
    let nav = use_navigator();

    rsx! {
        Layout { title: "Register", nav_active: "register",
            h1 { "Create an account" }
            RegistrationForm {
                submit_label: "Register",
                on_registered: move |_| {
                    flash.success("Registration successful. You can now log in.");
                    nav.push(Route::Login {});
                },
            }
            p {
                "Already registered? "
                Link { to: Route::Login {}, "Log in" }
            }
        }
    }
}
