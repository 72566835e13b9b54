//! Root-level banner for the flash channel.

use dioxus::prelude::*;

use crate::app::flash::use_flash;

/// Renders the current flash message, if any, fixed at the top of the page.
#[component]
pub fn FlashBanner() -> Element {
    let flash = use_flash();

    let Some(message) = flash.visible() else {
        return rsx! {};
    };

    rsx! {
        div {
            class: message.kind.css_class(),
            role: "alert",
            "aria-live": "assertive",
            span { "{message.text}" }
            button {
                "aria-label": "Close",
                onclick: move |_| flash.dismiss(),
                "×"
            }
        }
    }
}
