//! Unauthorized and not-found pages.

use dioxus::prelude::*;

use crate::app::components::Layout;
use crate::app::Route;

#[component]
pub fn Unauthorized() -> Element {
    rsx! {
        Layout { title: "Unauthorized",
            section { class: "status",
                h1 { "403" }
                p { "You do not have permission to access this page." }
                Link { class: "btn", to: Route::Home {}, "Back to home" }
            }
        }
    }
}

#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    let path = format!("/{}", segments.join("/"));
    tracing::debug!("No route for {}", path);

    rsx! {
        Layout { title: "Not found",
            section { class: "status",
                h1 { "404" }
                p { "Nothing here at " code { "{path}" } "." }
                Link { class: "btn", to: Route::Home {}, "Back to home" }
            }
        }
    }
}
