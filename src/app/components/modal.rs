//! Modal dialog shell. Open state lives in the modal registry.

use dioxus::prelude::*;

use crate::app::modals::{use_modals, ModalKey};

/// Dialog rendered only while `modal` is open in the registry.
#[component]
pub fn Modal(modal: ModalKey, title: String, children: Element) -> Element {
    let modals = use_modals();

    if !modals.is_open(modal) {
        return rsx! {};
    }

    rsx! {
        div {
            class: "modal-backdrop",
            onclick: move |_| modals.close(modal),
            div {
                class: "modal",
                role: "dialog",
                "aria-modal": "true",
                onclick: move |evt| evt.stop_propagation(),
                header {
                    h3 { "{title}" }
                    button {
                        class: "btn btn-ghost btn-sm",
                        "aria-label": "Close",
                        onclick: move |_| modals.close(modal),
                        "×"
                    }
                }
                {children}
            }
        }
    }
}
