use dioxus::prelude::*;

#[component]
pub fn Spinner(#[props(default = "Loading...".to_string())] label: String) -> Element {
    rsx! {
        div { class: "spinner-container",
            div { class: "spinner" }
            div { class: "text-muted", "{label}" }
        }
    }
}
