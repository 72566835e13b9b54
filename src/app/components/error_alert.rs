//! Inline error block for failed loads and submissions.

use dioxus::prelude::*;

/// Error shown in place of a page section or above a form.
///
/// `on_retry` runs the failed load again; `on_dismiss` only hides the message.
/// Load failures offer retry alone, since nothing is left to show once dismissed.
#[component]
pub fn ErrorAlert(
    message: String,
    #[props(default)] on_retry: Option<EventHandler<()>>,
    #[props(default)] on_dismiss: Option<EventHandler<()>>,
) -> Element {
    rsx! {
        div { class: "alert-error", role: "alert",
            span { "{message}" }
            div { class: "alert-actions",
                if let Some(retry) = on_retry {
                    button { class: "btn btn-sm", onclick: move |_| retry.call(()), "Retry" }
                }
                if let Some(dismiss) = on_dismiss {
                    button {
                        class: "btn btn-ghost btn-sm",
                        "aria-label": "Dismiss",
                        onclick: move |_| dismiss.call(()),
                        "×"
                    }
                }
            }
        }
    }
}
