//! Reusable form input components.

use dioxus::prelude::*;

use crate::app::api::FileUpload;

/// A labeled input with an optional error line below it.
#[component]
pub fn TextField(
    /// Input label
    label: String,
    /// Current value
    value: String,
    /// Called with the new value on every keystroke
    on_input: EventHandler<String>,
    #[props(default = "text".to_string())] input_type: String,
    #[props(default)] placeholder: String,
    /// Validation message for this field
    error: Option<String>,
    #[props(default = false)] disabled: bool,
) -> Element {
    rsx! {
        label { class: "field",
            span { "{label}" }
            input {
                r#type: "{input_type}",
                value: "{value}",
                placeholder: "{placeholder}",
                disabled: disabled,
                "aria-invalid": error.is_some(),
                oninput: move |e| on_input.call(e.value()),
            }
            if let Some(ref err) = error {
                span { class: "field-error", "{err}" }
            }
        }
    }
}

/// Multi-line variant of [`TextField`].
#[component]
pub fn TextArea(
    label: String,
    value: String,
    on_input: EventHandler<String>,
    error: Option<String>,
    #[props(default = 4)] rows: u32,
) -> Element {
    rsx! {
        label { class: "field",
            span { "{label}" }
            textarea {
                rows: "{rows}",
                value: "{value}",
                "aria-invalid": error.is_some(),
                oninput: move |e| on_input.call(e.value()),
            }
            if let Some(ref err) = error {
                span { class: "field-error", "{err}" }
            }
        }
    }
}

/// File picker that reads the chosen file and hands over its bytes.
#[component]
pub fn FileInput(
    label: String,
    on_file: EventHandler<FileUpload>,
    #[props(default = "image/*".to_string())] accept: String,
    #[props(default = false)] disabled: bool,
) -> Element {
    rsx! {
        label { class: "field",
            span { "{label}" }
            input {
                r#type: "file",
                accept: "{accept}",
                disabled: disabled,
                onchange: move |evt: FormEvent| async move {
                    for file in evt.files() {
                        match file.read_bytes().await {
                            Ok(bytes) => on_file.call(FileUpload {
                                file_name: file.name(),
                                content_type: file.content_type(),
                                bytes: bytes.to_vec(),
                            }),
                            Err(e) => tracing::warn!("Failed to read {}: {}", file.name(), e),
                        }
                    }
                },
            }
        }
    }
}
