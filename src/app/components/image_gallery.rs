//! Image grid with upload and per-image delete, used by the riad and room image modals.

use dioxus::prelude::*;

use super::form_inputs::FileInput;
use crate::app::api::FileUpload;
use crate::app::client::use_client_config;
use crate::app::models::{EntityId, Image};

#[component]
pub fn ImageGallery(
    images: Vec<Image>,
    on_upload: EventHandler<FileUpload>,
    on_delete: EventHandler<EntityId>,
    /// Disable the controls while a request is running
    #[props(default = false)]
    busy: bool,
) -> Element {
    let config = use_client_config();

    rsx! {
        FileInput { label: "Add image", on_file: on_upload, disabled: busy }

        if images.is_empty() {
            p { class: "text-muted", "No images yet." }
        } else {
            div { class: "gallery",
                for image in images {
                    figure { key: "{image.entity_id().unwrap_or_default()}",
                        if let Some(url) = image.image_url.as_deref() {
                            img { src: config.asset_url(url), alt: image.alt_text() }
                        }
                        if let Some(id) = image.entity_id() {
                            button {
                                class: "btn btn-danger btn-sm",
                                disabled: busy,
                                onclick: move |_| on_delete.call(id),
                                "Delete"
                            }
                        }
                    }
                }
            }
        }
    }
}
