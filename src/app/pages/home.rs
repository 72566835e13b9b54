//! Public landing page: header and the riad grid.

use dioxus::prelude::*;

use crate::app::api::AuthMode;
use crate::app::client::{use_api, use_client_config};
use crate::app::components::{ErrorAlert, Layout, Spinner};
use crate::app::models::Riad;
use crate::app::Route;

#[component]
pub fn Home() -> Element {
    let api = use_api(AuthMode::Anonymous);

    let mut riads = use_resource(move || {
        let api = api.clone();
        async move { api.riads().await }
    });

    let content = match riads.read().clone() {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! {
            ErrorAlert { message: e.to_string(), on_retry: move |_| riads.restart() }
        },
        Some(Ok(list)) if list.items.is_empty() => rsx! {
            p { class: "text-muted", "No riads available yet." }
        },
        Some(Ok(list)) => rsx! {
            div { class: "grid",
                for riad in list.items {
                    RiadCard { key: "{riad.entity_id().unwrap_or_default()}", riad }
                }
            }
        },
    };

    rsx! {
        Layout { title: "Riads", nav_active: "home",
            header { style: "padding:2rem 0;",
                h1 { "Find your riad" }
                p { class: "text-muted",
                    "Traditional guesthouses around an inner courtyard, booked directly with the owners."
                }
            }
            {content}
        }
    }
}

#[component]
fn RiadCard(riad: Riad) -> Element {
    let config = use_client_config();
    let cover = riad
        .image
        .as_deref()
        .or_else(|| riad.images.first().and_then(|i| i.image_url.as_deref()))
        .map(|path| config.asset_url(path));

    rsx! {
        article { class: "card",
            if let Some(src) = cover {
                img { src: "{src}", alt: "{riad.name}" }
            }
            div { class: "body",
                h3 { "{riad.name}" }
                p { class: "text-muted", "{riad.city}" }
                if let Some(price) = riad.price {
                    p { "From {price:.0} MAD / night" }
                }
                if let Some(id) = riad.entity_id() {
                    Link { to: Route::RiadDetail { id }, "View rooms" }
                }
            }
        }
    }
}
