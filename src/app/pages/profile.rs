//! Customer profile with avatar upload.

use dioxus::prelude::*;

use crate::app::api::{AuthMode, FileUpload};
use crate::app::client::{use_api, use_client_config};
use crate::app::components::{ErrorAlert, FileInput, Spinner};
use crate::app::flash::use_flash;
use crate::app::guard::UserPage;
use crate::app::session::SessionKind;

#[component]
pub fn Profile() -> Element {
    rsx! {
        UserPage { title: "Profile", nav_active: "profile",
            ProfileCard {}
        }
    }
}

#[component]
fn ProfileCard() -> Element {
    let api = use_api(AuthMode::Required(SessionKind::User));
    let config = use_client_config();
    let flash = use_flash();
    let mut busy = use_signal(|| false);

    let mut user = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.current_user().await }
        }
    });

    let upload = {
        let api = api.clone();
        move |file: FileUpload| {
            let api = api.clone();
            spawn(async move {
                busy.set(true);
                match api.upload_profile_image(file).await {
                    Ok(_) => {
                        flash.success("Profile image updated!");
                        user.restart();
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => flash.error(format!("Failed to upload image: {e}")),
                }
                busy.set(false);
            });
        }
    };

    let current = match user.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| user.restart() }
            }
        }
        Some(Ok(u)) => u,
    };

    let remove_image = {
        let user_id = current.entity_id();
        move |_: MouseEvent| {
            let api = api.clone();
            async move {
                let Some(id) = user_id else {
                    return;
                };
                busy.set(true);
                match api.delete_profile_image(id).await {
                    Ok(()) => {
                        flash.info("Profile image removed.");
                        user.restart();
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => flash.error(format!("Failed to delete image: {e}")),
                }
                busy.set(false);
            }
        }
    };

    rsx! {
        h1 { "{current.display_name()}" }
        section { class: "profile",
            if let Some(url) = current.image_url.as_deref() {
                img { class: "avatar", src: config.asset_url(url), alt: "{current.username}" }
                button { class: "btn btn-danger btn-sm", disabled: busy(), onclick: remove_image,
                    "Remove photo"
                }
            }
            FileInput { label: "Upload a photo", accept: "image/*", disabled: busy(), on_file: upload }
        }
        dl { class: "details",
            dt { "Username" }
            dd { "{current.username}" }
            dt { "Email" }
            dd { "{current.email}" }
            if let Some(tele) = current.tele.as_deref() {
                dt { "Phone" }
                dd { "{tele}" }
            }
            if let Some(address) = current.address.as_deref() {
                dt { "Address" }
                dd { "{address}" }
            }
        }
    }
}
