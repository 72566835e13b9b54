//! Admin riad management: table, add/edit modals, images, rooms.

use dioxus::prelude::*;

use crate::app::api::FileUpload;
use crate::app::client::use_admin_api;
use crate::app::components::{
    ErrorAlert, FileInput, ImageGallery, Modal, RoomFields, Spinner, TextArea, TextField,
};
use crate::app::flash::use_flash;
use crate::app::guard::AdminPage;
use crate::app::modals::{use_modals, ModalKey};
use crate::app::models::{EntityId, Riad, RiadForm, RoomForm};
use crate::app::validation::{validate_riad, validate_room, ValidationErrors};

#[component]
pub fn AdminRiads() -> Element {
    rsx! {
        AdminPage { title: "Riads", nav_active: "riads",
            RiadsPanel {}
        }
    }
}

/// Case-insensitive match on name, city or address
fn riad_matches(riad: &Riad, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty()
        || riad.name.to_lowercase().contains(&needle)
        || riad.city.to_lowercase().contains(&needle)
        || riad.address.to_lowercase().contains(&needle)
}

#[component]
fn RiadsPanel() -> Element {
    let api = use_admin_api();
    let modals = use_modals();
    let flash = use_flash();
    let mut search = use_signal(String::new);
    let mut confirm_delete = use_signal(|| None::<EntityId>);

    let mut riads = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.riads().await }
        }
    });

    // Per-row modal state must not outlive its row
    use_effect(move || {
        if let Some(Ok(list)) = &*riads.read() {
            let ids: Vec<EntityId> = list.items.iter().filter_map(Riad::entity_id).collect();
            modals.prune_riads(&ids);
        }
    });

    let delete = move |id: EntityId| {
        let api = api.clone();
        async move {
            confirm_delete.set(None);
            match api.delete_riad(id).await {
                Ok(()) => {
                    flash.success("Riad deleted successfully!");
                    riads.restart();
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to delete riad: {e}")),
            }
        }
    };

    let list = match riads.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| riads.restart() }
            }
        }
        Some(Ok(list)) => list,
    };
    let needle = search();
    let rows: Vec<Riad> = list
        .items
        .into_iter()
        .filter(|r| riad_matches(r, &needle))
        .collect();

    rsx! {
        div { class: "toolbar",
            h1 { "Riads" }
            input {
                r#type: "search",
                placeholder: "Search by name or city",
                value: "{search}",
                oninput: move |e| search.set(e.value()),
            }
            button { class: "btn", onclick: move |_| modals.open(ModalKey::AddRiad), "Add riad" }
        }

        table { class: "data",
            thead {
                tr {
                    th { "Name" }
                    th { "City" }
                    th { "Address" }
                    th { "Rooms" }
                    th { "" }
                }
            }
            tbody {
                for riad in rows.clone() {
                    if let Some(id) = riad.entity_id() {
                        tr { key: "{id}",
                            td { "{riad.name}" }
                            td { "{riad.city}" }
                            td { "{riad.address}" }
                            td { "{riad.rooms.len()}" }
                            td {
                                button { class: "btn btn-ghost btn-sm",
                                    onclick: move |_| modals.open(ModalKey::EditRiad(id)), "Edit" }
                                button { class: "btn btn-ghost btn-sm",
                                    onclick: move |_| modals.open(ModalKey::RiadImages(id)), "Images" }
                                button { class: "btn btn-ghost btn-sm",
                                    onclick: move |_| modals.open(ModalKey::RiadRooms(id)), "Rooms" }
                                button { class: "btn btn-ghost btn-sm",
                                    onclick: move |_| modals.open(ModalKey::AddRoom { riad: id }), "Add room" }
                                if confirm_delete() == Some(id) {
                                    button { class: "btn btn-danger btn-sm",
                                        onclick: {
                                            let delete = delete.clone();
                                            move |_| delete(id)
                                        },
                                        "Confirm delete"
                                    }
                                    button { class: "btn btn-ghost btn-sm",
                                        onclick: move |_| confirm_delete.set(None), "Cancel" }
                                } else {
                                    button { class: "btn btn-danger btn-sm",
                                        onclick: move |_| confirm_delete.set(Some(id)), "Delete" }
                                }
                            }
                        }
                    }
                }
            }
        }

        for riad in rows {
            if let Some(id) = riad.entity_id() {
                Modal { modal: ModalKey::EditRiad(id), title: "Edit riad",
                    RiadEditor {
                        riad_id: Some(id),
                        initial: RiadForm::from(&riad),
                        on_saved: move |_| riads.restart(),
                    }
                }
                Modal { modal: ModalKey::RiadImages(id), title: "Images of {riad.name}",
                    RiadImages { riad_id: id }
                }
                Modal { modal: ModalKey::RiadRooms(id), title: "Rooms of {riad.name}",
                    RiadRooms { riad_id: id }
                }
                Modal { modal: ModalKey::AddRoom { riad: id }, title: "Add a room to {riad.name}",
                    AddRoom { riad_id: id, on_saved: move |_| riads.restart() }
                }
            }
        }

        Modal { modal: ModalKey::AddRiad, title: "Add riad",
            RiadEditor {
                riad_id: None,
                initial: RiadForm::default(),
                on_saved: move |_| riads.restart(),
            }
        }
    }
}

/// Create (no id) or update form for a riad
#[component]
fn RiadEditor(riad_id: Option<EntityId>, initial: RiadForm, on_saved: EventHandler<()>) -> Element {
    let api = use_admin_api();
    let modals = use_modals();
    let flash = use_flash();
    let mut form = use_signal(move || initial);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut saving = use_signal(|| false);

    let key = match riad_id {
        Some(id) => ModalKey::EditRiad(id),
        None => ModalKey::AddRiad,
    };

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            let body = form.read().clone();
            if let Err(e) = validate_riad(&body) {
                errors.set(Some(e));
                return;
            }
            errors.set(None);
            saving.set(true);
            let result = match riad_id {
                Some(id) => api.update_riad(id, &body).await,
                None => api.create_riad(&body).await.map(|_| ()),
            };
            saving.set(false);
            match result {
                Ok(()) => {
                    flash.success(if riad_id.is_some() {
                        "Riad updated successfully!"
                    } else {
                        "Riad added successfully!"
                    });
                    if riad_id.is_none() {
                        form.set(RiadForm::default());
                    }
                    modals.close(key);
                    on_saved.call(());
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to save riad: {e}")),
            }
        }
    };

    let err = move |field: &str| {
        errors
            .read()
            .as_ref()
            .and_then(|e| e.get(field))
            .map(str::to_string)
    };
    let f = form.read().clone();

    rsx! {
        form { onsubmit: submit, novalidate: true,
            TextField { label: "Name", value: f.name, error: err("name"),
                on_input: move |v| form.write().name = v }
            TextArea { label: "Description", value: f.description, error: err("description"),
                on_input: move |v| form.write().description = v }
            TextField { label: "Address", value: f.address, error: err("address"),
                on_input: move |v| form.write().address = v }
            TextField { label: "City", value: f.city, error: err("city"),
                on_input: move |v| form.write().city = v }
            button { class: "btn", r#type: "submit", disabled: saving(), "Save" }
        }
    }
}

#[component]
fn RiadImages(riad_id: EntityId) -> Element {
    let api = use_admin_api();
    let flash = use_flash();
    let mut busy = use_signal(|| false);

    let mut riad = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.riad(riad_id).await }
        }
    });

    let upload = {
        let api = api.clone();
        move |file: FileUpload| {
            let api = api.clone();
            spawn(async move {
                busy.set(true);
                match api.upload_riad_image(riad_id, file).await {
                    Ok(()) => {
                        flash.success("Image uploaded successfully!");
                        riad.restart();
                    }
                    Err(e) if e.is_cancelled() => {}
                    Err(e) => flash.error(format!("Failed to upload image: {e}")),
                }
                busy.set(false);
            });
        }
    };

    let remove = move |image_id: EntityId| {
        let api = api.clone();
        spawn(async move {
            busy.set(true);
            match api.delete_riad_image(image_id).await {
                Ok(()) => {
                    flash.success("Image deleted successfully!");
                    riad.restart();
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to delete image: {e}")),
            }
            busy.set(false);
        });
    };

    let state = riad.read().clone();
    match state {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! {
            ErrorAlert { message: e.to_string(), on_retry: move |_| riad.restart() }
        },
        Some(Ok(r)) => rsx! {
            ImageGallery { images: r.images, busy: busy(), on_upload: upload, on_delete: remove }
        },
    }
}

#[component]
fn RiadRooms(riad_id: EntityId) -> Element {
    let api = use_admin_api();

    let mut riad = use_resource(move || {
        let api = api.clone();
        async move { api.riad(riad_id).await }
    });

    let state = riad.read().clone();
    match state {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! {
            ErrorAlert { message: e.to_string(), on_retry: move |_| riad.restart() }
        },
        Some(Ok(r)) if r.rooms.is_empty() => rsx! {
            p { class: "text-muted", "This riad has no rooms yet." }
        },
        Some(Ok(r)) => rsx! {
            table { class: "data",
                thead {
                    tr {
                        th { "Name" }
                        th { "Guests" }
                        th { "Price" }
                    }
                }
                tbody {
                    for room in r.rooms {
                        tr { key: "{room.entity_id().unwrap_or_default()}",
                            td { "{room.name}" }
                            td { "{room.nb_personne}" }
                            td { "{room.price:.2}" }
                        }
                    }
                }
            }
        },
    }
}

#[component]
fn AddRoom(riad_id: EntityId, on_saved: EventHandler<()>) -> Element {
    let api = use_admin_api();
    let modals = use_modals();
    let flash = use_flash();
    let mut form = use_signal(move || RoomForm::for_riad(riad_id));
    let mut image = use_signal(|| None::<FileUpload>);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut saving = use_signal(|| false);

    let submit = move |evt: FormEvent| {
        evt.prevent_default();
        let api = api.clone();
        async move {
            let room = match validate_room(&form.read()) {
                Ok(room) => room,
                Err(e) => {
                    errors.set(Some(e));
                    return;
                }
            };
            errors.set(None);
            saving.set(true);
            let result = api.create_room(&room, image()).await;
            saving.set(false);
            match result {
                Ok(()) => {
                    flash.success("Room added successfully!");
                    form.set(RoomForm::for_riad(riad_id));
                    image.set(None);
                    modals.close(ModalKey::AddRoom { riad: riad_id });
                    on_saved.call(());
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to add room: {e}")),
            }
        }
    };

    rsx! {
        form { onsubmit: submit, novalidate: true,
            RoomFields { form, errors: errors() }
            FileInput { label: "Photo (optional)", on_file: move |f| image.set(Some(f)) }
            if let Some(file) = image() {
                p { class: "text-muted", "Selected: {file.file_name}" }
            }
            button { class: "btn", r#type: "submit", disabled: saving(), "Add room" }
        }
    }
}
