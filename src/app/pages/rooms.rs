//! Admin room management across all riads.

use dioxus::prelude::*;

use crate::app::api::FileUpload;
use crate::app::client::use_admin_api;
use crate::app::components::{ErrorAlert, ImageGallery, Modal, RoomFields, Spinner};
use crate::app::flash::use_flash;
use crate::app::guard::AdminPage;
use crate::app::modals::{use_modals, ModalKey};
use crate::app::models::{EntityId, Room, RoomForm};
use crate::app::validation::{validate_room, ValidationErrors};

#[component]
pub fn ListRooms() -> Element {
    rsx! {
        AdminPage { title: "Rooms", nav_active: "rooms",
            RoomsPanel {}
        }
    }
}

fn room_matches(room: &Room, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty()
        || room.name.to_lowercase().contains(&needle)
        || room.description.to_lowercase().contains(&needle)
}

#[component]
fn RoomsPanel() -> Element {
    let api = use_admin_api();
    let modals = use_modals();
    let flash = use_flash();
    let mut search = use_signal(String::new);
    let mut confirm_delete = use_signal(|| None::<EntityId>);

    let mut rooms = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.rooms().await }
        }
    });

    use_effect(move || {
        if let Some(Ok(list)) = &*rooms.read() {
            let ids: Vec<EntityId> = list.items.iter().filter_map(Room::entity_id).collect();
            modals.prune_rooms(&ids);
        }
    });

    let delete = move |id: EntityId| {
        let api = api.clone();
        async move {
            confirm_delete.set(None);
            match api.delete_room(id).await {
                Ok(()) => {
                    flash.success("Room deleted successfully!");
                    rooms.restart();
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to delete room: {e}")),
            }
        }
    };

    let list = match rooms.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| rooms.restart() }
            }
        }
        Some(Ok(list)) => list,
    };
    let needle = search();
    let rows: Vec<Room> = list
        .items
        .into_iter()
        .filter(|r| room_matches(r, &needle))
        .collect();

    rsx! {
        div { class: "toolbar",
            h1 { "Rooms" }
            input {
                r#type: "search",
                placeholder: "Search rooms",
                value: "{search}",
                oninput: move |e| search.set(e.value()),
            }
        }

        if rows.is_empty() {
            p { class: "text-muted", "No rooms found." }
        }

        table { class: "data",
            thead {
                tr {
                    th { "Name" }
                    th { "Riad" }
                    th { "Guests" }
                    th { "Price" }
                    th { "" }
                }
            }
            tbody {
                for room in rows.clone() {
                    if let Some(id) = room.entity_id() {
                        tr { key: "{id}",
                            td { "{room.name}" }
                            td {
                                if let Some(riad) = room.riad_id() { "#{riad}" } else { "-" }
                            }
                            td { "{room.nb_personne}" }
                            td { "{room.price:.2}" }
                            td {
                                button { class: "btn btn-ghost btn-sm",
                                    onclick: move |_| modals.open(ModalKey::EditRoom(id)), "Edit" }
                                button { class: "btn btn-ghost btn-sm",
                                    onclick: move |_| modals.open(ModalKey::RoomImages(id)), "Images" }
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

        for room in rows {
            if let Some(id) = room.entity_id() {
                Modal { modal: ModalKey::EditRoom(id), title: "Edit {room.name}",
                    RoomEditor {
                        room_id: id,
                        initial: RoomForm::from(&room),
                        on_saved: move |_| rooms.restart(),
                    }
                }
                Modal { modal: ModalKey::RoomImages(id), title: "Images of {room.name}",
                    RoomImages { room_id: id }
                }
            }
        }
    }
}

#[component]
fn RoomEditor(room_id: EntityId, initial: RoomForm, on_saved: EventHandler<()>) -> Element {
    let api = use_admin_api();
    let modals = use_modals();
    let flash = use_flash();
    let form = use_signal(move || initial);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut saving = use_signal(|| false);

    let riads = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.riads().await }
        }
    });
    let riad_choices: Vec<(EntityId, String)> = match &*riads.read() {
        Some(Ok(list)) => list
            .items
            .iter()
            .filter_map(|r| Some((r.entity_id()?, r.name.clone())))
            .collect(),
        _ => Vec::new(),
    };

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
            let result = api.update_room(room_id, &room).await;
            saving.set(false);
            match result {
                Ok(()) => {
                    flash.success("Room updated successfully!");
                    modals.close(ModalKey::EditRoom(room_id));
                    on_saved.call(());
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to update room: {e}")),
            }
        }
    };

    rsx! {
        form { onsubmit: submit, novalidate: true,
            RoomFields { form, errors: errors(), riads: riad_choices }
            button { class: "btn", r#type: "submit", disabled: saving(), "Save" }
        }
    }
}

#[component]
fn RoomImages(room_id: EntityId) -> Element {
    let api = use_admin_api();
    let flash = use_flash();
    let mut busy = use_signal(|| false);

    let mut room = use_resource({
        let api = api.clone();
        move || {
            let api = api.clone();
            async move { api.room(room_id).await }
        }
    });

    let upload = {
        let api = api.clone();
        move |file: FileUpload| {
            let api = api.clone();
            spawn(async move {
                busy.set(true);
                match api.upload_room_image(room_id, file).await {
                    Ok(()) => {
                        flash.success("Image uploaded successfully!");
                        room.restart();
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
            match api.delete_room_image(image_id).await {
                Ok(()) => {
                    flash.success("Image deleted successfully!");
                    room.restart();
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => flash.error(format!("Failed to delete image: {e}")),
            }
            busy.set(false);
        });
    };

    let state = room.read().clone();
    match state {
        None => rsx! { Spinner {} },
        Some(Err(e)) => rsx! {
            ErrorAlert { message: e.to_string(), on_retry: move |_| room.restart() }
        },
        Some(Ok(r)) => rsx! {
            ImageGallery { images: r.images, busy: busy(), on_upload: upload, on_delete: remove }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_ignores_case_and_whitespace() {
        let room = Room {
            name: "Suite Majorelle".into(),
            description: "Courtyard view".into(),
            ..Default::default()
        };
        assert!(room_matches(&room, "  "));
        assert!(room_matches(&room, "majorelle"));
        assert!(room_matches(&room, "COURTYARD"));
        assert!(!room_matches(&room, "terrace"));
    }
}
