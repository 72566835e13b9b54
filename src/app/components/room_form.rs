use dioxus::prelude::*;

use super::form_inputs::{TextArea, TextField};
use crate::app::models::{EntityId, RoomForm};
use crate::app::validation::ValidationErrors;

/// Room fields shared by the add-room and edit-room modals.
///
/// With `riads` set, a riad picker is shown so the room can be moved.
#[component]
pub fn RoomFields(
    mut form: Signal<RoomForm>,
    errors: Option<ValidationErrors>,
    #[props(default)] riads: Vec<(EntityId, String)>,
) -> Element {
    let err = |field: &str| errors.as_ref().and_then(|e| e.get(field)).map(str::to_string);
    let current = form.read().clone();
    let riad_error = err("riad");

    rsx! {
        if !riads.is_empty() {
            label { class: "field",
                span { "Riad" }
                select {
                    "aria-invalid": riad_error.is_some(),
                    onchange: move |e| form.write().riad = e.value().parse().ok(),
                    if current.riad.is_none() {
                        option { value: "", selected: true, "Select a riad" }
                    }
                    for (id, name) in riads {
                        option { key: "{id}", value: "{id}", selected: current.riad == Some(id), "{name}" }
                    }
                }
                if let Some(ref message) = riad_error {
                    span { class: "field-error", "{message}" }
                }
            }
        }
        TextField {
            label: "Name",
            value: current.name,
            error: err("name"),
            on_input: move |v| form.write().name = v,
        }
        TextArea {
            label: "Description",
            value: current.description,
            error: err("description"),
            on_input: move |v| form.write().description = v,
        }
        TextField {
            label: "Capacity",
            input_type: "number",
            value: current.capacity,
            error: err("capacity"),
            on_input: move |v| form.write().capacity = v,
        }
        TextField {
            label: "Price per night",
            input_type: "number",
            value: current.price,
            error: err("price"),
            on_input: move |v| form.write().price = v,
        }
    }
}
