//! Riad detail page with room selection and the booking form.

use chrono::NaiveDate;
use dioxus::prelude::*;

use crate::app::api::{ApiClient, ApiError, AuthMode};
use crate::app::client::{use_api, use_client_config};
use crate::app::components::{ErrorAlert, Modal, Spinner, TextField};
use crate::app::guard::UserPage;
use crate::app::modals::{use_modals, ModalKey};
use crate::app::models::{Reservation, ReservationDraft, Riad, Room};
use crate::app::session::SessionKind;
use crate::app::validation::{validate_reservation, ValidationErrors};

#[component]
pub fn RiadDetail(id: u64) -> Element {
    rsx! {
        UserPage { title: "Riad", nav_active: "home",
            RiadOverview { id }
        }
    }
}

#[component]
fn RiadOverview(id: u64) -> Element {
    let api = use_api(AuthMode::Optional(SessionKind::User));
    let config = use_client_config();
    let mut selected = use_signal(|| None::<Room>);

    let mut riad = use_resource(use_reactive((&id,), move |(id,)| {
        let api = api.clone();
        async move { api.riad(id).await }
    }));

    let riad: Riad = match riad.read().clone() {
        None => return rsx! { Spinner {} },
        Some(Err(e)) => {
            return rsx! {
                ErrorAlert { message: e.to_string(), on_retry: move |_| riad.restart() }
            }
        }
        Some(Ok(r)) => r,
    };

    rsx! {
        section {
            h1 { "{riad.name}" }
            p { class: "text-muted", "{riad.address}, {riad.city}" }
            if !riad.images.is_empty() {
                div { class: "gallery",
                    for image in riad.images.iter() {
                        if let Some(url) = image.image_url.as_deref() {
                            img { src: config.asset_url(url), alt: image.alt_text() }
                        }
                    }
                }
            }
            p { "{riad.description}" }
        }

        section {
            h2 { "Rooms" }
            if riad.rooms.is_empty() {
                p { class: "text-muted", "No rooms listed for this riad." }
            }
            div { class: "grid",
                for room in riad.rooms.clone() {
                    article { class: "card", key: "{room.entity_id().unwrap_or_default()}",
                        if let Some(url) = room.images.first().and_then(|i| i.image_url.as_deref()) {
                            img { src: config.asset_url(url), alt: "{room.name}" }
                        }
                        div { class: "body",
                            h3 { "{room.name}" }
                            p { "{room.description}" }
                            p { class: "text-muted", "Up to {room.nb_personne} guests · {room.price:.0} MAD / night" }
                            button {
                                class: "btn btn-sm",
                                onclick: {
                                    let room = room.clone();
                                    move |_| selected.set(Some(room.clone()))
                                },
                                "Book this room"
                            }
                        }
                    }
                }
            }
        }

        if let Some(room) = selected() {
            ReservationForm { room }
        }
    }
}

/// Nights between two ISO dates, if both parse and are ordered
fn nights_between(start: &str, end: &str) -> Option<i64> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d").ok()?;
    let end = NaiveDate::parse_from_str(end, "%Y-%m-%d").ok()?;
    let nights = (end - start).num_days();
    (nights > 0).then_some(nights)
}

#[derive(Debug, PartialEq)]
enum BookingError {
    Invalid(ValidationErrors),
    Api(ApiError),
}

/// Validate the draft, then book `room` for the signed-in guest.
///
/// Nothing is sent while the draft has errors. An empty total price is filled in
/// from the nightly rate.
async fn book_room(
    api: &ApiClient,
    draft: &ReservationDraft,
    room: &Room,
) -> Result<Reservation, BookingError> {
    let mut body = draft.clone();
    if body.total_price.trim().is_empty() {
        if let Some(n) = nights_between(&body.start_date, &body.end_date) {
            body.total_price = format!("{:.2}", n as f64 * room.price);
        }
    }
    let room_id = room.entity_id().ok_or(BookingError::Api(ApiError::NotFound))?;
    let mut reservation = validate_reservation(&body, &format!("/api/rooms/{room_id}"), None)
        .map_err(BookingError::Invalid)?;

    let user = api.current_user().await.map_err(BookingError::Api)?;
    let user_id = user
        .entity_id()
        .ok_or_else(|| BookingError::Api(ApiError::Decode("user has no id".into())))?;
    reservation.user = Some(format!("/api/users/{user_id}"));

    api.create_reservation(&reservation)
        .await
        .map_err(BookingError::Api)?;
    Ok(reservation)
}

#[component]
fn ReservationForm(room: Room) -> Element {
    let api = use_api(AuthMode::Optional(SessionKind::User));
    let modals = use_modals();
    let mut draft = use_signal(ReservationDraft::default);
    let mut errors = use_signal(|| None::<ValidationErrors>);
    let mut result = use_signal(String::new);
    let mut submitting = use_signal(|| false);

    let d = draft.read().clone();
    let nights = nights_between(&d.start_date, &d.end_date);
    let estimate = nights.map(|n| n as f64 * room.price);
    let err = move |field: &str| {
        errors
            .read()
            .as_ref()
            .and_then(|e| e.get(field))
            .map(str::to_string)
    };

    let submit = {
        let room = room.clone();
        move |evt: FormEvent| {
            evt.prevent_default();
            let api: ApiClient = api.clone();
            let room = room.clone();
            async move {
                let current = draft.read().clone();
                submitting.set(true);
                let outcome = book_room(&api, &current, &room).await;
                submitting.set(false);
                match outcome {
                    Ok(_) => {
                        errors.set(None);
                        result.set("Reservation successful".to_string());
                        draft.set(ReservationDraft::default());
                    }
                    Err(BookingError::Invalid(e)) => {
                        errors.set(Some(e));
                        return;
                    }
                    Err(BookingError::Api(e)) if e.is_cancelled() => return,
                    Err(BookingError::Api(e)) => {
                        tracing::warn!("Reservation failed: {}", e);
                        errors.set(None);
                        result.set(format!(
                            "An error occurred while creating the reservation: {e}"
                        ));
                    }
                }
                modals.open(ModalKey::ReservationResult);
            }
        }
    };

    rsx! {
        section { id: "reservation",
            h2 { "Book {room.name}" }
            form { onsubmit: submit, novalidate: true,
                h3 { "Contact information" }
                TextField { label: "First name", value: d.firstname, error: err("firstname"),
                    on_input: move |v| draft.write().firstname = v }
                TextField { label: "Last name", value: d.lastname, error: err("lastname"),
                    on_input: move |v| draft.write().lastname = v }
                TextField { label: "Email", input_type: "email", value: d.email, error: err("email"),
                    on_input: move |v| draft.write().email = v }
                TextField { label: "Phone", input_type: "tel", value: d.tel, error: err("tel"),
                    on_input: move |v| draft.write().tel = v }

                h3 { "Stay" }
                TextField { label: "Arrival", input_type: "date", value: d.start_date, error: err("start_date"),
                    on_input: move |v| draft.write().start_date = v }
                TextField { label: "Departure", input_type: "date", value: d.end_date, error: err("end_date"),
                    on_input: move |v| draft.write().end_date = v }
                if let (Some(n), Some(total)) = (nights, estimate) {
                    p { class: "text-muted", "{n} night(s) · estimated {total:.2} MAD" }
                }
                TextField { label: "Total price", input_type: "number", value: d.total_price,
                    placeholder: "Leave empty to use the estimate", error: err("total_price"),
                    on_input: move |v| draft.write().total_price = v }
                TextField { label: "Discount", input_type: "number", value: d.discount, error: err("discount"),
                    on_input: move |v| draft.write().discount = v }

                button { class: "btn", r#type: "submit", disabled: submitting(),
                    if submitting() { "Booking..." } else { "Book now" }
                }
            }
        }

        Modal { modal: ModalKey::ReservationResult, title: "Reservation",
            p { "{result}" }
            button { class: "btn", onclick: move |_| modals.close(ModalKey::ReservationResult), "OK" }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use async_trait::async_trait;

    use super::*;
    use crate::app::api::{ApiRequest, RawResponse, RequestBody, Transport};
    use crate::app::session::MemoryTokenStore;

    #[derive(Default)]
    struct Backend {
        replies: RefCell<VecDeque<RawResponse>>,
        seen: RefCell<Vec<ApiRequest>>,
    }

    #[async_trait(?Send)]
    impl Transport for Backend {
        async fn send(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
            self.seen.borrow_mut().push(request);
            self.replies
                .borrow_mut()
                .pop_front()
                .ok_or_else(|| ApiError::Network("connection refused".into()))
        }
    }

    fn backend(replies: &[(u16, &str)]) -> (Rc<Backend>, ApiClient) {
        let backend = Rc::new(Backend::default());
        for (status, body) in replies {
            backend.replies.borrow_mut().push_back(RawResponse {
                status: *status,
                body: body.to_string(),
            });
        }
        let store = MemoryTokenStore::with_token(SessionKind::User, "guest-jwt");
        let api = ApiClient::new("/api", Rc::new(store), backend.clone())
            .with_mode(AuthMode::Optional(SessionKind::User));
        (backend, api)
    }

    fn room() -> Room {
        Room {
            id: Some(2),
            name: "Suite Majorelle".into(),
            price: 450.0,
            ..Default::default()
        }
    }

    fn draft() -> ReservationDraft {
        ReservationDraft {
            firstname: "Salma".into(),
            lastname: "Idrissi".into(),
            email: "salma@example.com".into(),
            tel: "+212600000000".into(),
            start_date: "2024-08-01".into(),
            end_date: "2024-08-03".into(),
            ..Default::default()
        }
    }

    #[test]
    fn nights_need_ordered_dates() {
        assert_eq!(nights_between("2024-08-01", "2024-08-04"), Some(3));
        assert_eq!(nights_between("2024-08-04", "2024-08-01"), None);
        assert_eq!(nights_between("", "2024-08-01"), None);
    }

    #[tokio::test]
    async fn invalid_draft_sends_nothing() {
        let (backend, api) = backend(&[(200, r#"{"id":9,"username":"salma"}"#)]);

        let outcome = book_room(&api, &ReservationDraft::default(), &room()).await;

        match outcome {
            Err(BookingError::Invalid(errors)) => {
                assert!(errors.get("firstname").is_some());
                assert!(errors.get("start_date").is_some());
            }
            other => panic!("expected validation errors, got {other:?}"),
        }
        assert!(backend.seen.borrow().is_empty());
    }

    #[tokio::test]
    async fn booking_is_made_for_the_signed_in_guest() {
        let (backend, api) = backend(&[
            (200, r#"{"@id":"/api/users/9","username":"salma"}"#),
            (201, r#"{"id":31}"#),
        ]);

        let reservation = book_room(&api, &draft(), &room()).await.unwrap();

        assert_eq!(reservation.user.as_deref(), Some("/api/users/9"));
        assert_eq!(reservation.room.as_deref(), Some("/api/rooms/2"));
        assert_eq!(reservation.total_price, 900.0);

        let seen = backend.seen.borrow();
        let urls: Vec<_> = seen.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(urls, ["/api/user_info", "/api/reservations"]);
        match &seen[1].body {
            RequestBody::Json { body, content_type } => {
                assert_eq!(*content_type, "application/ld+json");
                let json: serde_json::Value = serde_json::from_str(body).unwrap();
                assert_eq!(json["user"], "/api/users/9");
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[tokio::test]
    async fn unknown_guest_is_reported_not_booked() {
        let (backend, api) = backend(&[(500, r#"{"detail":"Database unavailable"}"#)]);

        let outcome = book_room(&api, &draft(), &room()).await;

        assert_eq!(
            outcome,
            Err(BookingError::Api(ApiError::Http {
                status: 500,
                message: "Database unavailable".into()
            }))
        );
        let urls: Vec<_> = backend.seen.borrow().iter().map(|r| r.url.clone()).collect();
        assert_eq!(urls, ["/api/user_info"]);
    }
}
