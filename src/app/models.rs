//! Domain payloads exchanged with the booking backend.
//!
//! The backend speaks API-Platform JSON-LD: collections are wrapped in a
//! `hydra:member` envelope and items carry an `@id` IRI. Fields the screens do
//! not use are ignored.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

/// Numeric identifier of a backend entity
pub type EntityId = u64;

/// Last path segment of an IRI such as `/api/rooms/5`.
pub fn iri_id(iri: &str) -> Option<EntityId> {
    iri.trim_end_matches('/').rsplit('/').next()?.parse().ok()
}

/// List response: either a hydra envelope or a bare JSON array.
#[derive(Clone, Debug, PartialEq)]
pub struct Collection<T> {
    pub items: Vec<T>,
    pub total: Option<u64>,
}

impl<T> Default for Collection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: None,
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Collection<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape<T> {
            Hydra {
                #[serde(rename = "hydra:member")]
                member: Vec<T>,
                #[serde(rename = "hydra:totalItems", default)]
                total: Option<u64>,
            },
            Plain(Vec<T>),
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Hydra { member, total } => Collection {
                items: member,
                total,
            },
            Shape::Plain(items) => Collection { items, total: None },
        })
    }
}

// =============================================================================
// Riads & rooms
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Riad {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(rename = "@id", default, skip_serializing)]
    pub iri: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    /// Cover image file name under `/uploads/images`
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Riad {
    /// Id from the `id` field, falling back to the IRI
    pub fn entity_id(&self) -> Option<EntityId> {
        self.id.or_else(|| self.iri.as_deref().and_then(iri_id))
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Room {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(rename = "@id", default, skip_serializing)]
    pub iri: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Capacity (number of guests)
    #[serde(default)]
    pub nb_personne: u32,
    #[serde(default, deserialize_with = "number_or_string")]
    pub price: f64,
    /// Owning riad: an IRI (`/api/riads/3`) or a bare id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_riad: Option<serde_json::Value>,
    #[serde(default)]
    pub images: Vec<Image>,
}

impl Room {
    pub fn entity_id(&self) -> Option<EntityId> {
        self.id.or_else(|| self.iri.as_deref().and_then(iri_id))
    }

    pub fn riad_id(&self) -> Option<EntityId> {
        match self.id_riad.as_ref()? {
            serde_json::Value::Number(n) => n.as_u64(),
            serde_json::Value::String(s) => iri_id(s),
            serde_json::Value::Object(o) => o
                .get("id")
                .and_then(|v| v.as_u64())
                .or_else(|| o.get("@id").and_then(|v| v.as_str()).and_then(iri_id)),
            _ => None,
        }
    }
}

/// Prices arrive as JSON numbers or as decimal strings (`"450.00"`)
fn number_or_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(f64),
        Text(String),
        Null,
    }
    match Raw::deserialize(deserializer)? {
        Raw::Num(n) => Ok(n),
        Raw::Text(s) => s.trim().parse().map_err(serde::de::Error::custom),
        Raw::Null => Ok(0.0),
    }
}

/// Riad or room photo
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Image {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(rename = "@id", default, skip_serializing)]
    pub iri: Option<String>,
    #[serde(rename = "imageName", default)]
    pub image_name: Option<String>,
    /// Path relative to the backend origin
    #[serde(rename = "imageUrl", alias = "url", default)]
    pub image_url: Option<String>,
}

impl Image {
    pub fn entity_id(&self) -> Option<EntityId> {
        self.id.or_else(|| self.iri.as_deref().and_then(iri_id))
    }

    pub fn alt_text(&self) -> &str {
        self.image_name.as_deref().unwrap_or("Image")
    }
}

/// Riad create/update payload
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct RiadForm {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city: String,
}

impl From<&Riad> for RiadForm {
    fn from(riad: &Riad) -> Self {
        Self {
            name: riad.name.clone(),
            description: riad.description.clone(),
            address: riad.address.clone(),
            city: riad.city.clone(),
        }
    }
}

/// Room create/update payload; the form keeps numbers as typed text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RoomForm {
    pub name: String,
    pub description: String,
    pub capacity: String,
    pub price: String,
    /// Owning riad; editing can move a room to another riad
    pub riad: Option<EntityId>,
}

impl RoomForm {
    /// Empty form for a new room in `riad`
    pub fn for_riad(riad: EntityId) -> Self {
        Self {
            riad: Some(riad),
            ..Default::default()
        }
    }
}

impl From<&Room> for RoomForm {
    fn from(room: &Room) -> Self {
        Self {
            name: room.name.clone(),
            description: room.description.clone(),
            capacity: room.nb_personne.to_string(),
            price: room.price.to_string(),
            riad: room.riad_id(),
        }
    }
}

/// Validated room body; updates are full replacements so the riad is always sent
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct RoomUpdate {
    pub name: String,
    pub description: String,
    pub nb_personne: u32,
    pub price: f64,
    /// Riad IRI (`/api/riads/3`)
    pub id_riad: String,
}

// =============================================================================
// Users
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct User {
    #[serde(default)]
    pub id: Option<EntityId>,
    #[serde(rename = "@id", default, skip_serializing)]
    pub iri: Option<String>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub secondname: Option<String>,
    #[serde(default)]
    pub cin: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub tele: Option<String>,
    #[serde(default, alias = "imageUrl")]
    pub image_url: Option<String>,
}

impl User {
    pub fn entity_id(&self) -> Option<EntityId> {
        self.id.or_else(|| self.iri.as_deref().and_then(iri_id))
    }

    pub fn display_name(&self) -> String {
        let full = format!(
            "{} {}",
            self.firstname.as_deref().unwrap_or_default(),
            self.secondname.as_deref().unwrap_or_default()
        );
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }

    pub fn roles_label(&self) -> String {
        self.roles.join(", ")
    }

    /// Case-insensitive match on email or username
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.email.to_lowercase().contains(&needle)
            || self.username.to_lowercase().contains(&needle)
    }
}

/// Editable view of a user; `diff` produces the partial update body
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UserDraft {
    pub username: String,
    pub email: String,
    /// Comma-separated, as typed
    pub roles: String,
    pub firstname: String,
    pub secondname: String,
    pub tele: String,
    pub address: String,
    pub password: String,
}

impl From<&User> for UserDraft {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.roles_label(),
            firstname: user.firstname.clone().unwrap_or_default(),
            secondname: user.secondname.clone().unwrap_or_default(),
            tele: user.tele.clone().unwrap_or_default(),
            address: user.address.clone().unwrap_or_default(),
            password: String::new(),
        }
    }
}

/// Only the fields that changed are serialized
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secondname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tele: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == UserUpdate::default()
    }
}

/// Split "ROLE_USER, ROLE_ADMIN" into trimmed, non-empty role names
pub fn parse_roles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

impl UserDraft {
    /// Compare against the values loaded from the server.
    ///
    /// Returns `None` when nothing changed. A non-empty password is always sent.
    pub fn diff(&self, initial: &UserDraft) -> Option<UserUpdate> {
        fn changed(new: &str, old: &str) -> Option<String> {
            (new != old).then(|| new.to_string())
        }

        let new_roles = parse_roles(&self.roles);
        let update = UserUpdate {
            username: changed(&self.username, &initial.username),
            email: changed(&self.email, &initial.email),
            roles: (new_roles != parse_roles(&initial.roles)).then_some(new_roles),
            firstname: changed(&self.firstname, &initial.firstname),
            secondname: changed(&self.secondname, &initial.secondname),
            tele: changed(&self.tele, &initial.tele),
            address: changed(&self.address, &initial.address),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
        };
        (!update.is_empty()).then_some(update)
    }
}

// =============================================================================
// Auth payloads
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    /// Admin login echoes an HTTP-like status in the body
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "passwordConfirmation")]
    pub password_confirmation: String,
    pub firstname: String,
    pub secondname: String,
    pub cin: String,
    pub address: String,
    pub tele: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct PasswordReset {
    #[serde(rename = "newPassword")]
    pub new_password: String,
    pub confirmation: String,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct TokenValidationRequest {
    pub admin: bool,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TokenValidation {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub role: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct UploadResponse {
    #[serde(rename = "fileUrl", default)]
    pub file_url: Option<String>,
}

// =============================================================================
// Reservations
// =============================================================================

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Reservation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub tel: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, deserialize_with = "number_or_string")]
    pub total_price: f64,
    #[serde(default, deserialize_with = "number_or_string")]
    pub discount: f64,
    /// Room IRI (`/api/rooms/2`)
    #[serde(default)]
    pub room: Option<String>,
    /// User IRI (`/api/users/2`)
    #[serde(default)]
    pub user: Option<String>,
}

impl Reservation {
    pub fn nights(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn guest_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname).trim().to_string()
    }
}

/// Booking form state as typed by the guest
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReservationDraft {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub tel: String,
    pub start_date: String,
    pub end_date: String,
    pub total_price: String,
    pub discount: String,
}
