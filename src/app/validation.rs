//! Client-side form checks.
//!
//! Forms are validated before anything is sent; failures are reported per field
//! and never reach the network layer.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::models::*;

static EMAIL_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok());

/// Characters allowed in usernames and passwords
static CREDENTIAL_CHARSET_RE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9!@#$%^&*()_+]+$").ok());

const SYMBOLS: &str = "!@#$%^&*()_+";

/// Field name -> message
#[derive(Clone, Debug, Default, PartialEq, thiserror::Error)]
#[error("{} field(s) need attention", .0.len())]
pub struct ValidationErrors(BTreeMap<&'static str, String>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn require(&mut self, field: &'static str, label: &str, value: &str) -> bool {
        if value.trim().is_empty() {
            self.add(field, format!("{label} is required"));
            false
        } else {
            true
        }
    }

    fn finish<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.as_ref().is_some_and(|re| re.is_match(email.trim()))
}

/// International phone number: optional `+`, 8 to 15 digits.
///
/// Spaces, dots, dashes and parentheses are ignored.
pub fn is_valid_phone(phone: &str) -> bool {
    let trimmed = phone.trim();
    let digits = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let mut count = 0;
    for c in digits.chars() {
        match c {
            '0'..='9' => count += 1,
            ' ' | '-' | '.' | '(' | ')' => {}
            _ => return false,
        }
    }
    (8..=15).contains(&count)
}

/// Length, charset and composition rule shared by usernames and passwords
fn check_credential(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    value: &str,
    min_len: usize,
) {
    if !errors.require(field, label, value) {
        return;
    }
    if value.chars().count() < min_len {
        errors.add(field, format!("{label} must be at least {min_len} characters"));
    } else if !CREDENTIAL_CHARSET_RE.as_ref().is_some_and(|re| re.is_match(value)) {
        errors.add(
            field,
            format!("{label} may only contain letters, digits and {SYMBOLS}"),
        );
    } else if !(value.chars().any(|c| c.is_ascii_uppercase())
        && value.chars().any(|c| c.is_ascii_digit())
        && value.chars().any(|c| SYMBOLS.contains(c)))
    {
        errors.add(
            field,
            format!("{label} needs an uppercase letter, a digit and a symbol"),
        );
    }
}

pub fn validate_registration(form: &Registration) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    check_credential(&mut errors, "username", "Username", &form.username, 10);
    if errors.require("email", "Email", &form.email) && !is_valid_email(&form.email) {
        errors.add("email", "Invalid email address");
    }
    check_credential(&mut errors, "password", "Password", &form.password, 6);
    if errors.require(
        "password_confirmation",
        "Password confirmation",
        &form.password_confirmation,
    ) && form.password != form.password_confirmation
    {
        errors.add("password_confirmation", "Passwords must match");
    }
    errors.require("firstname", "First name", &form.firstname);
    errors.require("secondname", "Last name", &form.secondname);
    errors.require("cin", "CIN", &form.cin);
    errors.require("address", "Address", &form.address);
    if errors.require("tele", "Phone number", &form.tele) && !is_valid_phone(&form.tele) {
        errors.add("tele", "Invalid phone number");
    }

    errors.finish(())
}

pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.require("username", "Username", &credentials.username);
    errors.require("password", "Password", &credentials.password);
    errors.finish(())
}

pub fn validate_reset_request(email: &str) -> Result<String, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let email = email.trim();
    if errors.require("email", "Email", email) {
        let len = email.chars().count();
        if !(3..=50).contains(&len) {
            errors.add("email", "Email must be between 3 and 50 characters");
        } else if !is_valid_email(email) {
            errors.add("email", "Invalid email address");
        }
    }
    errors.finish(email.to_string())
}

pub fn validate_password_reset(reset: &PasswordReset) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.require("new_password", "New password", &reset.new_password);
    if errors.require("confirmation", "Confirmation", &reset.confirmation)
        && reset.new_password != reset.confirmation
    {
        errors.add("confirmation", "Passwords do not match");
    }
    errors.finish(())
}

pub fn validate_riad(form: &RiadForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.require("name", "Name", &form.name);
    errors.require("description", "Description", &form.description);
    errors.require("address", "Address", &form.address);
    errors.require("city", "City", &form.city);
    errors.finish(())
}

pub fn validate_room(form: &RoomForm) -> Result<RoomUpdate, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.require("name", "Name", &form.name);
    errors.require("description", "Description", &form.description);

    let capacity = match form.capacity.trim().parse::<u32>() {
        Ok(n) if n >= 1 => n,
        _ => {
            errors.add("capacity", "Capacity must be at least 1");
            0
        }
    };
    let price = match form.price.trim().parse::<f64>() {
        Ok(p) if p.is_finite() && p >= 0.0 => p,
        _ => {
            errors.add("price", "Price must be a positive number");
            0.0
        }
    };
    let id_riad = match form.riad {
        Some(id) => format!("/api/riads/{id}"),
        None => {
            errors.add("riad", "Riad is required");
            String::new()
        }
    };

    errors.finish(RoomUpdate {
        name: form.name.trim().to_string(),
        description: form.description.trim().to_string(),
        nb_personne: capacity,
        price,
        id_riad,
    })
}

fn parse_date(
    errors: &mut ValidationErrors,
    field: &'static str,
    label: &str,
    raw: &str,
) -> Option<NaiveDate> {
    if !errors.require(field, label, raw) {
        return None;
    }
    match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
        Ok(d) => Some(d),
        Err(_) => {
            errors.add(field, format!("{label} is not a valid date"));
            None
        }
    }
}

fn parse_amount(errors: &mut ValidationErrors, field: &'static str, label: &str, raw: &str) -> f64 {
    if raw.trim().is_empty() {
        return 0.0;
    }
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v,
        _ => {
            errors.add(field, format!("{label} must be a positive number"));
            0.0
        }
    }
}

/// Build the reservation body for `room_iri`, booked by `user_iri` when known
pub fn validate_reservation(
    draft: &ReservationDraft,
    room_iri: &str,
    user_iri: Option<String>,
) -> Result<Reservation, ValidationErrors> {
    let mut errors = ValidationErrors::default();
    errors.require("firstname", "First name", &draft.firstname);
    errors.require("lastname", "Last name", &draft.lastname);
    if errors.require("email", "Email", &draft.email) && !is_valid_email(&draft.email) {
        errors.add("email", "Invalid email address");
    }
    if errors.require("tel", "Phone number", &draft.tel) && !is_valid_phone(&draft.tel) {
        errors.add("tel", "Invalid phone number");
    }

    let start = parse_date(&mut errors, "start_date", "Arrival date", &draft.start_date);
    let end = parse_date(&mut errors, "end_date", "Departure date", &draft.end_date);
    if let (Some(start), Some(end)) = (start, end) {
        if end <= start {
            errors.add("end_date", "Departure must be after arrival");
        }
    }
    let total_price = parse_amount(&mut errors, "total_price", "Total price", &draft.total_price);
    let discount = parse_amount(&mut errors, "discount", "Discount", &draft.discount);

    match (start, end) {
        (Some(start_date), Some(end_date)) => errors.finish(Reservation {
            id: None,
            firstname: draft.firstname.trim().to_string(),
            lastname: draft.lastname.trim().to_string(),
            email: draft.email.trim().to_string(),
            tel: draft.tel.trim().to_string(),
            start_date,
            end_date,
            total_price,
            discount,
            room: Some(room_iri.to_string()),
            user: user_iri,
        }),
        _ => Err(errors),
    }
}

pub fn validate_user_update(update: &UserUpdate) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    if let Some(email) = &update.email {
        if !is_valid_email(email) {
            errors.add("email", "Invalid email address");
        }
    }
    if let Some(username) = &update.username {
        errors.require("username", "Username", username);
    }
    if let Some(tele) = &update.tele {
        if !tele.trim().is_empty() && !is_valid_phone(tele) {
            errors.add("tele", "Invalid phone number");
        }
    }
    errors.finish(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration() -> Registration {
        Registration {
            username: "RiadLover#1".into(),
            email: "guest@example.com".into(),
            password: "Pass1!".into(),
            password_confirmation: "Pass1!".into(),
            firstname: "Salma".into(),
            secondname: "Idrissi".into(),
            cin: "AB123456".into(),
            address: "12 Derb Lalla Azzouna".into(),
            tele: "+212 6 12 34 56 78".into(),
        }
    }

    #[test]
    fn complete_registration_passes() {
        assert_eq!(validate_registration(&registration()), Ok(()));
    }

    #[test]
    fn username_rules() {
        let mut form = registration();
        form.username = "Short#1".into();
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors.get("username").unwrap().contains("at least 10"));

        form.username = "longenough#1".into();
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors.get("username").unwrap().contains("uppercase"));

        form.username = "Long enough#1".into();
        let errors = validate_registration(&form).unwrap_err();
        assert!(errors.get("username").unwrap().contains("may only contain"));
    }

    #[test]
    fn password_confirmation_must_match() {
        let mut form = registration();
        form.password_confirmation = "Pass2!".into();
        let errors = validate_registration(&form).unwrap_err();
        assert_eq!(errors.get("password_confirmation"), Some("Passwords must match"));
        assert_eq!(errors.0.len(), 1);
    }

    #[test]
    fn required_identity_fields() {
        let form = Registration::default();
        let errors = validate_registration(&form).unwrap_err();
        for field in ["username", "email", "password", "firstname", "secondname", "cin", "address", "tele"] {
            assert!(errors.get(field).is_some(), "{field} should be required");
        }
    }

    #[test]
    fn phone_numbers() {
        assert!(is_valid_phone("+212612345678"));
        assert!(is_valid_phone("06 12 34 56 78"));
        assert!(is_valid_phone("(555) 123-4567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+212-abc-4567"));
        assert!(!is_valid_phone("1234567890123456"));
    }

    #[test]
    fn reset_request_email_bounds() {
        assert_eq!(validate_reset_request(" a@b.co ").as_deref(), Ok("a@b.co"));
        assert!(validate_reset_request("").is_err());
        let long = format!("{}@example.com", "x".repeat(45));
        assert!(validate_reset_request(&long).is_err());
        assert!(validate_reset_request("not-an-email").is_err());
    }

    #[test]
    fn password_reset_must_match() {
        let reset = PasswordReset {
            new_password: "abc".into(),
            confirmation: "abd".into(),
        };
        let errors = validate_password_reset(&reset).unwrap_err();
        assert_eq!(errors.get("confirmation"), Some("Passwords do not match"));
    }

    #[test]
    fn room_numbers_are_checked() {
        let form = RoomForm {
            name: "Suite Atlas".into(),
            description: "Patio view".into(),
            capacity: "0".into(),
            price: "-5".into(),
            riad: Some(3),
        };
        let errors = validate_room(&form).unwrap_err();
        assert!(errors.get("capacity").is_some());
        assert!(errors.get("price").is_some());

        let ok = validate_room(&RoomForm {
            capacity: "3".into(),
            price: "450.5".into(),
            ..form
        })
        .unwrap();
        assert_eq!(ok.nb_personne, 3);
        assert!((ok.price - 450.5).abs() < f64::EPSILON);
    }

    #[test]
    fn room_edit_keeps_its_riad() {
        let room: Room = serde_json::from_str(
            r#"{"@id":"/api/rooms/5","name":"Suite Atlas","description":"Patio view",
                "nb_personne":2,"price":"450.00","id_riad":"/api/riads/3"}"#,
        )
        .unwrap();
        let form = RoomForm::from(&room);
        assert_eq!(form.riad, Some(3));

        let body = serde_json::to_value(validate_room(&form).unwrap()).unwrap();
        assert_eq!(body["id_riad"], "/api/riads/3");
        assert_eq!(body["nb_personne"], 2);

        let moved = RoomForm {
            riad: Some(8),
            ..form.clone()
        };
        assert_eq!(validate_room(&moved).unwrap().id_riad, "/api/riads/8");

        let orphan = RoomForm { riad: None, ..form };
        let errors = validate_room(&orphan).unwrap_err();
        assert_eq!(errors.get("riad"), Some("Riad is required"));
    }

    #[test]
    fn reservation_dates_must_be_ordered() {
        let draft = ReservationDraft {
            firstname: "Lina".into(),
            lastname: "Berrada".into(),
            email: "lina@example.com".into(),
            tel: "+212600000000".into(),
            start_date: "2024-08-04".into(),
            end_date: "2024-08-01".into(),
            total_price: "900".into(),
            discount: "".into(),
        };
        let errors = validate_reservation(&draft, "/api/rooms/2", None).unwrap_err();
        assert!(errors.get("end_date").is_some());

        let fixed = ReservationDraft {
            end_date: "2024-08-06".into(),
            ..draft
        };
        let reservation =
            validate_reservation(&fixed, "/api/rooms/2", Some("/api/users/9".into())).unwrap();
        assert_eq!(reservation.nights(), 2);
        assert_eq!(reservation.discount, 0.0);
        assert_eq!(reservation.user.as_deref(), Some("/api/users/9"));
    }

    #[test]
    fn user_update_checks_changed_email_only() {
        assert!(validate_user_update(&UserUpdate::default()).is_ok());
        let update = UserUpdate {
            email: Some("nope".into()),
            ..Default::default()
        };
        assert!(validate_user_update(&update).is_err());
    }
}
