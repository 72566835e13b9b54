//! Shared UI components.

pub mod error_alert;
pub mod flash_banner;
pub mod form_inputs;
pub mod image_gallery;
pub mod layout;
pub mod modal;
pub mod nav;
pub mod registration_form;
pub mod room_form;
pub mod spinner;

pub use error_alert::ErrorAlert;
pub use flash_banner::FlashBanner;
pub use form_inputs::{FileInput, TextArea, TextField};
pub use image_gallery::ImageGallery;
pub use layout::{AdminLayout, Layout};
pub use modal::Modal;
pub use nav::{AdminNav, PublicNav};
pub use registration_form::RegistrationForm;
pub use room_form::RoomFields;
pub use spinner::Spinner;
