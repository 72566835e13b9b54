//! Page components, one per route.
//!
//! Protected pages wrap their content in [`AdminPage`](crate::app::guard::AdminPage)
//! or [`UserPage`](crate::app::guard::UserPage) so the session is validated on mount.

mod edit_user;
mod forgot_password;
mod home;
mod login;
mod password_reset;
mod profile;
mod register;
mod reservations;
mod riad_detail;
mod riads;
mod rooms;
mod status;
mod user_detail;
mod users;

pub use edit_user::EditUser;
pub use forgot_password::ForgotPassword;
pub use home::Home;
pub use login::{AdminLogin, Login};
pub use password_reset::PasswordReset;
pub use profile::Profile;
pub use register::Register;
pub use reservations::Reservations;
pub use riad_detail::RiadDetail;
pub use riads::AdminRiads;
pub use rooms::ListRooms;
pub use status::{NotFound, Unauthorized};
pub use user_detail::UserDetail;
pub use users::ListUsers;
