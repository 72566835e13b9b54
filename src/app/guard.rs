//! Session/role guard for protected pages.
//!
//! On every mount the guard reads the stored token, asks the backend whether it
//! is still valid, and only then renders the page. Nothing of the page is shown
//! while the check is pending.

use dioxus::prelude::*;

use super::api::{ApiClient, ApiError, AuthMode};
use super::client::use_api;
use super::components::{AdminLayout, Layout, Spinner};
use super::flash::use_flash;
use super::models::TokenValidation;
use super::session::{Role, SessionKind, SessionLoss};
use super::Route;

pub const MSG_EXPIRED: &str = "Your session has expired. Please log in again.";
pub const MSG_UNAUTHORIZED: &str = "Unauthorized access.";
pub const MSG_VALIDATION_ERROR: &str = "An error occurred while validating the token.";
pub const MSG_FORBIDDEN: &str = "You do not have permission to access this page.";
/// Shown when an admin request comes back with an expired token
pub const MSG_SESSION_ENDED: &str = "Session ended. Please log in again.";

#[derive(Clone, Debug, PartialEq)]
pub enum GuardState {
    Pending,
    Authorized(Option<Role>),
    Redirecting(Redirect),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Redirect {
    pub to: Route,
    pub flash: Option<&'static str>,
    pub clear_token: bool,
}

impl Redirect {
    fn to_login(kind: SessionKind, flash: &'static str) -> Self {
        Self {
            to: kind.login_route(),
            flash: Some(flash),
            clear_token: true,
        }
    }
}

/// Decide what to do with a validation outcome.
///
/// A wrong role keeps the session; every other failure ends it.
pub fn evaluate(
    kind: SessionKind,
    required: Option<Role>,
    outcome: Result<TokenValidation, ApiError>,
) -> GuardState {
    match outcome {
        Ok(v) if v.valid => {
            let role = v.role.as_deref().and_then(Role::parse);
            match required {
                Some(needed) if role != Some(needed) => GuardState::Redirecting(Redirect {
                    to: Route::Unauthorized {},
                    flash: Some(MSG_FORBIDDEN),
                    clear_token: false,
                }),
                _ => GuardState::Authorized(role),
            }
        }
        Ok(_) => GuardState::Redirecting(Redirect::to_login(kind, MSG_UNAUTHORIZED)),
        Err(ApiError::Cancelled) => GuardState::Pending,
        Err(ApiError::ExpiredToken) => GuardState::Redirecting(Redirect::to_login(kind, MSG_EXPIRED)),
        Err(ApiError::MissingToken | ApiError::Unauthorized(_) | ApiError::Forbidden(_)) => {
            GuardState::Redirecting(Redirect::to_login(kind, MSG_UNAUTHORIZED))
        }
        Err(_) => GuardState::Redirecting(Redirect::to_login(kind, MSG_VALIDATION_ERROR)),
    }
}

/// Where a page goes when one of its API calls loses the session.
///
/// The client has already dropped an expired token; a missing one redirects
/// without a message.
pub fn after_session_loss(kind: SessionKind, loss: SessionLoss) -> Redirect {
    let flash = match (loss, kind) {
        (SessionLoss::Missing, _) => None,
        (SessionLoss::Expired, SessionKind::Admin) => Some(MSG_SESSION_ENDED),
        (SessionLoss::Expired, SessionKind::User) => Some(MSG_EXPIRED),
    };
    Redirect {
        to: kind.login_route(),
        flash,
        clear_token: false,
    }
}

/// Run the full check with `api`, clearing the stored token when the session ends.
///
/// Without a stored token the validation endpoint is never called.
pub async fn check_session(
    api: &ApiClient,
    kind: SessionKind,
    required: Option<Role>,
) -> GuardState {
    if api.tokens().get(kind).is_none() {
        return GuardState::Redirecting(Redirect {
            to: kind.login_route(),
            flash: None,
            clear_token: false,
        });
    }

    let state = evaluate(kind, required, api.validate_token(kind.is_admin()).await);
    if let GuardState::Redirecting(redirect) = &state {
        if redirect.clear_token {
            api.tokens().clear(kind);
        }
        tracing::debug!("Guard redirecting to {}", redirect.to);
    }
    state
}

/// Renders `children` once the stored session is validated.
#[component]
pub fn ProtectedRoute(
    kind: SessionKind,
    /// Role the page needs, if any
    required_role: Option<Role>,
    children: Element,
) -> Element {
    // Quiet client: the guard reports failures with its own messages
    let api = use_api(AuthMode::Optional(kind)).quiet();
    let flash = use_flash();
    let nav = use_navigator();
    let mut state = use_signal(|| GuardState::Pending);

    use_hook(move || {
        spawn(async move {
            let next = check_session(&api, kind, required_role).await;
            if let GuardState::Redirecting(redirect) = &next {
                if let Some(msg) = redirect.flash {
                    flash.error(msg);
                }
                nav.replace(redirect.to.clone());
            }
            state.set(next);
        })
    });

    match state() {
        GuardState::Authorized(_) => rsx! { {children} },
        _ => rsx! { Spinner {} },
    }
}

/// Admin back-office page: admin session with the admin role, admin layout.
#[component]
pub fn AdminPage(title: String, nav_active: String, children: Element) -> Element {
    rsx! {
        ProtectedRoute { kind: SessionKind::Admin, required_role: Role::Admin,
            AdminLayout { title, nav_active, {children} }
        }
    }
}

/// Customer page: any valid user session, public layout.
#[component]
pub fn UserPage(title: String, nav_active: String, children: Element) -> Element {
    rsx! {
        ProtectedRoute { kind: SessionKind::User,
            Layout { title, nav_active, {children} }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid(role: Option<&str>) -> Result<TokenValidation, ApiError> {
        Ok(TokenValidation {
            valid: true,
            role: role.map(str::to_string),
        })
    }

    #[test]
    fn lost_sessions_go_back_to_their_login() {
        assert_eq!(
            after_session_loss(SessionKind::Admin, SessionLoss::Expired),
            Redirect {
                to: Route::AdminLogin {},
                flash: Some(MSG_SESSION_ENDED),
                clear_token: false,
            }
        );
        assert_eq!(
            after_session_loss(SessionKind::User, SessionLoss::Expired),
            Redirect {
                to: Route::Login {},
                flash: Some(MSG_EXPIRED),
                clear_token: false,
            }
        );
        assert_eq!(
            after_session_loss(SessionKind::Admin, SessionLoss::Missing).flash,
            None
        );
        assert_eq!(
            after_session_loss(SessionKind::User, SessionLoss::Missing).to,
            Route::Login {}
        );
    }

    #[test]
    fn valid_admin_is_authorized() {
        assert_eq!(
            evaluate(SessionKind::Admin, Some(Role::Admin), valid(Some("ROLE_ADMIN"))),
            GuardState::Authorized(Some(Role::Admin))
        );
    }

    #[test]
    fn wrong_role_goes_to_unauthorized_and_keeps_session() {
        let state = evaluate(SessionKind::Admin, Some(Role::Admin), valid(Some("ROLE_USER")));
        assert_eq!(
            state,
            GuardState::Redirecting(Redirect {
                to: Route::Unauthorized {},
                flash: Some(MSG_FORBIDDEN),
                clear_token: false,
            })
        );
    }

    #[test]
    fn missing_role_is_fine_without_requirement() {
        assert_eq!(
            evaluate(SessionKind::User, None, valid(None)),
            GuardState::Authorized(None)
        );
        assert!(matches!(
            evaluate(SessionKind::Admin, Some(Role::Admin), valid(None)),
            GuardState::Redirecting(Redirect { to: Route::Unauthorized {}, .. })
        ));
    }

    #[test]
    fn invalid_token_goes_to_login() {
        let state = evaluate(
            SessionKind::Admin,
            Some(Role::Admin),
            Ok(TokenValidation {
                valid: false,
                role: None,
            }),
        );
        assert_eq!(
            state,
            GuardState::Redirecting(Redirect::to_login(SessionKind::Admin, MSG_UNAUTHORIZED))
        );
    }

    #[test]
    fn failures_pick_their_message() {
        let redirect_flash = |outcome| match evaluate(SessionKind::User, None, outcome) {
            GuardState::Redirecting(r) => {
                assert_eq!(r.to, Route::Login {});
                assert!(r.clear_token);
                r.flash
            }
            other => panic!("expected redirect, got {:?}", other),
        };

        assert_eq!(redirect_flash(Err(ApiError::ExpiredToken)), Some(MSG_EXPIRED));
        assert_eq!(
            redirect_flash(Err(ApiError::Unauthorized("JWT Token not found".into()))),
            Some(MSG_UNAUTHORIZED)
        );
        assert_eq!(
            redirect_flash(Err(ApiError::Network("offline".into()))),
            Some(MSG_VALIDATION_ERROR)
        );
        assert_eq!(
            redirect_flash(Err(ApiError::Http {
                status: 500,
                message: "boom".into()
            })),
            Some(MSG_VALIDATION_ERROR)
        );
    }

    #[test]
    fn cancelled_check_stays_pending() {
        assert_eq!(
            evaluate(SessionKind::Admin, None, Err(ApiError::Cancelled)),
            GuardState::Pending
        );
    }
}
