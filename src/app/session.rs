//! Session tokens and roles.
//!
//! Tokens live in `localStorage` in the browser: the admin back-office uses
//! `token_admin`, the customer area uses `token`. This is the only module that
//! touches browser storage.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::Route;

/// Role carried by a validated token
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Accepts both `ROLE_ADMIN` and `ADMIN` spellings
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ROLE_ADMIN" | "ADMIN" => Some(Role::Admin),
            "ROLE_USER" | "USER" => Some(Role::User),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "ROLE_USER",
            Role::Admin => "ROLE_ADMIN",
        }
    }
}

/// Which login a token belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SessionKind {
    Admin,
    User,
}

impl SessionKind {
    pub fn storage_key(&self) -> &'static str {
        match self {
            SessionKind::Admin => "token_admin",
            SessionKind::User => "token",
        }
    }

    pub fn login_route(&self) -> Route {
        match self {
            SessionKind::Admin => Route::AdminLogin {},
            SessionKind::User => Route::Login {},
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, SessionKind::Admin)
    }
}

/// Why a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionLoss {
    /// No token stored when one was required
    Missing,
    /// Backend answered 401 "Expired JWT Token"
    Expired,
}

/// Persistent token storage
pub trait TokenStore {
    fn get(&self, kind: SessionKind) -> Option<String>;
    fn set(&self, kind: SessionKind, token: &str);
    fn clear(&self, kind: SessionKind);
}

/// In-memory store, used off-browser and in tests
#[derive(Clone, Default)]
pub struct MemoryTokenStore {
    tokens: Rc<RefCell<HashMap<SessionKind, String>>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(kind: SessionKind, token: &str) -> Self {
        let store = Self::new();
        store.set(kind, token);
        store
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, kind: SessionKind) -> Option<String> {
        self.tokens.borrow().get(&kind).cloned()
    }

    fn set(&self, kind: SessionKind, token: &str) {
        self.tokens.borrow_mut().insert(kind, token.to_string());
    }

    fn clear(&self, kind: SessionKind) {
        self.tokens.borrow_mut().remove(&kind);
    }
}

/// `window.localStorage` backed store
#[cfg(target_arch = "wasm32")]
#[derive(Clone, Copy, Default)]
pub struct LocalStorageStore;

#[cfg(target_arch = "wasm32")]
impl LocalStorageStore {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

#[cfg(target_arch = "wasm32")]
impl TokenStore for LocalStorageStore {
    fn get(&self, kind: SessionKind) -> Option<String> {
        Self::storage()?
            .get_item(kind.storage_key())
            .ok()
            .flatten()
            .filter(|t| !t.is_empty())
    }

    fn set(&self, kind: SessionKind, token: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(kind.storage_key(), token).is_err() {
                tracing::warn!("Failed to persist {} token", kind.storage_key());
            }
        }
    }

    fn clear(&self, kind: SessionKind) {
        if let Some(storage) = Self::storage() {
            if storage.remove_item(kind.storage_key()).is_err() {
                tracing::warn!("Failed to clear {} token", kind.storage_key());
            }
        }
    }
}

/// Token store for the current platform
pub fn token_store() -> Rc<dyn TokenStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(LocalStorageStore)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        thread_local! {
            static STORE: MemoryTokenStore = MemoryTokenStore::new();
        }
        Rc::new(STORE.with(|s| s.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parsing_accepts_both_spellings() {
        assert_eq!(Role::parse("ROLE_ADMIN"), Some(Role::Admin));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("ROLE_USER"), Some(Role::User));
        assert_eq!(Role::parse("ROLE_MANAGER"), None);
    }

    #[test]
    fn session_kinds_use_separate_keys() {
        assert_eq!(SessionKind::Admin.storage_key(), "token_admin");
        assert_eq!(SessionKind::User.storage_key(), "token");
        assert_eq!(SessionKind::Admin.login_route(), Route::AdminLogin {});
        assert_eq!(SessionKind::User.login_route(), Route::Login {});
    }

    #[test]
    fn memory_store_keeps_kinds_apart() {
        let store = MemoryTokenStore::with_token(SessionKind::Admin, "abc");
        assert_eq!(store.get(SessionKind::Admin).as_deref(), Some("abc"));
        assert_eq!(store.get(SessionKind::User), None);

        store.clear(SessionKind::Admin);
        assert_eq!(store.get(SessionKind::Admin), None);
    }

    #[test]
    fn cloned_memory_store_shares_tokens() {
        let store = MemoryTokenStore::new();
        let other = store.clone();
        store.set(SessionKind::User, "t");
        assert_eq!(other.get(SessionKind::User).as_deref(), Some("t"));
    }
}
