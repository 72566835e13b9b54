//! Riad Booking - Rust Implementation
//!
//! Browser front end for booking riads (guesthouses) and administering them.
//!
//! This library provides:
//! - Dioxus single-page app: public listing and booking pages, customer area,
//!   admin back-office for riads, rooms, users, reservations and images
//! - Session/role guard, modal registry and flash channel shared via context
//! - API client with bearer-token and session-expiry interception
//! - Host server (feature `server`) serving the SPA and forwarding `/api`

pub mod app;
pub mod config;
#[cfg(feature = "server")]
pub mod server;
