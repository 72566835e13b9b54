//! Flash message channel.
//!
//! One message at a time; showing a new one replaces the old and restarts the
//! expiry timer. Every message gets a new id so a timer started for an older
//! message never clears a newer one.

use chrono::{DateTime, Duration, Utc};
use dioxus::prelude::*;

use crate::config::ClientConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FlashKind {
    #[default]
    Success,
    Error,
    Info,
}

impl FlashKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashKind::Success => "flash flash-success",
            FlashKind::Error => "flash flash-error",
            FlashKind::Info => "flash flash-info",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FlashMessage {
    pub id: u64,
    pub text: String,
    pub kind: FlashKind,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlashState {
    current: Option<FlashMessage>,
    next_id: u64,
}

impl FlashState {
    /// Replace the current message; returns the new message id
    pub fn show(
        &mut self,
        text: impl Into<String>,
        kind: FlashKind,
        now: DateTime<Utc>,
        duration: Duration,
    ) -> u64 {
        self.next_id += 1;
        self.current = Some(FlashMessage {
            id: self.next_id,
            text: text.into(),
            kind,
            expires_at: now.checked_add_signed(duration).unwrap_or(DateTime::<Utc>::MAX_UTC),
        });
        self.next_id
    }

    /// Clear the message only if it is still message `id`
    pub fn expire(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|m| m.id == id) {
            self.current = None;
            true
        } else {
            false
        }
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    pub fn current(&self) -> Option<&FlashMessage> {
        self.current.as_ref()
    }

    /// Message still visible at `now`
    pub fn visible(&self, now: DateTime<Utc>) -> Option<&FlashMessage> {
        self.current.as_ref().filter(|m| m.expires_at > now)
    }
}

/// How long the expiry timer sleeps; zero once the deadline has passed
pub fn expiry_delay(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> std::time::Duration {
    expires_at
        .signed_duration_since(now)
        .to_std()
        .unwrap_or_default()
}

/// Flash channel shared via context
#[derive(Clone, Copy)]
pub struct FlashContext {
    state: Signal<FlashState>,
    config: Signal<ClientConfig>,
}

impl FlashContext {
    pub fn show(&self, text: impl Into<String>, kind: FlashKind) {
        let duration = self.config.read().flash_duration();
        let mut state = self.state;
        let id = state.write().show(text, kind, Utc::now(), duration);
        tracing::debug!("Flash #{} ({:?})", id, kind);
    }

    pub fn success(&self, text: impl Into<String>) {
        self.show(text, FlashKind::Success);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.show(text, FlashKind::Error);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.show(text, FlashKind::Info);
    }

    pub fn dismiss(&self) {
        let mut state = self.state;
        state.write().dismiss();
    }

    /// Message to render right now; an overdue one is hidden even before its timer fires
    pub fn visible(&self) -> Option<FlashMessage> {
        self.state.read().visible(Utc::now()).cloned()
    }
}

/// Initialize flash context provider - call once at app root
pub fn use_flash_provider(config: Signal<ClientConfig>) -> FlashContext {
    let state = use_signal(FlashState::default);
    let ctx = use_context_provider(|| FlashContext { state, config });

    // Expiry timer lives in the root scope so it survives page changes
    #[cfg(target_arch = "wasm32")]
    {
        let mut timer = use_signal(|| None::<Task>);
        use_effect(move || {
            let pending = state.read().current().map(|m| (m.id, m.expires_at));
            if let Some(task) = timer.write().take() {
                task.cancel();
            }
            if let Some((id, expires_at)) = pending {
                let wait = expiry_delay(expires_at, Utc::now());
                let mut state = state;
                let task = spawn(async move {
                    gloo_timers::future::sleep(wait).await;
                    state.write().expire(id);
                });
                timer.set(Some(task));
            }
        });
    }

    ctx
}

/// Get flash context - use in any component
pub fn use_flash() -> FlashContext {
    use_context::<FlashContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: i64) -> Duration {
        Duration::seconds(n)
    }

    #[test]
    fn last_message_wins() {
        let now = Utc::now();
        let mut state = FlashState::default();
        state.show("a", FlashKind::Info, now, secs(3));
        state.show("b", FlashKind::Error, now, secs(3));

        let current = state.visible(now).expect("message visible");
        assert_eq!(current.text, "b");
        assert_eq!(current.kind, FlashKind::Error);
    }

    #[test]
    fn stale_timer_does_not_clear_newer_message() {
        let now = Utc::now();
        let mut state = FlashState::default();
        let first = state.show("a", FlashKind::Success, now, secs(3));
        let second = state.show("b", FlashKind::Success, now + secs(2), secs(3));

        assert!(!state.expire(first));
        assert_eq!(state.current().map(|m| m.text.as_str()), Some("b"));

        assert!(state.expire(second));
        assert!(state.current().is_none());
    }

    #[test]
    fn message_is_hidden_after_duration() {
        let now = Utc::now();
        let mut state = FlashState::default();
        state.show("saved", FlashKind::Success, now, Duration::milliseconds(3000));

        assert!(state.visible(now + Duration::milliseconds(2999)).is_some());
        assert!(state.visible(now + Duration::milliseconds(3000)).is_none());
    }

    #[test]
    fn timer_waits_out_the_remaining_duration() {
        let now = Utc::now();
        let mut state = FlashState::default();
        state.show("saved", FlashKind::Success, now, Duration::milliseconds(3000));
        let expires_at = state.current().map(|m| m.expires_at).unwrap();

        assert_eq!(
            expiry_delay(expires_at, now + secs(1)),
            std::time::Duration::from_millis(2000)
        );
        assert_eq!(expiry_delay(expires_at, now + secs(5)), std::time::Duration::ZERO);
    }

    #[test]
    fn huge_duration_does_not_overflow() {
        let now = Utc::now();
        let mut state = FlashState::default();
        state.show("x", FlashKind::Info, now, Duration::milliseconds(i64::MAX));
        assert!(state.visible(now + Duration::days(365)).is_some());
    }

    #[test]
    fn dismiss_clears_immediately() {
        let now = Utc::now();
        let mut state = FlashState::default();
        let id = state.show("x", FlashKind::Info, now, secs(3));
        state.dismiss();
        assert!(state.current().is_none());
        assert!(!state.expire(id));
    }
}
