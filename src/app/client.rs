//! Runtime client configuration and the per-component API client hook.

use std::rc::Rc;

use dioxus::prelude::*;

use super::api::{ApiClient, AuthMode, FetchTransport, SessionHooks};
use super::cancel::use_cancel_token;
use super::flash::{use_flash, FlashContext};
use super::guard::after_session_loss;
use super::session::{token_store, SessionKind, SessionLoss};
use crate::config::ClientConfig;
use dioxus::router::Navigator;

/// Client configuration shared via context
#[derive(Clone, Copy)]
pub struct ConfigContext {
    pub config: Signal<ClientConfig>,
    /// Set once `/app-config.json` was tried
    pub loaded: Signal<bool>,
}

/// Initialize client config provider - call once at app root
pub fn use_config_provider() -> ConfigContext {
    let config = use_signal(ClientConfig::default);
    let loaded = use_signal(|| !cfg!(target_arch = "wasm32"));
    let ctx = use_context_provider(|| ConfigContext { config, loaded });

    // Client-side only: the host publishes its settings next to the app
    #[cfg(target_arch = "wasm32")]
    {
        let mut config = config;
        let mut loaded = loaded;
        use_hook(move || {
            spawn(async move {
                match super::api::fetch_json::<ClientConfig>("/app-config.json").await {
                    Ok(remote) => {
                        tracing::debug!("Using API base {}", remote.api_base_url);
                        config.set(remote);
                    }
                    Err(e) => {
                        tracing::debug!("No /app-config.json ({}), using built-in defaults", e);
                    }
                }
                loaded.set(true);
            })
        });
    }

    ctx
}

pub fn use_client_config() -> ClientConfig {
    use_context::<ConfigContext>().config.read().clone()
}

/// Flash + navigation when the API client loses a session
struct BrowserSessionHooks {
    flash: FlashContext,
    nav: Navigator,
}

impl SessionHooks for BrowserSessionHooks {
    fn session_lost(&self, kind: SessionKind, loss: SessionLoss) {
        let redirect = after_session_loss(kind, loss);
        if let Some(msg) = redirect.flash {
            self.flash.error(msg);
        }
        tracing::debug!("Session {:?} lost ({:?})", kind, loss);
        self.nav.replace(redirect.to);
    }
}

/// API client for the calling component.
///
/// Requests are aborted when the component unmounts.
pub fn use_api(mode: AuthMode) -> ApiClient {
    let config = use_context::<ConfigContext>().config;
    let flash = use_flash();
    let nav = use_navigator();
    let cancel = use_cancel_token();

    use_hook(move || {
        ApiClient::new(
            config.peek().api_base_url.clone(),
            token_store(),
            Rc::new(FetchTransport),
        )
        .with_mode(mode)
        .with_hooks(Rc::new(BrowserSessionHooks { flash, nav }))
        .with_cancel(cancel)
    })
}

/// Client for the admin back-office
pub fn use_admin_api() -> ApiClient {
    use_api(AuthMode::Required(SessionKind::Admin))
}
