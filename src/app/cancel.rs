//! Cancellation of in-flight requests when a component goes away.

use std::cell::Cell;
use std::rc::Rc;

use dioxus::prelude::*;

#[derive(Clone, Default)]
pub struct CancelToken {
    inner: Rc<Inner>,
}

#[derive(Default)]
struct Inner {
    cancelled: Cell<bool>,
    #[cfg(target_arch = "wasm32")]
    abort: Option<web_sys::AbortController>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(Inner {
                cancelled: Cell::new(false),
                #[cfg(target_arch = "wasm32")]
                abort: web_sys::AbortController::new().ok(),
            }),
        }
    }

    pub fn cancel(&self) {
        if self.inner.cancelled.replace(true) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        if let Some(controller) = &self.inner.abort {
            controller.abort();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.get()
    }

    /// Signal to hand to `fetch` so cancelling aborts the request
    #[cfg(target_arch = "wasm32")]
    pub fn abort_signal(&self) -> Option<web_sys::AbortSignal> {
        self.inner.abort.as_ref().map(|c| c.signal())
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Token cancelled when the calling component unmounts
pub fn use_cancel_token() -> CancelToken {
    let token = use_hook(CancelToken::new);
    let on_drop = token.clone();
    use_drop(move || on_drop.cancel());
    token
}
