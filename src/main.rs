//! Riad Booking
//!
//! With the `server` feature this is the host that serves the built SPA and
//! forwards `/api`; the web build launches the Dioxus app in the browser.

#[cfg(feature = "server")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    riad_booking::server::run().await
}

#[cfg(not(feature = "server"))]
fn main() {
    dioxus::launch(riad_booking::app::App);
}
