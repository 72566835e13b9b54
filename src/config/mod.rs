//! Configuration management
//!
//! `ClientConfig` is shared by the browser build and the host; `ServerConfig` and the
//! file/env loader only exist with the `server` feature.

use serde::{Deserialize, Serialize};

/// Backend API base used when nothing else is configured
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// How long a flash message stays visible
pub const DEFAULT_FLASH_DURATION_MS: u64 = 3000;

/// Longest flash duration honoured; larger configured values are clamped
pub const MAX_FLASH_DURATION_MS: u64 = 60_000;

/// Settings the browser app needs at runtime.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    /// Base URL every API path is appended to (no trailing slash)
    pub api_base_url: String,
    /// Origin that relative image URLs (`/uploads/...`) are resolved against
    pub backend_origin: String,
    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,
}

fn default_flash_duration_ms() -> u64 {
    DEFAULT_FLASH_DURATION_MS
}

impl Default for ClientConfig {
    fn default() -> Self {
        let api_base_url = option_env!("RIAD_API_BASE_URL")
            .unwrap_or(DEFAULT_API_BASE_URL)
            .to_string();
        Self::for_api(&api_base_url)
    }
}

impl ClientConfig {
    /// Build a config for the given API base, deriving the backend origin from it.
    pub fn for_api(api_base_url: &str) -> Self {
        let api_base_url = api_base_url.trim_end_matches('/').to_string();
        let backend_origin = origin_of(&api_base_url).unwrap_or_default();
        Self {
            api_base_url,
            backend_origin,
            flash_duration_ms: DEFAULT_FLASH_DURATION_MS,
        }
    }

    pub fn flash_duration(&self) -> chrono::Duration {
        chrono::Duration::milliseconds(self.flash_duration_ms.min(MAX_FLASH_DURATION_MS) as i64)
    }

    /// Resolve an asset path returned by the backend (e.g. an image URL).
    ///
    /// Absolute URLs are returned unchanged.
    pub fn asset_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.backend_origin, path)
        } else {
            format!("{}/uploads/images/{}", self.backend_origin, path)
        }
    }
}

/// Scheme + host (+ port) of a URL, or `None` for relative URLs.
fn origin_of(raw: &str) -> Option<String> {
    let parsed = url::Url::parse(raw).ok()?;
    match parsed.origin() {
        url::Origin::Tuple(..) => Some(parsed.origin().ascii_serialization()),
        url::Origin::Opaque(_) => None,
    }
}

#[cfg(feature = "server")]
mod server_config;

#[cfg(feature = "server")]
pub use server_config::{get_config_dir, load_config, ServerConfig};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let cfg = ClientConfig::for_api("http://localhost:8000/api/");
        assert_eq!(cfg.api_base_url, "http://localhost:8000/api");
    }

    #[test]
    fn origin_is_derived_from_api_base() {
        let cfg = ClientConfig::for_api("https://riads.example.com:8443/api");
        assert_eq!(cfg.backend_origin, "https://riads.example.com:8443");
    }

    #[test]
    fn relative_api_base_has_empty_origin() {
        let cfg = ClientConfig::for_api("/api");
        assert_eq!(cfg.api_base_url, "/api");
        assert_eq!(cfg.backend_origin, "");
    }

    #[test]
    fn asset_urls_resolve_against_backend() {
        let cfg = ClientConfig::for_api("http://localhost:8000/api");
        assert_eq!(
            cfg.asset_url("/images/riads/a.jpg"),
            "http://localhost:8000/images/riads/a.jpg"
        );
        assert_eq!(
            cfg.asset_url("front.jpg"),
            "http://localhost:8000/uploads/images/front.jpg"
        );
        assert_eq!(
            cfg.asset_url("https://cdn.example.com/x.png"),
            "https://cdn.example.com/x.png"
        );
    }

    #[test]
    fn flash_duration_defaults_when_missing() {
        let cfg: ClientConfig = serde_json::from_str(
            r#"{"api_base_url":"/api","backend_origin":""}"#,
        )
        .unwrap();
        assert_eq!(cfg.flash_duration_ms, DEFAULT_FLASH_DURATION_MS);
    }

    #[test]
    fn oversized_flash_duration_is_clamped() {
        let cfg: ClientConfig = serde_json::from_str(
            r#"{"api_base_url":"/api","backend_origin":"","flash_duration_ms":10000000000000000}"#,
        )
        .unwrap();
        assert_eq!(
            cfg.flash_duration(),
            chrono::Duration::milliseconds(MAX_FLASH_DURATION_MS as i64)
        );
        assert_eq!(
            ClientConfig::for_api("/api").flash_duration(),
            chrono::Duration::milliseconds(3000)
        );
    }
}
