use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use super::{
    ClientConfig, DEFAULT_API_BASE_URL, DEFAULT_FLASH_DURATION_MS, MAX_FLASH_DURATION_MS,
};

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Overrides the origin derived from `api_base_url`
    #[serde(default)]
    pub backend_origin: Option<String>,

    /// Output directory of `dx build --platform web`
    #[serde(default = "default_dist_dir")]
    pub dist_dir: PathBuf,

    #[serde(default = "default_flash_duration_ms")]
    pub flash_duration_ms: u64,
}

fn default_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_dist_dir() -> PathBuf {
    PathBuf::from("dist")
}

fn default_flash_duration_ms() -> u64 {
    DEFAULT_FLASH_DURATION_MS
}

impl ServerConfig {
    /// Configuration handed to the browser via `/app-config.json`.
    ///
    /// The browser always talks to this host's `/api` forwarder, so it never needs
    /// CORS access to the backend itself.
    pub fn client_config(&self) -> ClientConfig {
        let upstream = ClientConfig::for_api(&self.api_base_url);
        ClientConfig {
            api_base_url: "/api".to_string(),
            backend_origin: self
                .backend_origin
                .clone()
                .unwrap_or(upstream.backend_origin),
            flash_duration_ms: self.flash_duration_ms.min(MAX_FLASH_DURATION_MS),
        }
    }
}

/// Get config directory (RIAD_CONFIG_DIR or platform default)
pub fn get_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("RIAD_CONFIG_DIR") {
        return PathBuf::from(dir);
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join("Library/Application Support/riad-booking");
        }
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("riad-booking");
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".config/riad-booking");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(appdata) = std::env::var("APPDATA") {
            return PathBuf::from(appdata).join("riad-booking");
        }
    }

    PathBuf::from(".")
}

pub fn load_config() -> Result<ServerConfig> {
    let config_dir = get_config_dir();

    let mut builder = ::config::Config::builder()
        .set_default("port", default_port() as i64)?
        // riad.toml / riad.json / ... if present
        .add_source(
            ::config::File::with_name(&config_dir.join("riad").to_string_lossy()).required(false),
        )
        // RIAD_PORT, RIAD_API_BASE_URL, RIAD_DIST_DIR, ...
        .add_source(
            ::config::Environment::with_prefix("RIAD")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    // Precedence: RIAD_PORT > PORT > config file > default
    if std::env::var("RIAD_PORT").is_err() {
        if let Ok(port) = std::env::var("PORT") {
            if let Ok(port_num) = port.parse::<u16>() {
                builder = builder.set_override("port", port_num as i64)?;
            }
        }
    }

    let config: ServerConfig = builder.build()?.try_deserialize()?;
    tracing::debug!(
        "Loaded config from {:?}: port={}, api={}",
        config_dir,
        config.port,
        config.api_base_url
    );
    Ok(config)
}
