//! Configuration loading and resolution
//!
//! Each setting is resolved in priority order:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable
//! 3. TOML config file
//! 4. Compiled default (fallback)

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Environment variable overriding the player host
pub const ENV_HOST: &str = "WEBREMOTE_HOST";
/// Environment variable overriding the player port
pub const ENV_PORT: &str = "WEBREMOTE_PORT";
/// Environment variable overriding the access key
pub const ENV_ACCESS_KEY: &str = "WEBREMOTE_ACCESS_KEY";

/// Default local ticker period; the seek bar advances this often
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 250;

/// Remote client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Host running the player's web remote server
    pub host: String,
    /// Port of the web remote server
    pub port: u16,
    /// Shared passphrase used to sign requests
    pub access_key: String,
    /// Local position ticker period in milliseconds
    pub tick_interval_ms: u64,
    /// Start the local stream as soon as the channel connects
    pub stream_on_connect: bool,
    /// tracing filter directive used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8000,
            access_key: String::new(),
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            stream_on_connect: false,
            log_level: "info".to_string(),
        }
    }
}

impl ClientConfig {
    /// `host:port` authority used in URLs
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject values the client cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Config("host must not be empty".to_string()));
        }
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be non-zero".to_string()));
        }
        Ok(())
    }
}

/// Values supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub access_key: Option<String>,
}

/// Load a TOML config file
pub fn load_config_file(path: &Path) -> Result<ClientConfig> {
    let content = std::fs::read_to_string(path)?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Invalid config file {}: {}", path.display(), e)))
}

/// Platform config file location: `<config dir>/webremote/config.toml`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("webremote").join("config.toml"))
}

/// Resolve the effective configuration
///
/// An explicitly named config file must exist. A missing file at the
/// platform default location only logs a warning and falls back to the
/// compiled defaults.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ClientConfig> {
    // Priority 4 then 3: compiled defaults, replaced by the config file
    let mut config = match &overrides.config_path {
        Some(path) => load_config_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_config_file(&path)?,
            Some(path) => {
                warn!("No config file at {}, using defaults", path.display());
                ClientConfig::default()
            }
            None => ClientConfig::default(),
        },
    };

    // Priority 2: environment variables
    if let Ok(host) = std::env::var(ENV_HOST) {
        debug!("{} overrides host", ENV_HOST);
        config.host = host;
    }
    if let Ok(port) = std::env::var(ENV_PORT) {
        debug!("{} overrides port", ENV_PORT);
        config.port = port
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {} '{}': {}", ENV_PORT, port, e)))?;
    }
    if let Ok(key) = std::env::var(ENV_ACCESS_KEY) {
        debug!("{} overrides access key", ENV_ACCESS_KEY);
        config.access_key = key;
    }

    // Priority 1: command line
    if let Some(host) = &overrides.host {
        config.host = host.clone();
    }
    if let Some(port) = overrides.port {
        config.port = port;
    }
    if let Some(key) = &overrides.access_key {
        config.access_key = key.clone();
    }

    config.validate()?;
    Ok(config)
}
