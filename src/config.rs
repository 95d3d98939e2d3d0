//! Configuration parsing and validation.
//!
//! Shepherd reads a TOML file (default `./config/shepherd.toml`). API
//! credentials never live in the file: it names the environment variables
//! that hold them, and [`Credentials::from_env`] reads those at startup.
//!
//! ```toml
//! [backend]
//! base_url = "https://api.planningcenteronline.com"
//! timeout_secs = 10
//! app_id_env = "PCO_APP_ID"
//! secret_env = "PCO_SECRET"
//!
//! [search]
//! people_page_size = 5
//! gatherings_cap = 5
//! query_groups = true
//!
//! [search.retry]
//! min_token_chars = 3
//!
//! [server]
//! bind = "127.0.0.1:7341"
//!
//! [logging]
//! level = "info"
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use shepherd_core::search::SearchPolicy;
use std::fmt;
use std::path::Path;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub backend: BackendConfig,
    #[serde(default)]
    pub search: SearchPolicy,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_app_id_env")]
    pub app_id_env: String,
    #[serde(default = "default_secret_env")]
    pub secret_env: String,
}

fn default_timeout_secs() -> u64 {
    10
}
fn default_app_id_env() -> String {
    "PCO_APP_ID".to_string()
}
fn default_secret_env() -> String {
    "PCO_SECRET".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:7341".to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// HTTP Basic credential pair for the record-store API.
#[derive(Clone)]
pub struct Credentials {
    pub app_id: String,
    pub secret: String,
}

impl Credentials {
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
        }
    }

    /// Read the pair from the environment variables named in `[backend]`.
    ///
    /// Fails when either variable is unset or empty.
    pub fn from_env(backend: &BackendConfig) -> Result<Self> {
        let app_id = read_env(&backend.app_id_env)?;
        let secret = read_env(&backend.secret_env)?;
        Ok(Self { app_id, secret })
    }
}

fn read_env(name: &str) -> Result<String> {
    let value = std::env::var(name)
        .with_context(|| format!("{} environment variable not set", name))?;
    if value.trim().is_empty() {
        bail!("{} environment variable is empty", name);
    }
    Ok(value)
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("app_id", &self.app_id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    // Validate backend
    let url = config.backend.base_url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        bail!(
            "backend.base_url must start with http:// or https:// (got '{}')",
            config.backend.base_url
        );
    }
    if config.backend.timeout_secs == 0 {
        bail!("backend.timeout_secs must be > 0");
    }
    if config.backend.app_id_env.is_empty() || config.backend.secret_env.is_empty() {
        bail!("backend.app_id_env and backend.secret_env must not be empty");
    }

    // Validate search policy
    let search = &config.search;
    for (key, value) in [
        ("search.people_page_size", search.people_page_size),
        ("search.calendar_page_size", search.calendar_page_size),
        ("search.groups_page_size", search.groups_page_size),
        ("search.retry.page_size", search.retry.page_size),
        ("search.retry.min_token_chars", search.retry.min_token_chars),
    ] {
        if value == 0 {
            bail!("{} must be >= 1", key);
        }
    }
    if !(1..=25).contains(&search.gatherings_cap) {
        bail!("search.gatherings_cap must be in [1, 25]");
    }

    Ok(())
}
