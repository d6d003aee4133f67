//! Configuration loading and validation.
//!
//! JSON5 format. Config location: `~/.rentadmin/rentadmin.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::credentials::{CookieSettings, DEFAULT_COOKIE_NAME, DEFAULT_TTL_DAYS};

/// Longest accepted session lifetime, in days.
pub const MAX_TTL_DAYS: u32 = 3650;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON5 parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] json5::Error),

    /// Config validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Remote backend.
    #[serde(default)]
    pub api: ApiConfig,

    /// Auth bridge server.
    #[serde(default)]
    pub bridge: BridgeConfig,

    /// Session cookie.
    #[serde(default)]
    pub session: SessionConfig,

    /// Media asset host.
    #[serde(default)]
    pub media: MediaConfig,

    /// Global settings.
    #[serde(default)]
    pub settings: GlobalSettings,
}

impl Config {
    /// Load configuration from the default location, then apply env overrides.
    ///
    /// # Errors
    ///
    /// Returns error if config cannot be loaded or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        let config = if path.exists() {
            Self::load(&path)?
        } else {
            Self::default()
        };
        let config = config.with_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a path.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Self::state_dir().join("rentadmin.json")
    }

    /// Get the state directory.
    ///
    /// Uses `RENTADMIN_STATE_DIR` env var if set, otherwise `~/.rentadmin`.
    #[must_use]
    pub fn state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("RENTADMIN_STATE_DIR") {
            PathBuf::from(dir)
        } else if let Some(home) = dirs::home_dir() {
            home.join(".rentadmin")
        } else {
            PathBuf::from(".rentadmin")
        }
    }

    /// Directory holding the persisted session cookie.
    #[must_use]
    pub fn credentials_dir() -> PathBuf {
        Self::state_dir().join("credentials")
    }

    /// Apply environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("RENTADMIN_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(env) = std::env::var("RENTADMIN_ENV") {
            if let Some(parsed) = Environment::parse(&env) {
                self.settings.environment = parsed;
            }
        }
        if let Ok(cloud) = std::env::var("RENTADMIN_CLOUD_NAME") {
            self.media.cloud_name = Some(cloud);
        }
        if let Ok(preset) = std::env::var("RENTADMIN_UPLOAD_PRESET") {
            self.media.upload_preset = Some(preset);
        }
        self
    }

    /// Cookie settings derived from the session section and environment.
    #[must_use]
    pub fn cookie_settings(&self) -> CookieSettings {
        CookieSettings {
            name: self.session.cookie_name.clone(),
            ttl_days: self.session.ttl_days,
            secure: self.settings.environment.is_production(),
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bridge.port == 0 {
            return Err(ConfigError::Validation(
                "Bridge port cannot be 0".to_string(),
            ));
        }

        if !(self.api.base_url.starts_with("http://") || self.api.base_url.starts_with("https://"))
        {
            return Err(ConfigError::Validation(format!(
                "API base URL must be http(s): '{}'",
                self.api.base_url
            )));
        }

        if self.session.ttl_days == 0 || self.session.ttl_days > MAX_TTL_DAYS {
            return Err(ConfigError::Validation(format!(
                "Session ttlDays must be between 1 and {MAX_TTL_DAYS}"
            )));
        }

        for origin in &self.bridge.allowed_origins {
            let valid = (origin.starts_with("http://") || origin.starts_with("https://"))
                && !origin.ends_with('/');
            if !valid {
                return Err(ConfigError::Validation(format!(
                    "Bridge allowedOrigins entry must be a bare http(s) origin: '{origin}'"
                )));
            }
        }

        if self.session.cookie_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Session cookie name cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Remote backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfig {
    /// Base URL every adapter path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:5000/api/v1".to_string()
}

/// Auth bridge server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address mode.
    #[serde(default)]
    pub mode: BindMode,

    /// Origins allowed to call the bridge cross-origin with credentials.
    /// Empty means same-origin only.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            mode: BindMode::default(),
            allowed_origins: Vec::new(),
        }
    }
}

const fn default_port() -> u16 {
    3000
}

/// Bridge bind mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BindMode {
    /// Bind to localhost only.
    #[default]
    Local,
    /// Bind to all interfaces.
    Public,
    /// Custom bind address.
    Custom(String),
}

impl BindMode {
    /// Address to bind.
    #[must_use]
    pub fn address(&self) -> String {
        match self {
            Self::Local => "127.0.0.1".to_string(),
            Self::Public => "0.0.0.0".to_string(),
            Self::Custom(addr) => addr.clone(),
        }
    }
}

/// Session cookie configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionConfig {
    /// Cookie name.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,

    /// Lifetime in days.
    #[serde(default = "default_ttl_days")]
    pub ttl_days: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: default_cookie_name(),
            ttl_days: default_ttl_days(),
        }
    }
}

fn default_cookie_name() -> String {
    DEFAULT_COOKIE_NAME.to_string()
}

const fn default_ttl_days() -> u32 {
    DEFAULT_TTL_DAYS
}

/// Media asset host configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaConfig {
    /// Full upload endpoint override.
    #[serde(default)]
    pub upload_url: Option<String>,

    /// Asset host account name.
    #[serde(default)]
    pub cloud_name: Option<String>,

    /// Unsigned upload preset.
    #[serde(default)]
    pub upload_preset: Option<String>,

    /// Folder used when none is given.
    #[serde(default = "default_folder")]
    pub default_folder: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_url: None,
            cloud_name: None,
            upload_preset: None,
            default_folder: default_folder(),
        }
    }
}

fn default_folder() -> String {
    "rentadmin".to_string()
}

/// Global settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalSettings {
    /// Deployment environment.
    #[serde(default)]
    pub environment: Environment,

    /// Enable debug logging.
    #[serde(default)]
    pub debug: bool,

    /// Log format.
    #[serde(default)]
    pub log_format: LogFormat,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development.
    #[default]
    Development,
    /// Production: cookies are `Secure`.
    Production,
}

impl Environment {
    /// Parse `development`/`dev`/`production`/`prod`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Whether this is production.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Log format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable format.
    #[default]
    Pretty,
    /// JSON format.
    Json,
}
