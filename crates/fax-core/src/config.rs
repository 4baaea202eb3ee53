//! Configuration management for the fax relay
//!
//! Settings are layered: serde defaults, an optional config file,
//! `FAXRELAY__SECTION__KEY` environment variables, and finally
//! `FAXPLUS_ACCESS_TOKEN` for the provider credential.

use crate::constants::{ACCESS_TOKEN_ENV, DEFAULT_FAXPLUS_BASE_URL, OWNER_SELF};
use crate::error::{FaxError, Result};
use crate::types::CoverLetterMode;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

const ENV_PREFIX: &str = "FAXRELAY";
const ENV_SEPARATOR: &str = "__";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FaxConfig {
    #[serde(default)]
    pub faxplus: FaxPlusConfig,

    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct FaxPlusConfig {
    #[serde(alias = "api_url", default = "default_base_url")]
    pub base_url: String,

    /// Bearer token; absence is reported per request, not at startup
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    #[serde(default = "default_owner_id")]
    pub owner_id: String,

    #[serde(default)]
    pub cover_letter_mode: CoverLetterMode,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FaxPlusConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            access_token: None,
            owner_id: default_owner_id(),
            cover_letter_mode: CoverLetterMode::default(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// Hand-written so the token never reaches the logs
impl std::fmt::Debug for FaxPlusConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaxPlusConfig")
            .field("base_url", &self.base_url)
            .field("access_token", &self.access_token.as_ref().map(|_| "***"))
            .field("owner_id", &self.owner_id)
            .field("cover_letter_mode", &self.cover_letter_mode)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// The only origin allowed by CORS
    #[serde(default = "default_allowed_origin")]
    pub allowed_origin: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            allowed_origin: default_allowed_origin(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.bind_addr
            .parse()
            .map_err(|e| FaxError::Config(format!("Invalid bind address '{}': {}", self.bind_addr, e)))
    }
}

// Default functions
fn default_base_url() -> String {
    DEFAULT_FAXPLUS_BASE_URL.to_string()
}

fn default_owner_id() -> String {
    OWNER_SELF.to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_bind_addr() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_allowed_origin() -> String {
    "http://localhost:3000".to_string()
}

fn default_max_upload_bytes() -> usize {
    20 * 1024 * 1024
}

impl FaxConfig {
    /// Load configuration from the optional file plus the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_token(path, std::env::var(ACCESS_TOKEN_ENV).ok())
    }

    /// Same layering as [`FaxConfig::load`], with the credential supplied by the caller
    pub fn load_with_token(path: Option<&Path>, access_token: Option<String>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let access_token = access_token.filter(|t| !t.trim().is_empty());

        let config: FaxConfig = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .set_override_option("faxplus.access_token", access_token)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: FaxConfig = Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| FaxError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.faxplus.base_url.trim();
        if base_url.is_empty() {
            return Err(FaxError::Config("Fax.Plus base_url is required".to_string()));
        }

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FaxError::Config(format!(
                "Fax.Plus base_url must be an http(s) URL, got '{}'",
                base_url
            )));
        }

        if self.faxplus.owner_id.trim().is_empty() {
            return Err(FaxError::Config("Fax.Plus owner_id is required".to_string()));
        }

        if self.faxplus.timeout_secs == 0 {
            return Err(FaxError::Config("Fax.Plus timeout_secs must be greater than zero".to_string()));
        }

        if self.server.allowed_origin.trim().is_empty() {
            return Err(FaxError::Config("server.allowed_origin is required".to_string()));
        }

        self.server.socket_addr()?;

        Ok(())
    }
}
