//! Top-level application configuration.
//!
//! Configuration is stored in `config.yaml` under the user's config
//! directory and includes:
//! - The backend base URL and request timeout
//! - Default and login routes used by the route guard
//! - An optional override of the role permission table

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::access::PermissionTable;
use crate::error::{FolioError, Result};

/// Overrides the directory holding `config.yaml` and `session.json`
pub const CONFIG_DIR_ENV: &str = "FOLIO_CONFIG_DIR";

/// Overrides `api_url`
pub const API_URL_ENV: &str = "FOLIO_API_URL";

pub const VALID_KEYS: &[&str] = &["api_url", "request_timeout", "default_route", "login_route"];

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the dashboard REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Landing route for authenticated users who hit a denied route
    #[serde(default = "default_route")]
    pub default_route: String,

    /// Route unauthenticated users are sent to
    #[serde(default = "default_login_route")]
    pub login_route: String,

    /// Role permission table; the built-in table is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<PermissionTable>,
}

fn default_api_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_route() -> String {
    "/dashboard".to_string()
}

fn default_login_route() -> String {
    "/login".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout: default_request_timeout(),
            default_route: default_route(),
            login_route: default_login_route(),
            permissions: None,
        }
    }
}

/// Directory holding the config and session files
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var(CONFIG_DIR_ENV)
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    ProjectDirs::from("", "", "folio")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| FolioError::Config("could not determine a config directory".to_string()))
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        Ok(config_dir()?.join("config.yaml"))
    }

    /// Load configuration from file, or return default if not found.
    /// `FOLIO_API_URL` takes precedence over the file.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_file()?;
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            config.api_url = url;
        }

        config.validate()?;
        Ok(config)
    }

    /// The file contents alone, without environment overrides. Used when
    /// the result is going to be saved back.
    pub fn load_file() -> Result<Self> {
        let path = Self::config_path()?;
        let config = if path.exists() {
            let content = fs::read_to_string(&path).map_err(|e| {
                FolioError::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read config at {}: {}", path.display(), e),
                ))
            })?;
            serde_yaml_ng::from_str(&content)?
        } else {
            Config::default()
        };
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                FolioError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.request_timeout == 0 {
            return Err(FolioError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }
        for (key, route) in [
            ("default_route", &self.default_route),
            ("login_route", &self.login_route),
        ] {
            if !route.starts_with('/') {
                return Err(FolioError::Config(format!(
                    "{key} must start with '/', got '{route}'"
                )));
            }
        }
        Ok(())
    }

    /// Parsed base URL, always ending in `/` so relative joins keep the path
    pub fn base_url(&self) -> Result<Url> {
        let mut raw = self.api_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FolioError::Config(format!(
                "api_url must be http or https, got '{}'",
                self.api_url
            )));
        }
        Ok(url)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// The permission table in force
    pub fn permission_table(&self) -> PermissionTable {
        self.permissions.clone().unwrap_or_default()
    }

    /// Read a single key as display text
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self.api_url.clone()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            "default_route" => Ok(self.default_route.clone()),
            "login_route" => Ok(self.login_route.clone()),
            _ => Err(unknown_key(key)),
        }
    }

    /// Set a single key, validating the new value
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "api_url" => updated.api_url = value.to_string(),
            "request_timeout" => {
                updated.request_timeout = value.parse().map_err(|_| {
                    FolioError::Config(format!("request_timeout must be a number, got '{value}'"))
                })?
            }
            "default_route" => updated.default_route = value.to_string(),
            "login_route" => updated.login_route = value.to_string(),
            _ => return Err(unknown_key(key)),
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }
}

fn unknown_key(key: &str) -> FolioError {
    FolioError::Config(format!(
        "unknown config key '{}', expected one of: {}",
        key,
        VALID_KEYS.join(", ")
    ))
}
