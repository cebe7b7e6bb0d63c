use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::*;
use crate::error_handling::types::ConfigError;

/// Application configuration structure that defines all runtime parameters.
///
/// This structure holds the complete configuration for the application, including
/// network settings, storage backend selection, panel credentials and inventory
/// thresholds. It uses the `toml` and `serde` derive macros for configuration file
/// parsing; every section is optional and falls back to its default.
///
/// # Examples
///
/// ```no_run
/// use shopkeep::configuration::config::Config;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::from_file("shopkeep.toml")?;
/// println!("Binding to: {}", config.bind_address);
/// println!("Backend: {:?}", config.storage.backend);
/// # Ok(())
/// # }
/// ```
///
/// # Fields Overview
///
/// The configuration contains the following attributes:
/// - `bind_address`: For server binding
/// - `web_ui_port`: Port on which to expose the web panel
/// - `storage`: Backend selection plus the file and database paths the
///   file-backed and SQLite-backed stores use
/// - `auth`: The single credential pair accepted by the login route
/// - `inventory`: Reporting thresholds used by the dashboard statistics
#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Network address to bind the server to.
    ///
    /// Specifies the IP address the server should listen on for incoming
    /// connections.
    pub bind_address: String,

    /// Port number for the web user interface.
    ///
    /// Port number should not be reserved by IANA so mostly in the range of
    /// 1024 - 65535 both included; `validate` enforces the range.
    pub web_ui_port: u16,

    /// Storage backend selection and backend-specific paths
    pub storage: StorageSettings,

    /// Credential pair gating the panel routes
    pub auth: AuthSettings,

    /// Inventory reporting thresholds
    pub inventory: InventorySettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: String::from("127.0.0.1"),
            web_ui_port: 8080,
            storage: StorageSettings::default(),
            auth: AuthSettings::default(),
            inventory: InventorySettings::default(),
        }
    }
}

impl Config {
    /// Loads a configuration from a TOML file.
    ///
    /// Missing sections take their default values, so a partial file is
    /// accepted. The result is not validated; call [`Config::validate`]
    /// before using it.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let raw = fs::read_to_string(path)?;
        toml::from_str(&raw).map_err(|e| ConfigError::TomlError(e.to_string()))
    }

    /// Checks the invariants a usable configuration must satisfy.
    ///
    /// # Errors
    /// Returns `ConfigError::NotInRange` when `web_ui_port` falls in the
    /// IANA-reserved range, and `ConfigError::EmptyCredentials` when either
    /// credential is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.web_ui_port < 1024 {
            return Err(ConfigError::NotInRange(format!(
                "web_ui_port {} is reserved; use 1024-65535",
                self.web_ui_port
            )));
        }
        if self.auth.username.trim().is_empty() {
            return Err(ConfigError::EmptyCredentials(String::from("username")));
        }
        if self.auth.password.trim().is_empty() {
            return Err(ConfigError::EmptyCredentials(String::from("password")));
        }
        Ok(())
    }
}
