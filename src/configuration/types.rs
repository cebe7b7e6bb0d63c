use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::error_handling::types::ConfigError;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    File,
    Database,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(BackendKind::Memory),
            "file" => Ok(BackendKind::File),
            "database" => Ok(BackendKind::Database),
            other => Err(ConfigError::UnknownBackend(other.to_string())),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: BackendKind,
    pub file_path: PathBuf,
    pub database_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            file_path: PathBuf::from("products.json"),
            database_path: PathBuf::from("shopkeep.sqlite3"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub username: String,
    pub password: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            username: String::from("vivekjadhav"),
            password: String::from("vivek123"),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Deserialize)]
#[serde(default)]
pub struct InventorySettings {
    pub low_stock_threshold: u32,
}

impl Default for InventorySettings {
    fn default() -> Self {
        Self {
            low_stock_threshold: 10,
        }
    }
}
