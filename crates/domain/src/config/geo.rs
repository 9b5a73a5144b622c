use super::{parse_duration, ConfigError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `geo.database` accepts a single path or a list; only a single entry is valid.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DatabasePaths {
    Single(String),
    Multiple(Vec<String>),
}

impl Default for DatabasePaths {
    fn default() -> Self {
        DatabasePaths::Multiple(vec![])
    }
}

impl DatabasePaths {
    pub fn single(&self) -> Result<&str, ConfigError> {
        match self {
            DatabasePaths::Single(path) if path.trim().is_empty() => {
                Err(ConfigError::MissingDatabase)
            }
            DatabasePaths::Single(path) => Ok(path.as_str()),
            DatabasePaths::Multiple(paths) => match paths.as_slice() {
                [] => Err(ConfigError::MissingDatabase),
                [path] if path.trim().is_empty() => Err(ConfigError::MissingDatabase),
                [path] => Ok(path.as_str()),
                many => Err(ConfigError::MultipleDatabases(many.len())),
            },
        }
    }
}

/// Geolocation classification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeoConfig {
    /// Path to the MaxMind country database
    #[serde(default)]
    pub database: DatabasePaths,

    /// ISO 3166-1 alpha-2 code an answer must geolocate to (default: "CN")
    #[serde(default = "default_country")]
    pub country: String,

    /// Database refresh period (default: "30s"). "0" disables periodic reload.
    #[serde(default = "default_reload")]
    pub reload: String,
}

impl GeoConfig {
    pub fn database_path(&self) -> Result<&str, ConfigError> {
        self.database.single()
    }

    pub fn reload_interval(&self) -> Result<Duration, ConfigError> {
        parse_duration(&self.reload)
    }

    /// Upper-cased target country code.
    pub fn country_code(&self) -> Result<String, ConfigError> {
        let code = self.country.trim();
        if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidCountry(self.country.clone()));
        }
        Ok(code.to_ascii_uppercase())
    }
}

impl Default for GeoConfig {
    fn default() -> Self {
        Self {
            database: DatabasePaths::default(),
            country: default_country(),
            reload: default_reload(),
        }
    }
}

fn default_country() -> String {
    "CN".to_string()
}

fn default_reload() -> String {
    "30s".to_string()
}
