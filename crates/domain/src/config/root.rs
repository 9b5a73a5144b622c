use super::{ConfigError, GeoConfig, LoggingConfig, RoutingConfig, ServerConfig, UpstreamConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "geosplit.toml";

/// Values given on the command line take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub log_level: Option<String>,
    pub database: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub geo: GeoConfig,

    #[serde(default)]
    pub upstream: UpstreamConfig,

    #[serde(default)]
    pub routing: RoutingConfig,
}

impl Config {
    /// Load configuration from `config_path`, or from `./geosplit.toml` when it
    /// exists, falling back to built-in defaults. CLI overrides are applied last.
    pub fn load(config_path: Option<&str>, overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            None => Self::default(),
        };
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.server.dns_port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(database) = overrides.database {
            self.geo.database = super::DatabasePaths::Single(database);
        }
    }

    /// Check every setup-time constraint. The server must not start on error.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.listen_addr()?;
        self.logging.validate()?;
        self.geo.database_path()?;
        self.geo.reload_interval()?;
        self.geo.country_code()?;
        self.upstream.primary_endpoints()?;
        self.upstream.fallback_endpoints()?;
        self.upstream.timeout()?;
        self.routing.domestic_suffix_fqdn()?;
        self.routing.except_domains()?;
        self.routing.block_type()?;
        Ok(())
    }
}
