use super::ConfigError;
use crate::UpstreamEndpoint;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Primary (domestic) and fallback (foreign) resolver groups
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpstreamConfig {
    /// Domestic resolvers, tried in order
    #[serde(default)]
    pub primary: Vec<String>,

    /// Foreign resolvers, tried in order
    #[serde(default)]
    pub fallback: Vec<String>,

    /// Per-endpoint timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl UpstreamConfig {
    pub fn primary_endpoints(&self) -> Result<Vec<UpstreamEndpoint>, ConfigError> {
        parse_group("primary", &self.primary)
    }

    pub fn fallback_endpoints(&self) -> Result<Vec<UpstreamEndpoint>, ConfigError> {
        parse_group("fallback", &self.fallback)
    }

    pub fn timeout(&self) -> Result<Duration, ConfigError> {
        match self.timeout_ms {
            0 => Err(ConfigError::InvalidTimeout(self.timeout_ms)),
            ms => Ok(Duration::from_millis(ms)),
        }
    }
}

fn parse_group(
    group: &'static str,
    servers: &[String],
) -> Result<Vec<UpstreamEndpoint>, ConfigError> {
    if servers.is_empty() {
        return Err(ConfigError::EmptyUpstream(group));
    }
    servers
        .iter()
        .map(|s| {
            s.parse::<UpstreamEndpoint>()
                .map_err(|e| ConfigError::InvalidUpstream {
                    group,
                    reason: e.to_string(),
                })
        })
        .collect()
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            primary: vec![],
            fallback: vec![],
            timeout_ms: default_timeout_ms(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    2000
}
