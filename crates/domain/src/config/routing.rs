use super::ConfigError;
use hickory_proto::rr::RecordType;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Rules deciding when the primary/fallback race is skipped or short-cut
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RoutingConfig {
    /// Top-level suffix that is always resolved by the primary group (default: "cn")
    #[serde(default = "default_domestic_suffix")]
    pub domestic_suffix: String,

    /// Domains (and their sub-domains) that are always resolved by the primary group
    #[serde(default)]
    pub except: Vec<String>,

    /// Query type whose fallback attempt is replaced by an empty authoritative answer
    #[serde(default)]
    pub block: Option<String>,
}

impl RoutingConfig {
    pub fn block_type(&self) -> Result<Option<RecordType>, ConfigError> {
        self.block.as_deref().map(parse_record_type).transpose()
    }

    pub fn except_domains(&self) -> Result<Vec<String>, ConfigError> {
        self.except
            .iter()
            .map(|d| normalize_fqdn(d).ok_or_else(|| ConfigError::InvalidDomain(d.clone())))
            .collect()
    }

    /// The root is rejected since it matches every name.
    pub fn domestic_suffix_fqdn(&self) -> Result<String, ConfigError> {
        normalize_fqdn(&self.domestic_suffix)
            .ok_or_else(|| ConfigError::InvalidDomain(self.domestic_suffix.clone()))
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            domestic_suffix: default_domestic_suffix(),
            except: vec![],
            block: None,
        }
    }
}

fn default_domestic_suffix() -> String {
    "cn".to_string()
}

/// Mnemonic in any case (`aaaa`, `HTTPS`) or the generic `TYPEnnn` form.
fn parse_record_type(name: &str) -> Result<RecordType, ConfigError> {
    let upper = name.trim().to_ascii_uppercase();
    if let Some(code) = upper.strip_prefix("TYPE").and_then(|c| c.parse::<u16>().ok()) {
        return Ok(RecordType::from(code));
    }
    RecordType::from_str(&upper).map_err(|_| ConfigError::InvalidRecordType(name.to_string()))
}

/// Lower-case a domain and give it exactly one trailing dot.
///
/// Returns `None` for the root and for names with empty labels or whitespace.
pub fn normalize_fqdn(domain: &str) -> Option<String> {
    let trimmed = domain.trim();
    let body = trimmed.strip_suffix('.').unwrap_or(trimmed);
    if body.is_empty()
        || body.split('.').any(|label| label.is_empty())
        || body.chars().any(char::is_whitespace)
    {
        return None;
    }
    let mut fqdn = body.to_ascii_lowercase();
    fqdn.push('.');
    Some(fqdn)
}
