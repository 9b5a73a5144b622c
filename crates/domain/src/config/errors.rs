use thiserror::Error;

/// Setup-time configuration errors. Any of these stops the server from starting.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(String),

    #[error("No geo database configured (geo.database)")]
    MissingDatabase,

    #[error("Configuring multiple databases is not supported ({0} given)")]
    MultipleDatabases(usize),

    #[error("Invalid duration '{0}'")]
    InvalidDuration(String),

    #[error("Reload interval must not be negative: '{0}'")]
    NegativeReload(String),

    #[error("Invalid country code '{0}': expected a two-letter ISO code")]
    InvalidCountry(String),

    #[error("Invalid record type in routing.block: {0}")]
    InvalidRecordType(String),

    #[error("Invalid domain '{0}'")]
    InvalidDomain(String),

    #[error("Invalid upstream in {group}: {reason}")]
    InvalidUpstream { group: &'static str, reason: String },

    #[error("Upstream timeout must be greater than zero (got {0} ms)")]
    InvalidTimeout(u64),

    #[error("At least one {0} upstream must be configured")]
    EmptyUpstream(&'static str),

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),

    #[error("Invalid log level '{0}'")]
    InvalidLogLevel(String),
}
