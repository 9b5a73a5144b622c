use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid IP address: {0}")]
    InvalidIpAddress(String),

    #[error("Invalid DNS message: {0}")]
    InvalidDnsMessage(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Invalid upstream endpoint: {0}")]
    InvalidEndpoint(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Timeout waiting for {server}")]
    TransportTimeout { server: String },

    #[error("Connection refused by {server}")]
    TransportConnectionRefused { server: String },

    #[error("TLS error: {0}")]
    TlsError(String),

    #[error("All upstream servers unreachable")]
    TransportAllServersUnreachable,

    #[error("Query cancelled")]
    QueryCancelled,

    #[error("Resolution task failed: {0}")]
    ResolutionTaskFailed(String),

    #[error("Geo database error: {0}")]
    GeoDatabaseError(String),

    #[error("Geo database is closed")]
    GeoDatabaseClosed,

    #[error("Address {0} not found in geo database")]
    GeoAddressNotFound(String),
}
