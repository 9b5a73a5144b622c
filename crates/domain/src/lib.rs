//! geosplit domain layer
pub mod config;
pub mod errors;
pub mod upstream_endpoint;

pub use config::{CliOverrides, Config, ConfigError};
pub use errors::DomainError;
pub use upstream_endpoint::{EndpointProtocol, UpstreamEndpoint};
