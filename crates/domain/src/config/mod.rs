//! Configuration module for geosplit
//!
//! This module contains all configuration structures organized by concern:
//! - `root`: Main configuration and CLI overrides
//! - `server`: Listener address and port
//! - `logging`: Logging settings
//! - `geo`: Geolocation database, target country and reload period
//! - `upstream`: Primary and fallback resolver groups
//! - `routing`: Bypass exceptions, domestic suffix and blocked query type
//! - `duration`: Go-style duration strings (`30s`, `1h30m`)
//! - `errors`: Configuration errors

pub mod duration;
pub mod errors;
pub mod geo;
pub mod logging;
pub mod root;
pub mod routing;
pub mod server;
pub mod upstream;

pub use duration::parse_duration;
pub use errors::ConfigError;
pub use geo::{DatabasePaths, GeoConfig};
pub use logging::LoggingConfig;
pub use root::{CliOverrides, Config};
pub use routing::{normalize_fqdn, RoutingConfig};
pub use server::ServerConfig;
pub use upstream::UpstreamConfig;
