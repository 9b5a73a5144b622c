pub mod config;
pub mod logging;
pub mod resolver;

pub use config::{load_config, log_config_summary};
pub use logging::init_logging;
pub use resolver::{build_handler, init_geo_database};
