use geosplit_domain::{CliOverrides, Config};
use tracing::info;

/// Load and validate the configuration. Any error here aborts startup.
pub fn load_config(config_path: Option<&str>, cli_overrides: CliOverrides) -> anyhow::Result<Config> {
    let config = Config::load(config_path, cli_overrides)?;
    config.validate()?;
    Ok(config)
}

/// Called once logging is up, so the summary is not lost.
pub fn log_config_summary(config: &Config, config_path: Option<&str>) {
    info!(
        config_file = config_path.unwrap_or("default"),
        dns_port = config.server.dns_port,
        bind = %config.server.bind_address,
        country = %config.geo.country,
        reload = %config.geo.reload,
        primary = config.upstream.primary.len(),
        fallback = config.upstream.fallback.len(),
        exceptions = config.routing.except.len(),
        block = config.routing.block.as_deref().unwrap_or("none"),
        "Configuration loaded"
    );
}
