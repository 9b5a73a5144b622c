use geosplit_domain::Config;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
pub fn init_logging(config: &Config) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_level(true);

    let installed = if config.logging.json {
        builder.json().try_init()
    } else {
        builder.with_ansi(true).try_init()
    };
    installed.map_err(|e| anyhow::anyhow!("Failed to install logging: {}", e))?;

    info!("Logging initialized at level: {}", config.logging.level);
    Ok(())
}
