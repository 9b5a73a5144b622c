//! # geosplit
//!
//! Split-horizon DNS forwarder: races a domestic and a foreign upstream group
//! and keeps the domestic answer only when it geolocates to the target country.

mod bootstrap;
mod server;

use clap::Parser;
use geosplit_application::ports::GeoDatabasePort;
use geosplit_domain::CliOverrides;
use geosplit_jobs::{GeoDatabaseReloadJob, JobRunner};
use mimalloc::MiMalloc;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, info_span};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[command(name = "geosplit")]
#[command(version)]
#[command(about = "Split-horizon DNS forwarder with GeoIP answer selection")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// DNS server port
    #[arg(short = 'd', long)]
    dns_port: Option<u16>,

    /// Bind address
    #[arg(short = 'b', long)]
    bind: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    /// Path to the MaxMind country database
    #[arg(long)]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        dns_port: cli.dns_port,
        bind_address: cli.bind,
        log_level: cli.log_level,
        database: cli.database,
    };

    let config = bootstrap::load_config(cli.config.as_deref(), overrides)?;
    bootstrap::init_logging(&config)?;
    bootstrap::log_config_summary(&config, cli.config.as_deref());

    let shutdown = CancellationToken::new();

    let geo = bootstrap::init_geo_database(&config).await?;
    let handler = bootstrap::build_handler(&config, Arc::clone(&geo), shutdown.clone())?;

    let reload_job = GeoDatabaseReloadJob::new(Arc::clone(&geo) as Arc<dyn GeoDatabasePort>)
        .with_interval(config.geo.reload_interval()?)
        .with_cancellation(shutdown.clone())
        .with_span(info_span!("geo_reload"));
    JobRunner::new().with_geo_reload(reload_job).start().await;

    let listen_addr = config.server.listen_addr()?;
    let mut dns_server = tokio::spawn(server::start_dns_server(
        listen_addr,
        handler,
        shutdown.clone(),
    ));

    let exit: anyhow::Result<()> = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
            signal.map_err(Into::into)
        }
        result = &mut dns_server => match result {
            Ok(served) => served,
            Err(e) => Err(e.into()),
        },
    };

    shutdown.cancel();
    geo.close();

    if let Err(e) = &exit {
        error!(error = %e, "geosplit exiting with error");
    }
    info!("geosplit stopped");

    exit
}
