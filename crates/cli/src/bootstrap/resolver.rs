use geosplit_application::ports::{GeoDatabasePort, UpstreamGroup};
use geosplit_application::services::{AnswerClassifier, BypassRouter, RaceCoordinator};
use geosplit_domain::Config;
use geosplit_infrastructure::dns::transport::tls;
use geosplit_infrastructure::dns::{DnsRequestHandler, ForwardingGroup};
use geosplit_infrastructure::geo::GeoDatabase;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, info_span};

/// Open the geolocation database. The initial load must succeed.
pub async fn init_geo_database(config: &Config) -> anyhow::Result<Arc<GeoDatabase>> {
    let path = config.geo.database_path()?;
    let db = GeoDatabase::open(path, info_span!("geo")).await?;
    info!(path, "Geo database ready");
    Ok(db)
}

/// Wire the decision engine and upstream groups into a request handler.
pub fn build_handler(
    config: &Config,
    geo: Arc<GeoDatabase>,
    shutdown: CancellationToken,
) -> anyhow::Result<DnsRequestHandler> {
    let timeout = config.upstream.timeout()?;
    let tls_config = tls::client_config()?;

    let primary: Arc<dyn UpstreamGroup> = Arc::new(ForwardingGroup::new(
        "primary",
        config.upstream.primary_endpoints()?,
        timeout,
        Arc::clone(&tls_config),
        info_span!("upstream", group = "primary"),
    ));
    let fallback: Arc<dyn UpstreamGroup> = Arc::new(ForwardingGroup::new(
        "fallback",
        config.upstream.fallback_endpoints()?,
        timeout,
        tls_config,
        info_span!("upstream", group = "fallback"),
    ));

    let router = BypassRouter::new(
        &config.routing.domestic_suffix_fqdn()?,
        &config.routing.except_domains()?,
        config.routing.block_type()?,
        info_span!("bypass"),
    );
    info!(
        domestic_suffix = %config.routing.domestic_suffix,
        exceptions = router.exception_count(),
        block = ?router.block_type(),
        "Bypass router ready"
    );

    let classifier = AnswerClassifier::new(config.geo.country_code()?, info_span!("classifier"));

    let coordinator = RaceCoordinator::new(
        primary,
        fallback,
        Arc::new(router),
        Arc::new(classifier),
        geo as Arc<dyn GeoDatabasePort>,
        info_span!("race"),
    );

    Ok(DnsRequestHandler::new(
        Arc::new(coordinator),
        shutdown,
        info_span!("handler"),
    ))
}
