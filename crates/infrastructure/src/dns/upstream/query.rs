use crate::dns::forwarding::{DnsResponse, ResponseParser};
use crate::dns::transport::{self, tcp::TcpTransport, DnsTransport};
use geosplit_domain::{DomainError, EndpointProtocol, UpstreamEndpoint};
use rustls::ClientConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Exchange one encoded query with `endpoint`.
///
/// A truncated UDP response is retried over TCP against the same address with
/// whatever remains of the timeout.
pub async fn query_endpoint(
    endpoint: &UpstreamEndpoint,
    tls_config: &Arc<ClientConfig>,
    query_bytes: &[u8],
    query_id: u16,
    timeout: Duration,
) -> Result<DnsResponse, DomainError> {
    let start = Instant::now();

    let dns_transport = transport::create_transport(endpoint, tls_config)?;
    let bytes = dns_transport.send(query_bytes, timeout).await?;
    let mut response = ResponseParser::parse_bytes(&bytes)?;

    if response.truncated && endpoint.protocol == EndpointProtocol::Udp {
        debug!(
            server = %endpoint.addr,
            "Response truncated (TC bit), retrying via TCP"
        );

        let remaining = timeout
            .checked_sub(start.elapsed())
            .unwrap_or(Duration::from_millis(500));

        let bytes = TcpTransport::new(endpoint.addr)
            .send(query_bytes, remaining)
            .await?;
        response = ResponseParser::parse_bytes(&bytes)?;
    }

    if response.id() != query_id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Response id {} from {} does not match query id {}",
            response.id(),
            endpoint,
            query_id
        )));
    }

    debug!(
        server = %endpoint,
        protocol = dns_transport.protocol_name(),
        latency_ms = start.elapsed().as_millis() as u64,
        "Upstream answered"
    );

    Ok(response)
}
