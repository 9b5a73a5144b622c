use super::query::query_endpoint;
use crate::dns::forwarding::MessageBuilder;
use async_trait::async_trait;
use compact_str::CompactString;
use geosplit_application::ports::{ResolutionOutcome, UpstreamGroup};
use geosplit_domain::{DomainError, UpstreamEndpoint};
use hickory_proto::op::{Message, ResponseCode};
use rustls::ClientConfig;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Span};

/// Plain DNS forwarding over an ordered list of endpoints.
///
/// Endpoints are tried in configuration order; the first one that returns a
/// decodable response ends the attempt. Each endpoint gets the full timeout.
pub struct ForwardingGroup {
    name: CompactString,
    endpoints: Vec<UpstreamEndpoint>,
    timeout: Duration,
    tls_config: Arc<ClientConfig>,
    span: Span,
}

impl ForwardingGroup {
    pub fn new(
        name: &str,
        endpoints: Vec<UpstreamEndpoint>,
        timeout: Duration,
        tls_config: Arc<ClientConfig>,
        span: Span,
    ) -> Self {
        Self {
            name: CompactString::new(name),
            endpoints,
            timeout,
            tls_config,
            span,
        }
    }
}

#[async_trait]
impl UpstreamGroup for ForwardingGroup {
    async fn resolve(&self, request: Message, cancel: CancellationToken) -> ResolutionOutcome {
        let mut request = request;
        let original_id = request.id();
        let mut last_error = DomainError::TransportAllServersUnreachable;

        for endpoint in &self.endpoints {
            let (query_id, bytes) = match MessageBuilder::encode_with_fresh_id(&mut request) {
                Ok(encoded) => encoded,
                Err(e) => return ResolutionOutcome::failed(ResponseCode::FormErr, e),
            };

            let result = tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(parent: &self.span, group = %self.name, "Resolution cancelled");
                    return ResolutionOutcome::failed(ResponseCode::ServFail, DomainError::QueryCancelled);
                }
                result = query_endpoint(endpoint, &self.tls_config, &bytes, query_id, self.timeout) => result,
            };

            match result {
                Ok(response) => {
                    let mut message = response.message;
                    let mut header = *message.header();
                    header.set_id(original_id);
                    message.set_header(header);
                    return ResolutionOutcome::answered(message);
                }
                Err(e) => {
                    warn!(
                        parent: &self.span,
                        group = %self.name,
                        server = %endpoint,
                        error = %e,
                        "Upstream failed, trying next"
                    );
                    last_error = e;
                }
            }
        }

        ResolutionOutcome::failed(ResponseCode::ServFail, last_error)
    }

    fn name(&self) -> &str {
        &self.name
    }
}
