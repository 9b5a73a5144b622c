pub mod tcp;
pub mod tls;
pub mod udp;

use async_trait::async_trait;
use bytes::Bytes;
use geosplit_domain::{DomainError, EndpointProtocol, UpstreamEndpoint};
use rustls::ClientConfig;
use std::sync::Arc;
use std::time::Duration;

/// Trait for sending raw DNS messages over the wire
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Send one wire-format query and return the raw response bytes.
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Bytes, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

/// Enum-dispatched transport, one variant per supported endpoint protocol.
pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
    Tls(tls::TlsTransport),
}

impl Transport {
    pub async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Bytes, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tls(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(t) => t.protocol_name(),
            Self::Tcp(t) => t.protocol_name(),
            Self::Tls(t) => t.protocol_name(),
        }
    }
}

/// Create the transport for `endpoint`. TLS endpoints share `tls_config`.
pub fn create_transport(
    endpoint: &UpstreamEndpoint,
    tls_config: &Arc<ClientConfig>,
) -> Result<Transport, DomainError> {
    match endpoint.protocol {
        EndpointProtocol::Udp => Ok(Transport::Udp(udp::UdpTransport::new(endpoint.addr))),
        EndpointProtocol::Tcp => Ok(Transport::Tcp(tcp::TcpTransport::new(endpoint.addr))),
        EndpointProtocol::Tls => Ok(Transport::Tls(tls::TlsTransport::new(
            endpoint.addr,
            endpoint.server_name.as_deref(),
            Arc::clone(tls_config),
        )?)),
    }
}

/// Map a socket error onto the transport error kinds.
pub(crate) fn io_error(server: std::net::SocketAddr, action: &str, e: std::io::Error) -> DomainError {
    match e.kind() {
        std::io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused {
            server: server.to_string(),
        },
        _ => DomainError::IoError(format!("Failed to {} {}: {}", action, server, e)),
    }
}

pub(crate) fn timeout_error(server: std::net::SocketAddr) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}
