use super::tcp::exchange_framed;
use super::{io_error, timeout_error, DnsTransport};
use async_trait::async_trait;
use bytes::Bytes;
use geosplit_domain::DomainError;
use rustls::pki_types::ServerName;
use rustls::{ClientConfig, RootCertStore};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;
use tracing::debug;

/// Client configuration trusting the bundled web PKI roots.
pub fn client_config() -> Result<Arc<ClientConfig>, DomainError> {
    client_config_with_roots(RootCertStore {
        roots: webpki_roots::TLS_SERVER_ROOTS.to_vec(),
    })
}

pub fn client_config_with_roots(roots: RootCertStore) -> Result<Arc<ClientConfig>, DomainError> {
    let config =
        ClientConfig::builder_with_provider(Arc::new(rustls::crypto::aws_lc_rs::default_provider()))
            .with_safe_default_protocol_versions()
            .map_err(|e| DomainError::TlsError(format!("Failed to build TLS config: {}", e)))?
            .with_root_certificates(roots)
            .with_no_client_auth();
    Ok(Arc::new(config))
}

/// DNS over TLS (RFC 7858): the TCP framing inside a TLS session. One
/// connection per query; resumption tickets live in the shared config.
pub struct TlsTransport {
    server_addr: SocketAddr,
    server_name: ServerName<'static>,
    connector: TlsConnector,
}

impl TlsTransport {
    /// Certificates are verified against `server_name`, or against the IP
    /// address when no name is given.
    pub fn new(
        server_addr: SocketAddr,
        server_name: Option<&str>,
        config: Arc<ClientConfig>,
    ) -> Result<Self, DomainError> {
        let server_name = match server_name {
            Some(name) => ServerName::try_from(name.to_string()).map_err(|e| {
                DomainError::InvalidEndpoint(format!("invalid TLS server name '{}': {}", name, e))
            })?,
            None => ServerName::from(server_addr.ip()),
        };

        Ok(Self {
            server_addr,
            server_name,
            connector: TlsConnector::from(config),
        })
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Bytes, DomainError> {
        let tcp = TcpStream::connect(self.server_addr)
            .await
            .map_err(|e| io_error(self.server_addr, "connect to", e))?;

        let mut stream = self
            .connector
            .connect(self.server_name.clone(), tcp)
            .await
            .map_err(|e| {
                DomainError::TlsError(format!("Handshake with {} failed: {}", self.server_addr, e))
            })?;

        exchange_framed(&mut stream, message_bytes, self.server_addr).await
    }
}

#[async_trait]
impl DnsTransport for TlsTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Bytes, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "TLS response received"
        );

        Ok(bytes)
    }

    fn protocol_name(&self) -> &'static str {
        "TLS"
    }
}
