use super::{io_error, timeout_error, DnsTransport};
use async_trait::async_trait;
use bytes::{BufMut, Bytes, BytesMut};
use geosplit_domain::DomainError;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::debug;

/// DNS over TCP (RFC 1035 §4.2.2): every message carries a two-byte length
/// prefix. One connection per query.
pub struct TcpTransport {
    server_addr: SocketAddr,
}

impl TcpTransport {
    pub fn new(server_addr: SocketAddr) -> Self {
        Self { server_addr }
    }

    async fn exchange(&self, message_bytes: &[u8]) -> Result<Bytes, DomainError> {
        let mut stream = TcpStream::connect(self.server_addr)
            .await
            .map_err(|e| io_error(self.server_addr, "connect to", e))?;

        exchange_framed(&mut stream, message_bytes, self.server_addr).await
    }
}

/// Write one length-prefixed query to `stream` and read one length-prefixed
/// response back. Shared by the TCP and TLS transports.
pub(crate) async fn exchange_framed<S>(
    stream: &mut S,
    message_bytes: &[u8],
    server: SocketAddr,
) -> Result<Bytes, DomainError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let len = u16::try_from(message_bytes.len()).map_err(|_| {
        DomainError::InvalidDnsMessage(format!(
            "Message of {} bytes exceeds TCP frame limit",
            message_bytes.len()
        ))
    })?;

    let mut frame = BytesMut::with_capacity(message_bytes.len() + 2);
    frame.put_u16(len);
    frame.put_slice(message_bytes);

    stream
        .write_all(&frame)
        .await
        .map_err(|e| io_error(server, "send query to", e))?;
    stream
        .flush()
        .await
        .map_err(|e| io_error(server, "send query to", e))?;

    let response_len = stream
        .read_u16()
        .await
        .map_err(|e| io_error(server, "read response length from", e))? as usize;

    let mut response = vec![0u8; response_len];
    stream
        .read_exact(&mut response)
        .await
        .map_err(|e| io_error(server, "read response from", e))?;

    Ok(Bytes::from(response))
}

#[async_trait]
impl DnsTransport for TcpTransport {
    async fn send(&self, message_bytes: &[u8], timeout: Duration) -> Result<Bytes, DomainError> {
        let bytes = tokio::time::timeout(timeout, self.exchange(message_bytes))
            .await
            .map_err(|_| timeout_error(self.server_addr))??;

        debug!(
            server = %self.server_addr,
            bytes_received = bytes.len(),
            "TCP response received"
        );

        Ok(bytes)
    }

    fn protocol_name(&self) -> &'static str {
        "TCP"
    }
}
