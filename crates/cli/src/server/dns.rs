use geosplit_infrastructure::dns::DnsRequestHandler;
use hickory_server::ServerFuture;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, UdpSocket};
use tokio_util::sync::CancellationToken;
use tracing::info;

pub async fn start_dns_server(
    bind_addr: SocketAddr,
    handler: DnsRequestHandler,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    info!(bind_address = %bind_addr, "Starting DNS server");

    let udp_socket = UdpSocket::bind(bind_addr).await?;
    info!(protocol = "UDP", "DNS server listening");

    let tcp_listener = TcpListener::bind(bind_addr).await?;
    info!(protocol = "TCP", "DNS server listening");

    let mut server = ServerFuture::new(handler);
    server.register_socket(udp_socket);
    server.register_listener(tcp_listener, Duration::from_secs(10));

    info!("DNS server ready to accept queries");

    tokio::select! {
        _ = shutdown.cancelled() => {
            server.shutdown_gracefully().await?;
        }
        result = server.block_until_done() => result?,
    }

    info!("DNS server stopped");
    Ok(())
}
