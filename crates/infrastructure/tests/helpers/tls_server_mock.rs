#![allow(dead_code)]
use super::dns_server_mock::{MockDnsServer, MockMode};
use rustls::pki_types::{PrivateKeyDer, PrivatePkcs8KeyDer};
use rustls::{RootCertStore, ServerConfig};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_rustls::TlsAcceptor;

/// Loopback DNS-over-TLS server presenting a self-signed certificate for
/// `server_name`. Each connection answers length-framed queries until the
/// client closes it.
pub struct MockTlsServer {
    addr: SocketAddr,
    roots: RootCertStore,
    queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockTlsServer {
    pub async fn start(
        server_name: &str,
        mode: MockMode,
        answer: Ipv4Addr,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let certified = rcgen::generate_simple_self_signed(vec![server_name.to_string()])?;
        let cert = certified.cert.der().clone();
        let key = PrivateKeyDer::Pkcs8(PrivatePkcs8KeyDer::from(certified.key_pair.serialize_der()));

        let mut roots = RootCertStore::empty();
        roots.add(cert.clone())?;

        let config = ServerConfig::builder_with_provider(Arc::new(
            rustls::crypto::aws_lc_rs::default_provider(),
        ))
        .with_safe_default_protocol_versions()?
        .with_no_client_auth()
        .with_single_cert(vec![cert], key)?;
        let acceptor = TlsAcceptor::from(Arc::new(config));

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let count = Arc::clone(&queries);
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        let Ok((stream, _)) = result else { continue };
                        let acceptor = acceptor.clone();
                        let count = Arc::clone(&count);
                        tokio::spawn(async move {
                            let Ok(mut stream) = acceptor.accept(stream).await else { return };
                            while let Ok(len) = stream.read_u16().await {
                                let mut query = vec![0u8; len as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                count.fetch_add(1, Ordering::SeqCst);
                                let Some(response) = MockDnsServer::respond(&query, mode, answer, false) else {
                                    continue;
                                };
                                let _ = stream.write_u16(response.len() as u16).await;
                                let _ = stream.write_all(&response).await;
                                let _ = stream.flush().await;
                            }
                        });
                    }
                }
            }
        });

        Ok(Self {
            addr,
            roots,
            queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Trust store containing only this server's certificate.
    pub fn roots(&self) -> RootCertStore {
        self.roots.clone()
    }

    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockTlsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
