#![allow(dead_code)]
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{RData, Record};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMode {
    /// Answer with the configured A record.
    Answer,
    /// Answer over UDP with the TC bit and no records; TCP answers normally.
    TruncateUdp,
    /// Answer with SERVFAIL and no records.
    ServFail,
    /// Read queries and never reply.
    Silent,
    /// Reply with a different transaction id.
    WrongId,
    /// Answer with this many distinct A records.
    Bulk(u8),
}

/// Mock DNS server listening on UDP and TCP on the same loopback port.
pub struct MockDnsServer {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    pub async fn start(mode: MockMode, answer: Ipv4Addr) -> Result<Self, std::io::Error> {
        let udp = UdpSocket::bind("127.0.0.1:0").await?;
        let addr = udp.local_addr()?;
        let tcp = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let udp_count = Arc::clone(&udp_queries);
        let tcp_count = Arc::clone(&tcp_queries);
        tokio::spawn(async move {
            let mut buf = vec![0u8; 4096];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = udp.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            udp_count.fetch_add(1, Ordering::SeqCst);
                            if let Some(response) = Self::respond(&buf[..len], mode, answer, true) {
                                let _ = udp.send_to(&response, peer).await;
                            }
                        }
                    }
                    result = tcp.accept() => {
                        if let Ok((mut stream, _)) = result {
                            tcp_count.fetch_add(1, Ordering::SeqCst);
                            tokio::spawn(async move {
                                let Ok(len) = stream.read_u16().await else { return };
                                let mut query = vec![0u8; len as usize];
                                if stream.read_exact(&mut query).await.is_err() {
                                    return;
                                }
                                if let Some(response) = Self::respond(&query, mode, answer, false) {
                                    let _ = stream.write_u16(response.len() as u16).await;
                                    let _ = stream.write_all(&response).await;
                                }
                            });
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }

    pub(crate) fn respond(query: &[u8], mode: MockMode, answer: Ipv4Addr, udp: bool) -> Option<Vec<u8>> {
        let request = Message::from_vec(query).ok()?;
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply.add_queries(request.queries().iter().cloned());

        match mode {
            MockMode::Silent => return None,
            MockMode::ServFail => {
                reply.set_response_code(ResponseCode::ServFail);
            }
            MockMode::TruncateUdp if udp => {
                reply.set_truncated(true);
            }
            MockMode::WrongId => {
                let mut header = *reply.header();
                header.set_id(request.id().wrapping_add(1));
                reply.set_header(header);
            }
            _ => {}
        }
        if let Some(edns) = request.edns() {
            reply.set_edns(edns.clone());
        }

        let name = request.queries().first()?.name().clone();
        match mode {
            MockMode::ServFail => {}
            MockMode::TruncateUdp if udp => {}
            MockMode::Bulk(count) => {
                for i in 0..count {
                    let ip = Ipv4Addr::new(10, 0, 0, i);
                    reply.add_answer(Record::from_rdata(name.clone(), 60, RData::A(A(ip))));
                }
            }
            _ => {
                reply.add_answer(Record::from_rdata(name, 60, RData::A(A(answer))));
            }
        }

        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);
        reply.emit(&mut encoder).ok()?;
        Some(buf)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
