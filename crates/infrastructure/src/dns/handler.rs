use crate::dns::forwarding::MessageBuilder;
use async_trait::async_trait;
use geosplit_application::services::replies::server_failure;
use geosplit_application::services::RaceCoordinator;
use hickory_proto::op::{Header, Message, MessageType, ResponseCode};
use hickory_proto::rr::Record;
use hickory_server::authority::MessageResponseBuilder;
use hickory_server::server::{Request, RequestHandler, ResponseHandler, ResponseInfo};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Span};

/// Request handler served by the UDP and TCP listeners.
///
/// Every in-flight query runs under a child of the shutdown token, so
/// cancelling the token aborts pending upstream exchanges.
pub struct DnsRequestHandler {
    coordinator: Arc<RaceCoordinator>,
    shutdown: CancellationToken,
    span: Span,
}

impl DnsRequestHandler {
    pub fn new(coordinator: Arc<RaceCoordinator>, shutdown: CancellationToken, span: Span) -> Self {
        Self {
            coordinator,
            shutdown,
            span,
        }
    }

    /// Decode and resolve one request, returning the reply to send.
    ///
    /// Returns `None` for input that is not a decodable DNS query; such
    /// packets get no reply. When the race commits no message the client gets
    /// SERVFAIL echoing its id and question. Datagram replies larger than the
    /// client's advertised payload size (512 bytes without EDNS) are cut down
    /// to a header with TC set, so the client retries over TCP.
    pub async fn handle(&self, bytes: &[u8], datagram: bool) -> Option<Message> {
        let request = match Message::from_vec(bytes) {
            Ok(message) if message.message_type() == MessageType::Query => message,
            Ok(_) => {
                debug!(parent: &self.span, "Dropping DNS response sent to listener");
                return None;
            }
            Err(e) => {
                debug!(parent: &self.span, error = %e, len = bytes.len(), "Dropping undecodable request");
                return None;
            }
        };

        let limit = request.max_payload();
        let reply = self.answer(request).await;

        if datagram {
            Some(self.fit_datagram(reply, limit))
        } else {
            Some(reply)
        }
    }

    async fn answer(&self, request: Message) -> Message {
        let failure = server_failure(&request);
        let outcome = self
            .coordinator
            .serve(request, self.shutdown.child_token())
            .await;

        match outcome.message {
            Some(message) => message,
            None => {
                debug!(
                    parent: &self.span,
                    rcode = ?outcome.rcode,
                    error = ?outcome.error,
                    "No upstream message, answering SERVFAIL"
                );
                failure
            }
        }
    }

    fn fit_datagram(&self, reply: Message, client_limit: u16) -> Message {
        // The listener encodes against the reply's own EDNS size as well.
        let limit = reply
            .edns()
            .map_or(client_limit, |edns| client_limit.min(edns.max_payload().max(512)));

        match MessageBuilder::serialize_message(&reply) {
            Ok(encoded) if encoded.len() <= limit as usize => reply,
            Ok(encoded) => {
                debug!(
                    parent: &self.span,
                    len = encoded.len(),
                    limit,
                    "Reply exceeds client payload size, truncating"
                );
                reply.truncate()
            }
            Err(e) => {
                warn!(parent: &self.span, error = %e, "Failed to encode reply");
                reply
            }
        }
    }
}

#[async_trait]
impl RequestHandler for DnsRequestHandler {
    async fn handle_request<R: ResponseHandler>(
        &self,
        request: &Request,
        mut response_handle: R,
    ) -> ResponseInfo {
        let datagram = request.protocol().is_datagram();

        let Some(reply) = self.handle(request.as_slice(), datagram).await else {
            let mut header = Header::response_from_request(request.header());
            header.set_response_code(ResponseCode::ServFail);
            return header.into();
        };

        let mut builder = MessageResponseBuilder::from_message_request(request);
        if let Some(edns) = reply.edns() {
            builder.edns(edns.clone());
        }
        let response = builder.build(
            *reply.header(),
            reply.answers(),
            reply.name_servers(),
            std::iter::empty::<&Record>(),
            reply.additionals(),
        );

        match response_handle.send_response(response).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    parent: &self.span,
                    client = %request.src(),
                    error = %e,
                    "Failed to send DNS response"
                );
                (*reply.header()).into()
            }
        }
    }
}
