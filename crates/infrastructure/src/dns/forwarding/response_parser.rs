use bytes::Bytes;
use geosplit_domain::DomainError;
use hickory_proto::op::{Message, MessageType};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct DnsResponse {
    pub truncated: bool,

    pub message: Message,
}

impl DnsResponse {
    pub fn id(&self) -> u16 {
        self.message.id()
    }
}

pub struct ResponseParser;

impl ResponseParser {
    pub fn parse_bytes(response_bytes: &Bytes) -> Result<DnsResponse, DomainError> {
        let message = Message::from_vec(response_bytes).map_err(|e| {
            DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
        })?;

        if message.message_type() != MessageType::Response {
            return Err(DomainError::InvalidDnsResponse(
                "Upstream sent a query instead of a response".to_string(),
            ));
        }

        let truncated = message.truncated();

        debug!(
            rcode = ?message.response_code(),
            answers = message.answers().len(),
            truncated,
            "DNS response parsed"
        );

        Ok(DnsResponse { truncated, message })
    }
}
