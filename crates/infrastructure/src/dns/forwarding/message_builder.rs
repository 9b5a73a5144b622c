//! DNS Message Builder
//!
//! Wire encoding for the messages geosplit sends upstream and back to
//! clients, using `hickory-proto`.

use geosplit_domain::DomainError;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};

pub struct MessageBuilder;

impl MessageBuilder {
    /// Give `message` a fresh random id and encode it. Returns the id used on
    /// the wire.
    pub fn encode_with_fresh_id(message: &mut Message) -> Result<(u16, Vec<u8>), DomainError> {
        let id = fastrand::u16(..);
        let mut header = *message.header();
        header.set_id(id);
        message.set_header(header);
        let bytes = Self::serialize_message(message)?;
        Ok((id, bytes))
    }

    /// Serialize a Message to wire format bytes
    pub fn serialize_message(message: &Message) -> Result<Vec<u8>, DomainError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message.emit(&mut encoder).map_err(|e| {
            DomainError::InvalidDnsMessage(format!("Failed to serialize DNS message: {}", e))
        })?;

        Ok(buf)
    }
}
