use async_trait::async_trait;
use geosplit_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use tokio_util::sync::CancellationToken;

/// Result of one resolution attempt against an upstream group.
///
/// `message` is absent when no upstream produced a decodable reply. `rcode`
/// and `error` are always meaningful and are what the caller sees when no
/// message is committed.
#[derive(Debug, Clone)]
pub struct ResolutionOutcome {
    pub message: Option<Message>,
    pub rcode: ResponseCode,
    pub error: Option<DomainError>,
}

impl ResolutionOutcome {
    pub fn answered(message: Message) -> Self {
        let rcode = message.response_code();
        Self {
            message: Some(message),
            rcode,
            error: None,
        }
    }

    pub fn failed(rcode: ResponseCode, error: DomainError) -> Self {
        Self {
            message: None,
            rcode,
            error: Some(error),
        }
    }

    /// True when a message is present and carries at least one answer record.
    pub fn has_answers(&self) -> bool {
        self.message
            .as_ref()
            .is_some_and(|m| !m.answers().is_empty())
    }
}

/// An ordered set of resolver endpoints.
///
/// The request is taken by value: two concurrent attempts for the same query
/// each own their copy of the message.
#[async_trait]
pub trait UpstreamGroup: Send + Sync {
    async fn resolve(&self, request: Message, cancel: CancellationToken) -> ResolutionOutcome;

    /// Short label used in logs.
    fn name(&self) -> &str;
}
