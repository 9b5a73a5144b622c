use async_trait::async_trait;
use geosplit_application::ports::{ResolutionOutcome, UpstreamGroup};
use geosplit_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[derive(Clone)]
enum Behavior {
    Answer(Vec<String>),
    Fail(ResponseCode),
    Panic,
}

/// Upstream group that answers every request the same way and counts calls.
pub struct MockUpstream {
    name: &'static str,
    behavior: Behavior,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockUpstream {
    /// Answers with one record per address. An empty slice gives an empty
    /// NOERROR answer set.
    pub fn answering(name: &'static str, addrs: &[&str]) -> Self {
        Self::with(name, Behavior::Answer(addrs.iter().map(|s| s.to_string()).collect()))
    }

    /// Produces no message, only an rcode and an error.
    pub fn failing(name: &'static str, rcode: ResponseCode) -> Self {
        Self::with(name, Behavior::Fail(rcode))
    }

    pub fn panicking(name: &'static str) -> Self {
        Self::with(name, Behavior::Panic)
    }

    fn with(name: &'static str, behavior: Behavior) -> Self {
        Self {
            name,
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl UpstreamGroup for MockUpstream {
    async fn resolve(&self, request: Message, cancel: CancellationToken) -> ResolutionOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => {
                    return ResolutionOutcome::failed(ResponseCode::ServFail, DomainError::QueryCancelled);
                }
                _ = tokio::time::sleep(self.delay) => {}
            }
        }

        match &self.behavior {
            Behavior::Answer(addrs) => {
                let addrs: Vec<&str> = addrs.iter().map(String::as_str).collect();
                ResolutionOutcome::answered(super::answer(&request, &addrs))
            }
            Behavior::Fail(rcode) => {
                ResolutionOutcome::failed(*rcode, DomainError::TransportAllServersUnreachable)
            }
            Behavior::Panic => panic!("mock upstream {} panicked", self.name),
        }
    }

    fn name(&self) -> &str {
        self.name
    }
}
