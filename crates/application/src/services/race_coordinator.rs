use geosplit_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn, Span};

use super::replies::empty_authoritative;
use super::{AnswerClassifier, BypassRouter};
use crate::ports::{GeoDatabasePort, ResolutionOutcome, UpstreamGroup};

/// Races the primary and fallback upstream groups for every query and
/// commits exactly one outcome.
///
/// Selection policy:
///   1. Bypassed names go to the primary group alone.
///   2. Otherwise both attempts start concurrently (the fallback is replaced by
///      a synthesized empty authoritative reply for the blocked query type).
///   3. The primary outcome is awaited first. It is committed when it carries
///      answers that classify as domestic.
///   4. Otherwise the fallback outcome is committed, message or not.
///
/// The attempt that is not committed keeps running detached; its handle is
/// dropped.
pub struct RaceCoordinator {
    primary: Arc<dyn UpstreamGroup>,
    fallback: Arc<dyn UpstreamGroup>,
    router: Arc<BypassRouter>,
    classifier: Arc<AnswerClassifier>,
    geo: Arc<dyn GeoDatabasePort>,
    span: Span,
}

/// The fallback side of a race: a running task or an outcome produced
/// without touching the network.
enum FallbackAttempt {
    Running(JoinHandle<ResolutionOutcome>),
    Synthesized(ResolutionOutcome),
}

impl RaceCoordinator {
    pub fn new(
        primary: Arc<dyn UpstreamGroup>,
        fallback: Arc<dyn UpstreamGroup>,
        router: Arc<BypassRouter>,
        classifier: Arc<AnswerClassifier>,
        geo: Arc<dyn GeoDatabasePort>,
        span: Span,
    ) -> Self {
        Self {
            primary,
            fallback,
            router,
            classifier,
            geo,
            span,
        }
    }

    pub async fn serve(&self, request: Message, cancel: CancellationToken) -> ResolutionOutcome {
        let question = request.queries().first().cloned();

        if let Some(q) = &question {
            if self.router.should_bypass(&q.name().to_ascii()) {
                return self.primary.resolve(request, cancel).await;
            }
        }

        let blocked = question
            .as_ref()
            .is_some_and(|q| self.router.is_blocked_type(q.query_type(), q.query_class()));

        let fallback = if blocked {
            debug!(parent: &self.span, "Blocked query type, synthesizing fallback reply");
            FallbackAttempt::Synthesized(ResolutionOutcome::answered(empty_authoritative(
                &request,
            )))
        } else {
            let group = Arc::clone(&self.fallback);
            let copy = request.clone();
            let token = cancel.clone();
            FallbackAttempt::Running(tokio::spawn(
                async move { group.resolve(copy, token).await },
            ))
        };

        let group = Arc::clone(&self.primary);
        let primary = tokio::spawn(async move { group.resolve(request, cancel).await });

        let primary_outcome = self.join(primary, self.primary.name()).await;

        if self.is_domestic(&primary_outcome) {
            debug!(parent: &self.span, group = self.primary.name(), "Committing primary answer");
            return primary_outcome;
        }

        let outcome = match fallback {
            FallbackAttempt::Running(handle) => self.join(handle, self.fallback.name()).await,
            FallbackAttempt::Synthesized(outcome) => outcome,
        };
        debug!(
            parent: &self.span,
            group = self.fallback.name(),
            has_message = outcome.message.is_some(),
            rcode = ?outcome.rcode,
            "Committing fallback outcome"
        );
        outcome
    }

    fn is_domestic(&self, outcome: &ResolutionOutcome) -> bool {
        let Some(message) = outcome.message.as_ref().filter(|_| outcome.has_answers()) else {
            return false;
        };
        match self.geo.snapshot() {
            Some(snapshot) => self.classifier.is_domestic(message.answers(), &*snapshot),
            None => {
                debug!(parent: &self.span, "Geo database closed, treating answer as foreign");
                false
            }
        }
    }

    async fn join(&self, handle: JoinHandle<ResolutionOutcome>, group: &str) -> ResolutionOutcome {
        handle
            .await
            .unwrap_or_else(|e| self.task_failed(e, group))
    }

    fn task_failed(&self, error: JoinError, group: &str) -> ResolutionOutcome {
        warn!(parent: &self.span, group, error = %error, "Resolution task failed");
        ResolutionOutcome::failed(
            ResponseCode::ServFail,
            DomainError::ResolutionTaskFailed(error.to_string()),
        )
    }
}
