use geosplit_application::ports::{GeoDatabasePort, ReloadOutcome};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, Span};

/// Periodically re-checks the geolocation database file and swaps in a new
/// snapshot when it changed. A failed reload is logged and the current
/// snapshot keeps serving.
pub struct GeoDatabaseReloadJob {
    database: Arc<dyn GeoDatabasePort>,
    interval: Duration,
    shutdown: CancellationToken,
    span: Span,
}

impl GeoDatabaseReloadJob {
    pub fn new(database: Arc<dyn GeoDatabasePort>) -> Self {
        Self {
            database,
            interval: Duration::from_secs(30),
            shutdown: CancellationToken::new(),
            span: Span::none(),
        }
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.shutdown = token;
        self
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    /// A zero interval disables periodic reloads.
    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    /// Spawn the reload loop. Returns `None` without spawning when disabled.
    pub async fn start(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.is_enabled() {
            info!(parent: &self.span, "Geo database reload disabled");
            return None;
        }

        info!(
            parent: &self.span,
            interval_ms = self.interval.as_millis() as u64,
            "Starting geo database reload job"
        );

        Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(self.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            interval.tick().await;

            loop {
                tokio::select! {
                    _ = self.shutdown.cancelled() => {
                        info!(parent: &self.span, "GeoDatabaseReloadJob: shutting down");
                        break;
                    }
                    _ = interval.tick() => {
                        match self.database.reload().await {
                            Ok(ReloadOutcome::Unchanged) => {
                                debug!(parent: &self.span, "GeoDatabaseReloadJob: database unchanged")
                            }
                            Ok(ReloadOutcome::Reloaded) => {
                                info!(parent: &self.span, "GeoDatabaseReloadJob: database reloaded")
                            }
                            Err(e) => {
                                error!(parent: &self.span, error = %e, "GeoDatabaseReloadJob: reload failed")
                            }
                        }
                    }
                }
            }
        }))
    }
}
