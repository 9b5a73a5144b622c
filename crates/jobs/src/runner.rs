use crate::GeoDatabaseReloadJob;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// Central orchestrator for all background jobs.
///
/// Use the builder pattern to register jobs, then call `.start()` once.
///
/// # Example
///
/// ```rust,ignore
/// JobRunner::new()
///     .with_geo_reload(GeoDatabaseReloadJob::new(database).with_interval(period))
///     .start()
///     .await;
/// ```
pub struct JobRunner {
    geo_reload: Option<GeoDatabaseReloadJob>,
}

impl JobRunner {
    pub fn new() -> Self {
        Self { geo_reload: None }
    }

    pub fn with_geo_reload(mut self, job: GeoDatabaseReloadJob) -> Self {
        self.geo_reload = Some(job);
        self
    }

    /// Start all registered background jobs and return the handles of the
    /// ones that were actually spawned.
    pub async fn start(self) -> Vec<JoinHandle<()>> {
        info!("Starting background job runner");
        let mut handles = Vec::new();

        if let Some(job) = self.geo_reload {
            handles.extend(Arc::new(job).start().await);
        }

        info!(jobs = handles.len(), "All background jobs started");
        handles
    }
}

impl Default for JobRunner {
    fn default() -> Self {
        Self::new()
    }
}
