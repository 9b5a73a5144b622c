#![allow(dead_code)]

use async_trait::async_trait;
use geosplit_application::ports::{GeoDatabasePort, GeoSnapshot, ReloadOutcome};
use geosplit_domain::DomainError;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

// ============================================================================
// Mock GeoDatabasePort
// ============================================================================

pub struct MockGeoDatabase {
    reloads: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    should_fail: AtomicBool,
}

impl MockGeoDatabase {
    pub fn new() -> Self {
        Self {
            reloads: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
            should_fail: AtomicBool::new(false),
        }
    }

    pub fn failing() -> Self {
        let db = Self::new();
        db.should_fail.store(true, Ordering::SeqCst);
        db
    }

    pub fn reloads(&self) -> usize {
        self.reloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeoDatabasePort for MockGeoDatabase {
    fn snapshot(&self) -> Option<Arc<GeoSnapshot>> {
        None
    }

    async fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        if self.should_fail.load(Ordering::SeqCst) {
            return Err(DomainError::GeoDatabaseError("mock failure".to_string()));
        }
        Ok(ReloadOutcome::Unchanged)
    }

    fn close(&self) {
        self.closes.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Event recorder: captures the name of each event's parent span
// ============================================================================

use std::sync::Mutex;
use tracing::{Event, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

#[derive(Clone, Default)]
pub struct ParentSpanRecorder {
    parents: Arc<Mutex<Vec<Option<String>>>>,
}

impl ParentSpanRecorder {
    pub fn parents(&self) -> Vec<Option<String>> {
        self.parents.lock().unwrap().clone()
    }
}

impl<S> Layer<S> for ParentSpanRecorder
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let parent = ctx.event_span(event).map(|span| span.name().to_string());
        self.parents.lock().unwrap().push(parent);
    }
}
