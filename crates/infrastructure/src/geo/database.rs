use super::maxmind::MaxMindParser;
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use geosplit_application::ports::{CountryLookup, GeoDatabasePort, GeoSnapshot, ReloadOutcome};
use geosplit_domain::DomainError;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;
use tracing::{debug, info, Span};

/// Turns the raw bytes of a database file into a queryable dataset.
pub trait DatasetParser: Send + Sync {
    fn parse(&self, bytes: Vec<u8>) -> Result<Box<dyn CountryLookup>, DomainError>;
}

/// Hot-reloadable geolocation database.
///
/// The current snapshot lives in an `ArcSwapOption`: readers take a lease
/// without locking and keep it for a whole classification, while a reload
/// builds the next snapshot off to the side and swaps it in atomically. The
/// old snapshot is freed when its last lease is dropped.
///
/// Writers (`load`, `close`) are serialized by `writer`.
pub struct GeoDatabase {
    path: PathBuf,
    parser: Box<dyn DatasetParser>,
    current: ArcSwapOption<GeoSnapshot>,
    writer: Mutex<()>,
    closed: AtomicBool,
    span: Span,
}

impl GeoDatabase {
    /// Database reading MaxMind DB files. Nothing is loaded yet.
    pub fn new(path: impl Into<PathBuf>, span: Span) -> Self {
        Self::with_parser(path, Box::new(MaxMindParser), span)
    }

    pub fn with_parser(
        path: impl Into<PathBuf>,
        parser: Box<dyn DatasetParser>,
        span: Span,
    ) -> Self {
        Self {
            path: path.into(),
            parser,
            current: ArcSwapOption::empty(),
            writer: Mutex::new(()),
            closed: AtomicBool::new(false),
            span,
        }
    }

    /// Create the database and perform the initial load. Failure here is a
    /// setup error.
    pub async fn open(path: impl Into<PathBuf>, span: Span) -> Result<Arc<Self>, DomainError> {
        let db = Arc::new(Self::new(path, span));
        db.load(&db.path).await?;
        Ok(db)
    }

    /// Load `path` unless its size and mtime match the installed snapshot.
    ///
    /// On any error the installed snapshot is left untouched.
    pub async fn load(&self, path: &Path) -> Result<ReloadOutcome, DomainError> {
        let _guard = self.writer.lock().await;

        if self.closed.load(Ordering::Acquire) {
            return Err(DomainError::GeoDatabaseClosed);
        }

        let (modified, size) = file_stamp(path).await?;

        if let Some(current) = self.current.load_full() {
            if current.matches(modified, size) {
                debug!(parent: &self.span, path = %path.display(), "Geo database unchanged");
                return Ok(ReloadOutcome::Unchanged);
            }
        }

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            DomainError::GeoDatabaseError(format!("Failed to read {}: {}", path.display(), e))
        })?;

        let dataset = self.parser.parse(bytes)?;
        self.current
            .store(Some(Arc::new(GeoSnapshot::new(dataset, modified, size))));

        info!(
            parent: &self.span,
            path = %path.display(),
            size,
            "Geo database loaded"
        );

        Ok(ReloadOutcome::Reloaded)
    }
}

#[async_trait]
impl GeoDatabasePort for GeoDatabase {
    fn snapshot(&self) -> Option<Arc<GeoSnapshot>> {
        self.current.load_full()
    }

    async fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        self.load(&self.path).await
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            self.current.store(None);
            info!(parent: &self.span, "Geo database closed");
        }
    }
}

async fn file_stamp(path: &Path) -> Result<(SystemTime, u64), DomainError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        DomainError::GeoDatabaseError(format!("Failed to stat {}: {}", path.display(), e))
    })?;
    let modified = metadata.modified().map_err(|e| {
        DomainError::GeoDatabaseError(format!("No modification time for {}: {}", path.display(), e))
    })?;
    Ok((modified, metadata.len()))
}
