use async_trait::async_trait;
use compact_str::CompactString;
use geosplit_domain::DomainError;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::SystemTime;

/// A queryable country dataset.
///
/// `Ok(None)` means the address is known but carries no country. An address
/// missing from the dataset is an error.
pub trait CountryLookup: Send + Sync {
    fn country_code(&self, ip: IpAddr) -> Result<Option<CompactString>, DomainError>;
}

/// One immutable generation of the geolocation dataset together with the
/// file metadata it was built from.
pub struct GeoSnapshot {
    dataset: Box<dyn CountryLookup>,
    modified: SystemTime,
    size: u64,
}

impl GeoSnapshot {
    pub fn new(dataset: Box<dyn CountryLookup>, modified: SystemTime, size: u64) -> Self {
        Self {
            dataset,
            modified,
            size,
        }
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    /// True when the snapshot was built from a file with exactly this metadata.
    pub fn matches(&self, modified: SystemTime, size: u64) -> bool {
        self.modified == modified && self.size == size
    }
}

impl CountryLookup for GeoSnapshot {
    fn country_code(&self, ip: IpAddr) -> Result<Option<CompactString>, DomainError> {
        self.dataset.country_code(ip)
    }
}

impl std::fmt::Debug for GeoSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoSnapshot")
            .field("modified", &self.modified)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Size and modification time matched the installed snapshot.
    Unchanged,
    /// A new snapshot was parsed and installed.
    Reloaded,
}

/// Application-layer port for the hot-reloadable geolocation database.
///
/// `snapshot` is the hot path and never blocks: readers get a lease that stays
/// valid for the whole classification even if a reload swaps the current
/// snapshot underneath them. Reloads are serialized by the implementation.
#[async_trait]
pub trait GeoDatabasePort: Send + Sync {
    /// Current snapshot, or `None` once closed.
    fn snapshot(&self) -> Option<Arc<GeoSnapshot>>;

    /// Re-read the configured database file if its size or mtime changed.
    /// On error the current snapshot keeps serving.
    async fn reload(&self) -> Result<ReloadOutcome, DomainError>;

    /// Release the current snapshot. Idempotent.
    fn close(&self);
}
