use async_trait::async_trait;
use compact_str::CompactString;
use geosplit_application::ports::{
    CountryLookup, GeoDatabasePort, GeoSnapshot, ReloadOutcome,
};
use geosplit_domain::DomainError;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::SystemTime;

/// In-memory country table. Addresses not listed are "not found".
#[derive(Default, Clone)]
pub struct MockCountryLookup {
    entries: HashMap<IpAddr, Option<CompactString>>,
    broken: Vec<IpAddr>,
}

impl MockCountryLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, ip: &str, country: &str) -> Self {
        self.entries
            .insert(ip.parse().unwrap(), Some(CompactString::new(country)));
        self
    }

    /// Address present in the dataset without a country.
    pub fn without_country(mut self, ip: &str) -> Self {
        self.entries.insert(ip.parse().unwrap(), None);
        self
    }

    /// Lookups of this address fail with a database error.
    pub fn broken(mut self, ip: &str) -> Self {
        self.broken.push(ip.parse().unwrap());
        self
    }
}

impl CountryLookup for MockCountryLookup {
    fn country_code(&self, ip: IpAddr) -> Result<Option<CompactString>, DomainError> {
        if self.broken.contains(&ip) {
            return Err(DomainError::GeoDatabaseError(format!("corrupt entry for {}", ip)));
        }
        self.entries
            .get(&ip)
            .cloned()
            .ok_or_else(|| DomainError::GeoAddressNotFound(ip.to_string()))
    }
}

/// Geo database port backed by a single fixed snapshot.
pub struct MockGeoDatabase {
    current: Mutex<Option<Arc<GeoSnapshot>>>,
}

impl MockGeoDatabase {
    pub fn new(lookup: MockCountryLookup) -> Self {
        let snapshot = GeoSnapshot::new(Box::new(lookup), SystemTime::UNIX_EPOCH, 0);
        Self {
            current: Mutex::new(Some(Arc::new(snapshot))),
        }
    }
}

#[async_trait]
impl GeoDatabasePort for MockGeoDatabase {
    fn snapshot(&self) -> Option<Arc<GeoSnapshot>> {
        self.current.lock().unwrap().clone()
    }

    async fn reload(&self) -> Result<ReloadOutcome, DomainError> {
        Ok(ReloadOutcome::Unchanged)
    }

    fn close(&self) {
        self.current.lock().unwrap().take();
    }
}
