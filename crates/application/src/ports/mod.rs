pub mod geo_database;
pub mod upstream_group;

pub use geo_database::{CountryLookup, GeoDatabasePort, GeoSnapshot, ReloadOutcome};
pub use upstream_group::{ResolutionOutcome, UpstreamGroup};
