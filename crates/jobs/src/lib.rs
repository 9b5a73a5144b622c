pub mod geo_reload;
pub mod runner;

pub use geo_reload::GeoDatabaseReloadJob;
pub use runner::JobRunner;
