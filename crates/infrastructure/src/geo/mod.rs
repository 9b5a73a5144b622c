pub mod database;
pub mod maxmind;

pub use database::{DatasetParser, GeoDatabase};
pub use maxmind::MaxMindParser;
