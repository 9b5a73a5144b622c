//! geosplit infrastructure: geolocation database, upstream forwarding and the
//! wire-level request handler.
pub mod dns;
pub mod geo;
