//! geosplit application layer: ports and the resolution decision engine.
pub mod ports;
pub mod services;
