#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod dns_server_mock;
pub mod tls_server_mock;

pub use builders::{answer_ips, build_query, CountingParser, StaticLookup};
pub use dns_server_mock::{MockDnsServer, MockMode};
pub use tls_server_mock::MockTlsServer;
