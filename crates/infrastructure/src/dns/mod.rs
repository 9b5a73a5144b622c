pub mod forwarding;
pub mod handler;
pub mod transport;
pub mod upstream;

pub use handler::DnsRequestHandler;
pub use upstream::ForwardingGroup;
