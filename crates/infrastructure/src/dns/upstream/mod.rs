pub mod group;
pub mod query;

pub use group::ForwardingGroup;
pub use query::query_endpoint;
