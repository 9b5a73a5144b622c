#![allow(dead_code)]
use compact_str::CompactString;
use geosplit_application::ports::CountryLookup;
use geosplit_domain::DomainError;
use geosplit_infrastructure::geo::DatasetParser;
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RData, RecordType};
use std::net::IpAddr;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Dataset that answers every lookup with one fixed country and remembers
/// the file contents it was built from.
pub struct StaticLookup {
    pub country: CompactString,
    pub source: Vec<u8>,
}

impl CountryLookup for StaticLookup {
    fn country_code(&self, _ip: IpAddr) -> Result<Option<CompactString>, DomainError> {
        Ok(Some(self.country.clone()))
    }
}

/// Parser that treats the file content as the country code and counts how
/// often it runs. Content starting with `!` fails to parse.
#[derive(Clone, Default)]
pub struct CountingParser {
    pub parses: Arc<AtomicUsize>,
}

impl CountingParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.parses.load(Ordering::SeqCst)
    }
}

impl DatasetParser for CountingParser {
    fn parse(&self, bytes: Vec<u8>) -> Result<Box<dyn CountryLookup>, DomainError> {
        self.parses.fetch_add(1, Ordering::SeqCst);
        if bytes.first() == Some(&b'!') {
            return Err(DomainError::GeoDatabaseError("corrupt test dataset".to_string()));
        }
        let text = String::from_utf8_lossy(&bytes);
        Ok(Box::new(StaticLookup {
            country: CompactString::new(text.trim()),
            source: bytes,
        }))
    }
}

pub fn answer_ips(message: &Message) -> Vec<IpAddr> {
    message
        .answers()
        .iter()
        .filter_map(|r| match r.data() {
            RData::A(a) => Some(IpAddr::V4(a.0)),
            RData::AAAA(aaaa) => Some(IpAddr::V6(aaaa.0)),
            _ => None,
        })
        .collect()
}

/// Recursive IN query for `domain` with a random id.
pub fn build_query(domain: &str, record_type: RecordType) -> Message {
    let mut query = Query::new();
    query.set_name(Name::from_str(domain).unwrap());
    query.set_query_type(record_type);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
    message.set_recursion_desired(true);
    message.add_query(query);
    message
}
