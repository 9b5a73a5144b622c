#![allow(dead_code)]

pub mod mock_geo;
pub mod mock_upstream;

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::rdata::{A, AAAA};
use hickory_proto::rr::{Name, RData, Record, RecordType};
use std::net::IpAddr;
use std::str::FromStr;

pub fn request(domain: &str, record_type: RecordType) -> Message {
    let mut msg = Message::new(next_id(), MessageType::Query, OpCode::Query);
    msg.set_recursion_desired(true);
    msg.add_query(Query::query(Name::from_str(domain).unwrap(), record_type));
    msg
}

/// Response to `request` carrying one A/AAAA record per address.
pub fn answer(request: &Message, addrs: &[&str]) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, OpCode::Query);
    reply.add_queries(request.queries().iter().cloned());
    let name = request.queries()[0].name().clone();
    for addr in addrs {
        let rdata = match IpAddr::from_str(addr).unwrap() {
            IpAddr::V4(v4) => RData::A(A(v4)),
            IpAddr::V6(v6) => RData::AAAA(AAAA(v6)),
        };
        reply.add_answer(Record::from_rdata(name.clone(), 300, rdata));
    }
    reply
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

fn next_id() -> u16 {
    use std::sync::atomic::{AtomicU16, Ordering};
    static NEXT: AtomicU16 = AtomicU16::new(1);
    NEXT.fetch_add(1, Ordering::Relaxed)
}
