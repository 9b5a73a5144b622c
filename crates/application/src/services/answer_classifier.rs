use compact_str::CompactString;
use hickory_proto::rr::rdata::svcb::{SvcParamValue, SVCB};
use hickory_proto::rr::{RData, Record};
use smallvec::SmallVec;
use std::net::IpAddr;
use tracing::{debug, Span};

use crate::ports::CountryLookup;

type Candidates = SmallVec<[IpAddr; 4]>;

/// Judges whether an answer set resolves to the target country.
pub struct AnswerClassifier {
    target_country: CompactString,
    span: Span,
}

impl AnswerClassifier {
    /// `target_country` is an upper-case ISO 3166-1 alpha-2 code.
    pub fn new(target_country: impl Into<CompactString>, span: Span) -> Self {
        Self {
            target_country: target_country.into(),
            span,
        }
    }

    /// Walk the answers in order and look up every candidate address.
    ///
    /// Returns true on the first candidate located in the target country.
    /// The first lookup error ends classification with `false`.
    pub fn is_domestic(&self, answers: &[Record], lookup: &dyn CountryLookup) -> bool {
        for record in answers {
            for ip in candidates(record.data()) {
                match lookup.country_code(ip) {
                    Ok(Some(code)) if code == self.target_country => {
                        debug!(parent: &self.span, %ip, country = %code, "Domestic address");
                        return true;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        debug!(parent: &self.span, %ip, error = %e, "Geo lookup failed, treating answer as foreign");
                        return false;
                    }
                }
            }
        }
        false
    }
}

/// Candidate addresses carried by one record, in wire order.
pub fn candidates(data: &RData) -> Candidates {
    let mut out = Candidates::new();
    match data {
        RData::A(a) => out.push(IpAddr::V4(a.0)),
        RData::AAAA(aaaa) => out.push(IpAddr::V6(aaaa.0)),
        RData::SVCB(svcb) => collect_hints(svcb, &mut out),
        RData::HTTPS(https) => collect_hints(&https.0, &mut out),
        _ => {}
    }
    out
}

/// Collect ipv4hint and ipv6hint addresses. Scanning stops once both kinds
/// have been seen.
fn collect_hints(svcb: &SVCB, out: &mut Candidates) {
    let mut seen_v4 = false;
    let mut seen_v6 = false;
    for (_, value) in svcb.svc_params() {
        match value {
            SvcParamValue::Ipv4Hint(hint) => {
                seen_v4 = true;
                out.extend(hint.0.iter().map(|a| IpAddr::V4(a.0)));
            }
            SvcParamValue::Ipv6Hint(hint) => {
                seen_v6 = true;
                out.extend(hint.0.iter().map(|a| IpAddr::V6(a.0)));
            }
            _ => {}
        }
        if seen_v4 && seen_v6 {
            break;
        }
    }
}
