use compact_str::{CompactString, ToCompactString};
use hickory_proto::rr::{DNSClass, RecordType};
use tracing::{debug, Span};

use super::suffix_set::SuffixSet;

/// Decides which queries skip the primary/fallback race.
///
/// Built once at setup and shared behind an `Arc`; never mutated afterwards.
pub struct BypassRouter {
    domestic_suffix: CompactString,
    exceptions: SuffixSet,
    block_type: Option<RecordType>,
    span: Span,
}

impl BypassRouter {
    /// `domestic_suffix` and `exceptions` are domain names in any case, with or
    /// without the trailing dot.
    pub fn new(
        domestic_suffix: &str,
        exceptions: &[String],
        block_type: Option<RecordType>,
        span: Span,
    ) -> Self {
        let mut set = SuffixSet::new();
        for entry in exceptions {
            set.insert(&fqdn_lower(entry));
        }
        Self {
            domestic_suffix: fqdn_lower(domestic_suffix),
            exceptions: set,
            block_type,
            span,
        }
    }

    pub fn block_type(&self) -> Option<RecordType> {
        self.block_type
    }

    pub fn exception_count(&self) -> usize {
        self.exceptions.len()
    }

    /// True when the name sits under the domestic suffix or matches an
    /// exception entry (the entry itself or any sub-domain).
    pub fn should_bypass(&self, query_name: &str) -> bool {
        let name = fqdn_lower(query_name);

        if has_label_suffix(&name, &self.domestic_suffix) {
            debug!(parent: &self.span, domain = %name, "Domestic suffix, bypassing race");
            return true;
        }

        if self.exceptions.matches(&name) {
            debug!(parent: &self.span, domain = %name, "Exception entry, bypassing race");
            return true;
        }

        false
    }

    /// True only when a block type is configured, the query type equals it and
    /// the class is IN.
    pub fn is_blocked_type(&self, query_type: RecordType, query_class: DNSClass) -> bool {
        self.block_type == Some(query_type) && query_class == DNSClass::IN
    }
}

/// Lower-case with exactly one trailing dot.
fn fqdn_lower(name: &str) -> CompactString {
    let trimmed = name.trim_end_matches('.');
    if trimmed.is_empty() {
        return CompactString::const_new(".");
    }
    let mut out = trimmed.to_ascii_lowercase().to_compact_string();
    out.push('.');
    out
}

/// `name` equals `suffix` or ends with `.` + `suffix`. Both must be
/// normalized by `fqdn_lower`.
fn has_label_suffix(name: &str, suffix: &str) -> bool {
    if suffix == "." {
        return true;
    }
    match name.strip_suffix(suffix) {
        Some("") => true,
        Some(rest) => rest.ends_with('.'),
        None => false,
    }
}
