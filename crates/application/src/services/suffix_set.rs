use compact_str::CompactString;
use rustc_hash::FxBuildHasher;
use smallvec::SmallVec;
use std::collections::HashMap;

#[derive(Default)]
struct SuffixNode {
    children: HashMap<CompactString, SuffixNode, FxBuildHasher>,
    /// An entry ends at this node.
    terminal: bool,
}

/// Set of domain suffixes stored as reversed label paths.
///
/// `example.com.` is stored as root → "com" → "example" with `terminal` set on
/// the last node. A lookup matches when any node on the walk is terminal, so an
/// entry covers the name itself and every sub-domain:
///
///   entry `example.com.`
///   `example.com.`      → match
///   `a.b.example.com.`  → match
///   `badexample.com.`   → no match (labels differ)
///
/// Inputs must already be lower-case; the trailing dot is optional.
#[derive(Default)]
pub struct SuffixSet {
    root: SuffixNode,
    len: usize,
}

impl SuffixSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn insert(&mut self, domain: &str) {
        let mut node = &mut self.root;
        for label in labels(domain) {
            node = node.children.entry(CompactString::new(label)).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.len += 1;
        }
    }

    /// True when `name` equals an entry or is a sub-domain of one.
    #[inline]
    pub fn matches(&self, name: &str) -> bool {
        let mut node = &self.root;
        if node.terminal {
            return true;
        }
        let reversed: SmallVec<[&str; 8]> = labels(name).collect();
        for label in reversed {
            match node.children.get(label) {
                Some(child) if child.terminal => return true,
                Some(child) => node = child,
                None => return false,
            }
        }
        false
    }
}

/// Labels from the top-level domain down; the root name yields none.
fn labels(domain: &str) -> impl Iterator<Item = &str> {
    domain
        .trim_end_matches('.')
        .split('.')
        .rev()
        .filter(|l| !l.is_empty())
}
