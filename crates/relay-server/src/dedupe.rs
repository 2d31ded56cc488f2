//! Bounded duplicate-message suppression.

use std::collections::{HashSet, VecDeque};

/// Maximum number of fingerprints held before pruning.
pub const DEFAULT_CAP: usize = 1000;

/// Number of fingerprints kept after pruning.
pub const DEFAULT_KEEP: usize = 500;

/// Fingerprint for one inbound chat message.
///
/// The timestamp is the client-declared one when present, so an identical
/// retry fingerprints identically; a message without a declared timestamp
/// is fingerprinted with wall-clock time and is effectively never
/// suppressed.
pub fn fingerprint(session_id: &str, text: &str, timestamp: u64) -> String {
    format!("{session_id}:{text}:{timestamp}")
}

/// Insertion-ordered bounded set of recently seen fingerprints.
///
/// When an insert pushes the set past `cap`, the oldest entries are dropped
/// until `keep` remain. Eviction can let an old duplicate through again:
/// the bound is a cardinality heuristic, not a correctness guarantee.
#[derive(Debug)]
pub struct RecentMessages {
    seen: HashSet<String>,
    order: VecDeque<String>,
    cap: usize,
    keep: usize,
}

impl Default for RecentMessages {
    fn default() -> Self {
        Self::new()
    }
}

impl RecentMessages {
    /// Create a set with the default 1000/500 bounds.
    pub fn new() -> Self {
        Self::with_bounds(DEFAULT_CAP, DEFAULT_KEEP)
    }

    /// Create a set with explicit bounds. `keep` is clamped to `cap`.
    pub fn with_bounds(cap: usize, keep: usize) -> Self {
        Self {
            seen: HashSet::new(),
            order: VecDeque::new(),
            cap,
            keep: keep.min(cap),
        }
    }

    /// Record a fingerprint. Returns `false` if it was already present (a
    /// duplicate), `true` if it is new.
    pub fn insert(&mut self, fingerprint: String) -> bool {
        if self.seen.contains(&fingerprint) {
            return false;
        }
        self.order.push_back(fingerprint.clone());
        self.seen.insert(fingerprint);
        if self.seen.len() > self.cap {
            self.prune();
        }
        true
    }

    /// Number of fingerprints currently held.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether no fingerprints are held.
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    fn prune(&mut self) {
        while self.order.len() > self.keep {
            if let Some(oldest) = self.order.pop_front() {
                self.seen.remove(&oldest);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_detected() {
        let mut recent = RecentMessages::new();
        let fp = fingerprint("ab12cd34", "hello", 1000);
        assert!(recent.insert(fp.clone()));
        assert!(!recent.insert(fp));
        assert_eq!(recent.len(), 1);
    }

    #[test]
    fn test_distinct_fingerprints_accepted() {
        let mut recent = RecentMessages::new();
        assert!(recent.insert(fingerprint("ab12cd34", "hello", 1000)));
        assert!(recent.insert(fingerprint("ab12cd34", "hello", 1001)));
        assert!(recent.insert(fingerprint("ef56ab78", "hello", 1000)));
        assert_eq!(recent.len(), 3);
    }

    #[test]
    fn test_capped_after_every_insert() {
        let mut recent = RecentMessages::new();
        for i in 0..1200u64 {
            recent.insert(fingerprint("ab12cd34", "message", i));
            assert!(recent.len() <= DEFAULT_CAP);
        }
        // 1001st insert tripped the prune down to the keep level.
        assert!(recent.len() >= DEFAULT_KEEP);
    }

    #[test]
    fn test_prune_drops_oldest_keeps_newest() {
        let mut recent = RecentMessages::with_bounds(4, 2);
        for i in 0..5u64 {
            recent.insert(fingerprint("ab12cd34", "message", i));
        }
        // Insert #5 pruned to the two most recent fingerprints.
        assert_eq!(recent.len(), 2);
        assert!(!recent.insert(fingerprint("ab12cd34", "message", 4)));
        assert!(!recent.insert(fingerprint("ab12cd34", "message", 3)));
        // The oldest was evicted, so it is accepted as new again.
        assert!(recent.insert(fingerprint("ab12cd34", "message", 0)));
    }

    #[test]
    fn test_empty() {
        let recent = RecentMessages::new();
        assert!(recent.is_empty());
        assert_eq!(recent.len(), 0);
    }
}
