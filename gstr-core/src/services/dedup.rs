//! Duplicate document tracking across a batch

use std::collections::HashSet;

/// Set of upper-cased document numbers seen so far
///
/// The counterparty is not part of the key: the same number issued to two
/// different recipients is still a duplicate. One tracker is threaded
/// through every file of a batch; callers wanting per-file scope reset it
/// between files.
#[derive(Debug, Clone, Default)]
pub struct DuplicateTracker {
    seen: HashSet<String>,
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn key(number: &str) -> String {
        number.trim().to_uppercase()
    }

    /// Record `number`; returns false when it was already recorded
    pub fn check_and_record(&mut self, number: &str) -> bool {
        self.seen.insert(Self::key(number))
    }

    pub fn contains(&self, number: &str) -> bool {
        self.seen.contains(&Self::key(number))
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}
