//! Identifiers for persisted series files

use std::sync::atomic::{AtomicU64, Ordering};

/// Hands out the numeric suffix for each persisted series file
///
/// Callers own the source and pass it to every normalizer that should share a
/// numbering scheme.
#[cfg_attr(test, mockall::automock)]
pub trait SequenceSource: Send + Sync {
    /// Next identifier; never repeats until reset
    fn next_id(&self) -> u64;
}

/// Monotonic counter starting at 1
#[derive(Debug)]
pub struct FileSequence {
    start: u64,
    next: AtomicU64,
}

impl FileSequence {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            start,
            next: AtomicU64::new(start),
        }
    }

    /// Rewind to the starting value
    pub fn reset(&self) {
        self.next.store(self.start, Ordering::SeqCst);
    }
}

impl Default for FileSequence {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceSource for FileSequence {
    fn next_id(&self) -> u64 {
        self.next.fetch_add(1, Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_is_monotonic() {
        let seq = FileSequence::new();
        assert_eq!(seq.next_id(), 1);
        assert_eq!(seq.next_id(), 2);
        assert_eq!(seq.next_id(), 3);
    }

    #[test]
    fn test_reset() {
        let seq = FileSequence::starting_at(10);
        seq.next_id();
        seq.next_id();
        seq.reset();
        assert_eq!(seq.next_id(), 10);
    }

    #[test]
    fn test_independent_sequences() {
        let a = FileSequence::new();
        let b = FileSequence::new();
        a.next_id();
        assert_eq!(b.next_id(), 1);
    }
}
