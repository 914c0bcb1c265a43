//! First-in, first-out (round-robin) replacement.
//!
//! Each set carries a rotating pointer to the next way to evict. Hits do not
//! affect the rotation; every victim selection advances it by one.

use super::ReplacementPolicy;

/// FIFO policy state.
pub struct FifoPolicy {
    /// Next way to evict, one slot per set.
    next_way: Vec<usize>,
    ways: usize,
}

impl FifoPolicy {
    /// Creates a new FIFO policy for a `sets` x `ways` cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            next_way: vec![0; sets],
            ways,
        }
    }
}

impl ReplacementPolicy for FifoPolicy {
    /// FIFO ignores accesses; eviction order depends only on fill order.
    fn touch(&mut self, _set: usize, _way: usize) {}

    /// Returns the current pointer for `set` and rotates it forward.
    fn get_victim(&mut self, set: usize) -> usize {
        let way = self.next_way[set];
        self.next_way[set] = (way + 1) % self.ways;
        way
    }
}
