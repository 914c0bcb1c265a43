//! Least-recently-used replacement.
//!
//! Each set keeps a usage stack of ways; index 0 is most recently used and
//! the last index is the eviction candidate.

use super::ReplacementPolicy;

/// LRU policy state.
pub struct LruPolicy {
    /// One usage stack per set, MRU first.
    usage: Vec<Vec<usize>>,
}

impl LruPolicy {
    /// Creates a new LRU policy for a `sets` x `ways` cache.
    pub fn new(sets: usize, ways: usize) -> Self {
        let usage = (0..sets).map(|_| (0..ways).collect()).collect();
        Self { usage }
    }
}

impl ReplacementPolicy for LruPolicy {
    /// Moves the accessed `way` to the MRU position of its set.
    fn touch(&mut self, set: usize, way: usize) {
        let stack = &mut self.usage[set];
        if let Some(pos) = stack.iter().position(|&x| x == way) {
            stack.remove(pos);
        }
        stack.insert(0, way);
    }

    /// Returns the LRU way and immediately marks it most recently used,
    /// since the caller is about to refill it.
    fn get_victim(&mut self, set: usize) -> usize {
        let way = *self.usage[set].last().unwrap_or(&0);
        self.touch(set, way);
        way
    }
}
