//! Cache replacement policies.
//!
//! Victim selection for the set-associative caches. Two policies are
//! provided:
//!
//! - `Fifo`: round-robin rotation over the ways of a set (the default).
//! - `Lru`: least recently used.

pub mod fifo;
pub mod lru;

pub use fifo::FifoPolicy;
pub use lru::LruPolicy;

use crate::config::ReplacementPolicyKind;

/// Trait for cache replacement policies.
///
/// `touch` records an access to a resident line; `get_victim` picks the way
/// to evict on a miss. `get_victim` may mutate policy state (FIFO advances
/// its rotation there).
pub trait ReplacementPolicy: Send + Sync {
    /// Records an access to `way` within `set`.
    fn touch(&mut self, set: usize, way: usize);

    /// Selects the way to evict from `set`.
    fn get_victim(&mut self, set: usize) -> usize;
}

/// Builds the policy instance selected by the configuration.
pub fn build(kind: ReplacementPolicyKind, sets: usize, ways: usize) -> Box<dyn ReplacementPolicy> {
    match kind {
        ReplacementPolicyKind::Fifo => Box::new(FifoPolicy::new(sets, ways)),
        ReplacementPolicyKind::Lru => Box::new(LruPolicy::new(sets, ways)),
    }
}
