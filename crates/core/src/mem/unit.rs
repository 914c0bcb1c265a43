//! Memory unit: the backing store plus both caches as one clocked block.
//!
//! The pipeline talks to memory exclusively through this unit. Fetch uses
//! the instruction cache, the memory stage uses the data cache, and both
//! caches share the single backing store underneath.

use crate::common::SimError;
use crate::config::Config;
use crate::core::units::cache::Cache;
use crate::mem::{BackingStore, MemoryImage};

/// Composes the backing store with the instruction and data caches.
pub struct MemoryUnit {
    store: BackingStore,
    icache: Cache,
    dcache: Cache,
}

impl MemoryUnit {
    /// Builds the hierarchy over `image` with the configured latency and
    /// cache geometry.
    pub fn new(image: MemoryImage, config: &Config) -> Self {
        Self {
            store: BackingStore::new(image, config.memory.latency),
            icache: Cache::new("icache", &config.cache),
            dcache: Cache::new("dcache", &config.cache),
        }
    }

    /// Advances the store and both caches by one cycle.
    ///
    /// The store clocks first so a completing request is visible to the
    /// cache that issued it within the same cycle.
    ///
    /// # Errors
    ///
    /// Propagates an out-of-range access surfacing from the backing store.
    pub fn clock(&mut self) -> Result<(), SimError> {
        self.store.clock()?;
        self.icache.clock(&mut self.store);
        self.dcache.clock(&mut self.store);
        Ok(())
    }

    /// Whether the instruction cache holds an unfinished request.
    pub fn is_icache_busy(&self) -> bool {
        self.icache.is_busy()
    }

    /// Whether the data cache holds an unfinished request.
    pub fn is_dcache_busy(&self) -> bool {
        self.dcache.is_busy()
    }

    /// Drives one instruction fetch against the instruction cache.
    ///
    /// Issues a 4-byte read at `pc` unless `awaiting` says one is already
    /// pending, then polls. Returns the fetched word once the cache reports
    /// ready, clearing `awaiting`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Misaligned`] when the fetch straddles a cache
    /// line boundary.
    pub fn fetch(&mut self, awaiting: &mut bool, pc: u32) -> Result<Option<u32>, SimError> {
        if !*awaiting {
            self.icache.send_read(pc, 4, &mut self.store)?;
            *awaiting = true;
        }
        let word = self.icache.request_status();
        if word.is_some() {
            *awaiting = false;
        }
        Ok(word)
    }

    /// Issues one load beat to the data cache.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Misaligned`] when the beat straddles a cache
    /// line boundary.
    pub fn process_load(&mut self, addr: u32, num_bytes: u32) -> Result<(), SimError> {
        self.dcache.send_read(addr, num_bytes, &mut self.store)
    }

    /// Issues one store beat to the data cache.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Misaligned`] when the beat straddles a cache
    /// line boundary.
    pub fn process_store(&mut self, value: u32, addr: u32, num_bytes: u32) -> Result<(), SimError> {
        self.dcache.send_write(value, addr, num_bytes, &mut self.store)
    }

    /// The data cache's latest completed result.
    pub fn memory_request_status(&self) -> Option<u32> {
        self.dcache.request_status()
    }

    /// Initial stack pointer for the loaded image.
    pub fn stack_pointer(&self) -> u32 {
        self.store.image().stack_pointer()
    }

    /// Instruction cache counters as (hits, misses).
    pub fn icache_stats(&self) -> (u64, u64) {
        (self.icache.hits(), self.icache.misses())
    }

    /// Data cache counters as (hits, misses, evictions).
    pub fn dcache_stats(&self) -> (u64, u64, u64) {
        (self.dcache.hits(), self.dcache.misses(), self.dcache.evictions())
    }
}
