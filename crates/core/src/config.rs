//! Configuration system for the pipeline simulator.
//!
//! This module defines the structures that parameterize the simulated
//! hardware. It provides:
//! 1. **Defaults:** Baseline constants for the backing store, caches, and
//!    transfer beat widths.
//! 2. **Structures:** Hierarchical config for memory and cache geometry.
//! 3. **Enums:** Cache replacement policy selection.
//!
//! Configuration is supplied as JSON (see the CLI's `--config` flag) or via
//! `Config::default()`.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These mirror the modeled hardware: a small fixed-latency backing store
/// and two identical 4 KiB 4-way caches with 16-byte lines.
mod defaults {
    /// Simulated address space size in bytes (1 MiB).
    pub const MEM_SIZE: usize = 1 << 20;

    /// Backing store access latency in cycles.
    pub const MEM_LATENCY: u64 = 2;

    /// Memory-stage beat width in bytes: loads/stores wider than this are
    /// issued to the data cache as successive sub-requests.
    pub const MEM_BEAT_BYTES: u32 = 2;

    /// Cache associativity (ways per set).
    pub const CACHE_WAYS: usize = 4;

    /// Number of cache sets (must be a power of two).
    pub const CACHE_SETS: usize = 64;

    /// Cache line size in bytes.
    pub const CACHE_LINE_BYTES: usize = 16;

    /// Cache-to-store transfer beat width in bytes, used by line fills and
    /// write-backs. Independent from `MEM_BEAT_BYTES` by design.
    pub const FILL_BEAT_BYTES: usize = 2;
}

/// Cache replacement policy selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReplacementPolicyKind {
    /// Round-robin rotation over the ways of a set (the default).
    #[default]
    Fifo,
    /// Least-recently-used eviction.
    Lru,
}

/// Backing store parameters.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Simulated address space size in bytes.
    pub size: usize,
    /// Fixed access latency in cycles for every backing store request.
    pub latency: u64,
    /// Memory-stage beat width in bytes (sub-request width for wide accesses).
    pub beat_bytes: u32,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size: defaults::MEM_SIZE,
            latency: defaults::MEM_LATENCY,
            beat_bytes: defaults::MEM_BEAT_BYTES,
        }
    }
}

/// Geometry and policy for one cache instance.
///
/// Both the instruction and the data cache are built from the same config.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Associativity (ways per set).
    pub ways: usize,
    /// Number of sets; must be a power of two.
    pub sets: usize,
    /// Line size in bytes.
    pub line_bytes: usize,
    /// Victim selection policy.
    pub policy: ReplacementPolicyKind,
    /// Width in bytes of one cache-to-store transfer beat.
    pub fill_beat_bytes: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ways: defaults::CACHE_WAYS,
            sets: defaults::CACHE_SETS,
            line_bytes: defaults::CACHE_LINE_BYTES,
            policy: ReplacementPolicyKind::default(),
            fill_beat_bytes: defaults::FILL_BEAT_BYTES,
        }
    }
}

/// Root configuration for a simulated system.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Backing store parameters.
    pub memory: MemoryConfig,
    /// Cache geometry, shared by the instruction and data caches.
    pub cache: CacheConfig,
}
