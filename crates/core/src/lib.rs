//! Cycle-accurate five-stage RV32I pipeline simulator library.
//!
//! This crate implements an in-order, five-stage pipelined RV32I core with a
//! two-level memory hierarchy:
//! 1. **Pipeline:** Fetch, decode, execute, memory, and writeback stages with
//!    single-slot latches, hazard detection, operand forwarding, and
//!    static not-taken branch prediction resolved in the memory stage.
//! 2. **Memory:** A fixed-latency backing store fronted by split instruction
//!    and data caches with single-port request protocols and multi-beat
//!    line fills and write-backs.
//! 3. **ISA:** Match/mask decoding and execution for the RV32I base subset.
//! 4. **Simulation:** Program loading, a non-pipelined reference simulator
//!    for cross-checking, and statistics collection.

/// Common types (register identifiers, error taxonomy).
pub mod common;
/// Simulator configuration (defaults, cache geometry, latencies).
pub mod config;
/// CPU core (pipeline, latches, caches, register file, hazard units).
pub mod core;
/// Instruction set (decode table, in-flight instruction record, executors).
pub mod isa;
/// Memory hierarchy leaves (byte image, fixed-latency backing store, memory unit).
pub mod mem;
/// Program loading and the non-pipelined reference simulator.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The pipelined core; construct with `Pipeline::new` and drive with `step`/`run`.
pub use crate::core::pipeline::Pipeline;
/// Error taxonomy for fatal simulation failures.
pub use crate::common::error::SimError;
/// Non-pipelined reference simulator used as an architectural oracle.
pub use crate::sim::refsim::RefSim;
/// End-of-run counters (cycles, retired instructions, stalls, mispredictions).
pub use crate::stats::SimStats;
