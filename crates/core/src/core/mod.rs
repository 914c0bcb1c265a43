//! The pipelined CPU core.
//!
//! `units` holds the functional blocks (caches, register file, forwarding
//! and hazard units); `pipeline` wires them into the five-stage machine.

pub mod pipeline;
pub mod units;
