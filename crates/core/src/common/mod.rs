//! Common types shared across the simulator.
//!
//! This module provides the fundamental building blocks used by every other
//! component:
//! 1. **Register Identifiers:** A strong type for architectural register
//!    numbers with ABI names.
//! 2. **Error Handling:** The fatal-error taxonomy surfaced to callers.

/// Error types for fatal simulation failures.
pub mod error;

/// Architectural register identifier.
pub mod reg;

pub use error::SimError;
pub use reg::Reg;
