//! Functional units shared by the pipeline stages.
//!
//! 1. **Cache:** single-port set-associative caches with pluggable
//!    replacement policies.
//! 2. **Register File:** 32 architectural registers with validity tracking.
//! 3. **Forwarding Unit:** the exe/mem bypass network.
//! 4. **Hazard Unit:** stall, flush, and pending-register bookkeeping.

pub mod cache;
pub mod forwarding;
pub mod hazard;
pub mod regfile;

pub use cache::Cache;
pub use forwarding::{BypassClass, BypassOutcome, ForwardingUnit};
pub use hazard::HazardUnit;
pub use regfile::RegisterFile;
