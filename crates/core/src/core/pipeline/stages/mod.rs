//! The five stage procedures.
//!
//! Each stage is a free function over the pipeline, invoked once per cycle
//! in reverse pipeline order. A stage consumes its upstream latch's current
//! instruction and either hands it downstream, restores it on a stall, or
//! drops it on a flush.

pub(crate) mod decode;
pub(crate) mod execute;
pub(crate) mod fetch;
pub(crate) mod memory;
pub(crate) mod writeback;
