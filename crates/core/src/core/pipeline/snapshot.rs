//! Per-cycle observability records.
//!
//! Each stage fills one [`StageSnapshot`] per cycle describing what it did:
//! the instruction it worked on (if any) and why it made no progress
//! otherwise. The pipeline keeps the latest [`CycleSnapshot`] row for
//! external diagrams and the CLI's pipeline trace; nothing in the core reads
//! it back.

use crate::core::units::BypassClass;

/// What one stage did during one cycle.
#[derive(Debug, Clone, Default)]
pub struct StageSnapshot {
    /// PC of the instruction processed, when one was present.
    pub pc: Option<u32>,
    /// Disassembly of that instruction.
    pub disasm: Option<String>,
    /// The stage held its input because of a stall.
    pub stalled: bool,
    /// The stage discarded its input because of a flush.
    pub flushed: bool,
    /// The stage waited on a cache.
    pub waiting_cache: bool,
    /// Bypasses that supplied operands (decode only).
    pub bypass: Option<BypassClass>,
}

impl StageSnapshot {
    /// Whether the stage processed a bubble.
    pub fn is_empty(&self) -> bool {
        self.pc.is_none() && !self.stalled && !self.flushed && !self.waiting_cache
    }

    pub(crate) fn record(&mut self, pc: u32, disasm: String) {
        self.pc = Some(pc);
        self.disasm = Some(disasm);
    }
}

/// One row of the pipeline diagram: all five stages for one cycle.
#[derive(Debug, Clone, Default)]
pub struct CycleSnapshot {
    /// Cycle this row describes.
    pub cycle: u64,
    /// Fetch stage record.
    pub fetch: StageSnapshot,
    /// Decode stage record.
    pub decode: StageSnapshot,
    /// Execute stage record.
    pub execute: StageSnapshot,
    /// Memory stage record.
    pub memory: StageSnapshot,
    /// Writeback stage record.
    pub writeback: StageSnapshot,
}

impl CycleSnapshot {
    pub(crate) fn reset(&mut self, cycle: u64) {
        *self = Self {
            cycle,
            ..Self::default()
        };
    }
}
