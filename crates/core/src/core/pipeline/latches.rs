//! Single-slot pipeline registers.
//!
//! A latch holds at most one in-flight instruction in each of two slots:
//! `pending` (written by the upstream stage this cycle) and `current` (what
//! the downstream stage sees). Only [`Latch::clock`] moves pending into
//! current, so intra-cycle writes never leak early. A stalled boundary skips
//! `clock`, leaving the same instruction visible next cycle.
//!
//! Ownership is move-only: a stage `take`s the current instruction and
//! either passes it downstream with `write`, gives it back with `restore`
//! when stalling, or drops it on a flush.

use crate::isa::Instruction;

/// One pipeline register between two adjacent stages.
#[derive(Default)]
pub struct Latch {
    current: Option<Instruction>,
    pending: Option<Instruction>,
}

impl Latch {
    /// Hands the latch a pending instruction for the next cycle.
    ///
    /// At most one write per cycle reaches a latch; a second one indicates
    /// two stages claiming the same boundary.
    pub fn write(&mut self, instr: Instruction) {
        debug_assert!(self.pending.is_none(), "pipeline latch written twice");
        self.pending = Some(instr);
    }

    /// Moves pending into current. Run once per cycle per non-stalled
    /// boundary; an empty pending slot becomes a bubble.
    pub fn clock(&mut self) {
        self.current = self.pending.take();
    }

    /// Takes ownership of the current instruction, leaving the slot empty.
    pub fn take(&mut self) -> Option<Instruction> {
        self.current.take()
    }

    /// Returns a taken instruction after a stall decision; pairs with a
    /// skipped `clock` so the instruction stays visible next cycle.
    pub fn restore(&mut self, instr: Instruction) {
        debug_assert!(self.current.is_none(), "restore over an occupied latch");
        self.current = Some(instr);
    }

    /// Read-only view of the current instruction.
    pub fn current(&self) -> Option<&Instruction> {
        self.current.as_ref()
    }

    /// Whether both slots are empty.
    pub fn is_empty(&self) -> bool {
        self.current.is_none() && self.pending.is_none()
    }
}

/// The four latches of the five-stage pipeline.
#[derive(Default)]
pub struct Latches {
    /// Fetch to decode.
    pub fetch_decode: Latch,
    /// Decode to execute.
    pub decode_execute: Latch,
    /// Execute to memory.
    pub execute_memory: Latch,
    /// Memory to writeback.
    pub memory_writeback: Latch,
}

impl Latches {
    /// Whether every latch slot in the pipeline is empty.
    pub fn all_empty(&self) -> bool {
        self.fetch_decode.is_empty()
            && self.decode_execute.is_empty()
            && self.execute_memory.is_empty()
            && self.memory_writeback.is_empty()
    }
}
