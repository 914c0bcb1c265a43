//! Hazard detection and stall/flush control.
//!
//! The hazard unit is the pipeline's wire state for one cycle: three stall
//! flags (one per upstream latch boundary), a flush flag with its redirect
//! target, and two destination-register masks rebuilt each cycle from the
//! execute and memory stages. Everything here is recomputed every cycle and
//! cleared before the next; nothing is carried forward.
//!
//! The masks track only destinations whose values cannot be forwarded yet: a
//! load in execute, or a load in memory that has not finished its final
//! beat. Forwardable results reach decode through the bypass network with no
//! stall.

use crate::common::Reg;

/// Stall, flush, and hazard bookkeeping for the current cycle.
#[derive(Default)]
pub struct HazardUnit {
    /// Hold the fetch-to-decode latch this cycle.
    pub fd_stall: bool,
    /// Hold the decode-to-execute latch this cycle.
    pub de_stall: bool,
    /// Hold the execute-to-memory latch this cycle.
    pub em_stall: bool,

    /// Redirect target set by a taken branch or jump resolving in memory.
    redirect: Option<u32>,

    /// Destinations pending in execute that cannot be forwarded.
    execute_regs: u32,
    /// Destinations pending in memory that cannot be forwarded.
    memory_regs: u32,

    /// A data hazard stalled decode this cycle.
    pub data_stall: bool,
    /// Fetch waited on the instruction cache this cycle.
    pub fetch_stall: bool,
    /// The memory stage waited on the data cache or a beat this cycle.
    pub memory_stall: bool,
    /// A control-flow redirect flushed the front end this cycle.
    pub mispredict: bool,
}

impl HazardUnit {
    /// Creates a unit with all wire state clear.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears the memory-stage outputs at the start of that stage: the
    /// flush/redirect from last cycle and the memory-side register mask.
    pub fn begin_memory_stage(&mut self) {
        self.redirect = None;
        self.memory_regs = 0;
    }

    /// Clears the execute-side register mask at the start of that stage.
    pub fn begin_execute_stage(&mut self) {
        self.execute_regs = 0;
    }

    /// Marks `reg` as pending in execute with no forwardable value.
    pub fn mask_execute(&mut self, reg: Reg) {
        self.execute_regs |= 1 << reg.index();
    }

    /// Marks `reg` as pending in memory with no forwardable value.
    pub fn mask_memory(&mut self, reg: Reg) {
        self.memory_regs |= 1 << reg.index();
    }

    /// Whether `reg` is pending without a forwardable value. `x0` never is.
    pub fn is_pending(&self, reg: Reg) -> bool {
        let mask = (self.execute_regs | self.memory_regs) & !1;
        mask & (1 << reg.index()) != 0
    }

    /// Records a data hazard: decode bubbles and fetch holds.
    pub fn set_data_stall(&mut self) {
        self.data_stall = true;
        self.fd_stall = true;
    }

    /// Records a structural hazard in the memory stage: the execute-to-memory
    /// latch holds.
    pub fn set_memory_stall(&mut self) {
        self.memory_stall = true;
        self.em_stall = true;
    }

    /// Records a fetch-side structural hazard (instruction cache busy).
    pub fn set_fetch_stall(&mut self) {
        self.fetch_stall = true;
    }

    /// Raises the flush flag with the resolved branch target.
    pub fn set_mispredict(&mut self, target: u32) {
        self.redirect = Some(target);
        self.mispredict = true;
    }

    /// Whether a flush is pending this cycle.
    pub fn flush_pending(&self) -> bool {
        self.redirect.is_some()
    }

    /// The redirect target, when a flush is pending.
    pub fn redirect_target(&self) -> Option<u32> {
        self.redirect
    }

    /// Number of distinct hazard kinds active this cycle.
    pub fn active_hazards(&self) -> u32 {
        u32::from(self.data_stall)
            + u32::from(self.fetch_stall)
            + u32::from(self.memory_stall)
            + u32::from(self.mispredict)
    }

    /// Clears stall flags and per-cycle stat flags at the end of the cycle.
    ///
    /// The redirect is left for the next cycle's fetch ordering and cleared
    /// by [`Self::begin_memory_stage`]; the masks are rebuilt by the stages.
    pub fn reset(&mut self) {
        self.fd_stall = false;
        self.de_stall = false;
        self.em_stall = false;
        self.data_stall = false;
        self.fetch_stall = false;
        self.memory_stall = false;
        self.mispredict = false;
    }
}
