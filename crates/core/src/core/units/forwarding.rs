//! Operand forwarding (bypass) network.
//!
//! Two bypass records carry not-yet-committed results back to decode: one
//! armed by the execute stage, one by the memory stage. Both are transient
//! wire state, re-armed every cycle from whatever instruction occupies those
//! stages and cleared before the next cycle, so stale values never survive.

use crate::common::Reg;
use crate::isa::Instruction;

/// Which bypasses supplied operands to an instruction at decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassClass {
    /// No operand was forwarded.
    None,
    /// Only the memory-stage bypass applied.
    Mem,
    /// Only the execute-stage bypass applied.
    Exe,
    /// Both bypasses applied.
    Both,
}

/// Per-operand coverage reported by [`ForwardingUnit::read_sources`].
#[derive(Debug, Clone, Copy)]
pub struct BypassOutcome {
    /// Overall classification for observability.
    pub class: BypassClass,
    /// `rs1` was supplied by a bypass.
    pub rs1: bool,
    /// `rs2` was supplied by a bypass.
    pub rs2: bool,
}

/// The bypass network state for one cycle.
#[derive(Default)]
pub struct ForwardingUnit {
    bypass_exe: Option<(Reg, u32)>,
    bypass_mem: Option<(Reg, u32)>,
}

impl ForwardingUnit {
    /// Arms the execute-stage bypass.
    ///
    /// Callers never arm `x0`; its value is architecturally zero and the
    /// register file serves it directly.
    pub fn set_bypass_exe(&mut self, reg: Reg, value: u32) {
        debug_assert!(!reg.is_zero());
        self.bypass_exe = Some((reg, value));
    }

    /// Arms the memory-stage bypass.
    pub fn set_bypass_mem(&mut self, reg: Reg, value: u32) {
        debug_assert!(!reg.is_zero());
        self.bypass_mem = Some((reg, value));
    }

    /// Applies the bypasses to the instruction's used operands.
    ///
    /// The memory-stage value lands first and the execute-stage (newer)
    /// value overwrites it on conflict. Unused operands and `x0` are never
    /// touched.
    pub fn read_sources(&self, instr: &mut Instruction) -> BypassOutcome {
        let mut rs1_mem = false;
        let mut rs2_mem = false;
        let mut rs1_exe = false;
        let mut rs2_exe = false;

        if let Some((reg, value)) = self.bypass_mem {
            if instr.uses_rs1() && instr.rs1() == reg {
                instr.set_rs1_v(value);
                rs1_mem = true;
            }
            if instr.uses_rs2() && instr.rs2() == reg {
                instr.set_rs2_v(value);
                rs2_mem = true;
            }
        }
        if let Some((reg, value)) = self.bypass_exe {
            if instr.uses_rs1() && instr.rs1() == reg {
                instr.set_rs1_v(value);
                rs1_exe = true;
            }
            if instr.uses_rs2() && instr.rs2() == reg {
                instr.set_rs2_v(value);
                rs2_exe = true;
            }
        }

        let any_exe = rs1_exe || rs2_exe;
        let any_mem = rs1_mem || rs2_mem;
        let class = match (any_exe, any_mem) {
            (true, true) => BypassClass::Both,
            (true, false) => BypassClass::Exe,
            (false, true) => BypassClass::Mem,
            (false, false) => BypassClass::None,
        };
        BypassOutcome {
            class,
            rs1: rs1_mem || rs1_exe,
            rs2: rs2_mem || rs2_exe,
        }
    }

    /// Clears both bypass records; called at the end of every cycle.
    pub fn flush(&mut self) {
        self.bypass_exe = None;
        self.bypass_mem = None;
    }
}
