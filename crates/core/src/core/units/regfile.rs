//! Architectural register file with per-register validity.
//!
//! Registers start invalid (their content is unknown, not zero) except `x0`.
//! The loader pre-validates the boot registers (`sp`, `ra`, `s0`-`s3`) before
//! the first cycle. Reading an invalid register is a programming-model error
//! in the simulated program and aborts the run; it is reported distinctly
//! from decode and memory errors.

use crate::common::reg::REG_COUNT;
use crate::common::{Reg, SimError};
use crate::isa::Instruction;

#[derive(Clone, Copy)]
struct Entry {
    value: u32,
    valid: bool,
}

/// The 32 architectural registers.
pub struct RegisterFile {
    regs: [Entry; REG_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a register file with every register invalid except `x0`.
    pub fn new() -> Self {
        let mut regs = [Entry {
            value: 0,
            valid: false,
        }; REG_COUNT];
        regs[0].valid = true;
        Self { regs }
    }

    fn read(&self, reg: Reg, pc: u32) -> Result<u32, SimError> {
        let entry = self.regs[reg.index()];
        if !entry.valid {
            return Err(SimError::InvalidRegister { reg, pc });
        }
        Ok(entry.value)
    }

    /// Writes `value` to `reg`, marking it valid. Writes to `x0` are no-ops.
    pub fn write(&mut self, reg: Reg, value: u32) {
        if reg.is_zero() {
            return;
        }
        self.regs[reg.index()] = Entry { value, valid: true };
    }

    /// Marks `reg` valid without changing its value.
    pub fn validate(&mut self, reg: Reg) {
        self.regs[reg.index()].valid = true;
    }

    /// Marks `reg` invalid. `x0` stays valid.
    pub fn invalidate(&mut self, reg: Reg) {
        if reg.is_zero() {
            return;
        }
        self.regs[reg.index()].valid = false;
    }

    /// Whether `reg` currently holds a known value.
    pub fn is_valid(&self, reg: Reg) -> bool {
        self.regs[reg.index()].valid
    }

    /// Current value of `reg` regardless of validity, `x0` reads as zero.
    pub fn peek(&self, reg: Reg) -> u32 {
        if reg.is_zero() {
            0
        } else {
            self.regs[reg.index()].value
        }
    }

    /// Seeds the stack pointer at startup.
    pub fn set_stack_pointer(&mut self, value: u32) {
        self.write(Reg::SP, value);
    }

    /// Fills the operand values an instruction reads from the register file.
    ///
    /// Operands the forwarding unit already covered are skipped
    /// (`rs1_covered`/`rs2_covered`); so are operands the encoding does not
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidRegister`] when an uncovered operand reads
    /// a register no write has reached yet.
    pub fn read_sources(
        &self,
        instr: &mut Instruction,
        rs1_covered: bool,
        rs2_covered: bool,
    ) -> Result<(), SimError> {
        if instr.uses_rs1() && !rs1_covered {
            let value = self.read(instr.rs1(), instr.pc())?;
            instr.set_rs1_v(value);
        }
        if instr.uses_rs2() && !rs2_covered {
            let value = self.read(instr.rs2(), instr.pc())?;
            instr.set_rs2_v(value);
        }
        Ok(())
    }

    /// Commits a retiring instruction's result.
    ///
    /// Narrow signed loads are sign-extended here; unsigned loads stay
    /// zero-extended. Instructions without a destination commit nothing.
    pub fn writeback(&mut self, instr: &Instruction) {
        if instr.writes_rd() {
            self.write(instr.rd(), instr.writeback_value());
        }
    }
}
