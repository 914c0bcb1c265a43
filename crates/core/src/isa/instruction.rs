//! In-flight instruction representation.
//!
//! An [`Instruction`] is created at decode and carried through the pipeline
//! latches by move. It accumulates state as it flows: operand values at
//! decode, the result and next-PC at execute, and the loaded value at the
//! memory stage. Writeback consumes it.

use std::fmt;

use crate::common::Reg;

/// RISC-V instruction encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Register-register (add, xor, ...).
    R,
    /// Register-immediate, loads, and jalr.
    I,
    /// Stores.
    S,
    /// Conditional branches.
    B,
    /// lui and auipc.
    U,
    /// jal.
    J,
}

/// The RV32I operations the core executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Op {
    Lui,
    Auipc,
    Jal,
    Jalr,
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Lb,
    Lh,
    Lw,
    Lbu,
    Lhu,
    Sb,
    Sh,
    Sw,
    Addi,
    Slti,
    Sltiu,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,
    Add,
    Sub,
    Sll,
    Slt,
    Sltu,
    Xor,
    Srl,
    Sra,
    Or,
    And,
}

impl Op {
    /// Lowercase assembly mnemonic.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Lui => "lui",
            Self::Auipc => "auipc",
            Self::Jal => "jal",
            Self::Jalr => "jalr",
            Self::Beq => "beq",
            Self::Bne => "bne",
            Self::Blt => "blt",
            Self::Bge => "bge",
            Self::Bltu => "bltu",
            Self::Bgeu => "bgeu",
            Self::Lb => "lb",
            Self::Lh => "lh",
            Self::Lw => "lw",
            Self::Lbu => "lbu",
            Self::Lhu => "lhu",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Addi => "addi",
            Self::Slti => "slti",
            Self::Sltiu => "sltiu",
            Self::Xori => "xori",
            Self::Ori => "ori",
            Self::Andi => "andi",
            Self::Slli => "slli",
            Self::Srli => "srli",
            Self::Srai => "srai",
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Sll => "sll",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Xor => "xor",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Or => "or",
            Self::And => "and",
        }
    }
}

/// One decoded instruction moving through the pipeline.
///
/// Ownership is strict: at any instant an instruction lives in exactly one
/// latch slot or one stage local. Flushes drop it; writeback retires it.
#[derive(Debug, Clone)]
pub struct Instruction {
    pc: u32,
    new_pc: u32,
    op: Op,
    format: Format,
    rd: Reg,
    rs1: Reg,
    rs2: Reg,
    imm: i32,
    rs1_v: u32,
    rs2_v: u32,
    rd_v: u32,
    /// Effective address for loads and stores, set at execute.
    mem_addr: u32,
    /// Access width in bytes; zero for non-memory operations.
    mem_size: u32,
    executed: bool,
}

impl Instruction {
    pub(crate) fn new(op: Op, format: Format, rd: Reg, rs1: Reg, rs2: Reg, imm: i32, pc: u32) -> Self {
        let mem_size = match op {
            Op::Lb | Op::Lbu | Op::Sb => 1,
            Op::Lh | Op::Lhu | Op::Sh => 2,
            Op::Lw | Op::Sw => 4,
            _ => 0,
        };
        Self {
            pc,
            new_pc: pc.wrapping_add(4),
            op,
            format,
            rd,
            rs1,
            rs2,
            imm,
            rs1_v: 0,
            rs2_v: 0,
            rd_v: 0,
            mem_addr: 0,
            mem_size,
            executed: false,
        }
    }

    /// Address this instruction was fetched from.
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Address of the next instruction in program order after execution.
    ///
    /// Differs from `pc + 4` only for taken branches and jumps.
    pub fn new_pc(&self) -> u32 {
        self.new_pc
    }

    /// The decoded operation.
    pub fn op(&self) -> Op {
        self.op
    }

    /// The encoding format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Destination register.
    pub fn rd(&self) -> Reg {
        self.rd
    }

    /// First source register.
    pub fn rs1(&self) -> Reg {
        self.rs1
    }

    /// Second source register.
    pub fn rs2(&self) -> Reg {
        self.rs2
    }

    /// Sign-extended immediate.
    pub fn imm(&self) -> i32 {
        self.imm
    }

    /// Whether the encoding reads `rs1`.
    pub fn uses_rs1(&self) -> bool {
        matches!(self.format, Format::R | Format::I | Format::S | Format::B)
    }

    /// Whether the encoding reads `rs2`.
    pub fn uses_rs2(&self) -> bool {
        matches!(self.format, Format::R | Format::S | Format::B)
    }

    /// Whether this instruction produces a register result.
    ///
    /// Stores and conditional branches have no destination; a destination of
    /// `x0` also counts as no result.
    pub fn writes_rd(&self) -> bool {
        !matches!(self.format, Format::S | Format::B) && !self.rd.is_zero()
    }

    /// Whether this is a load (any width, either extension).
    pub fn is_load(&self) -> bool {
        matches!(self.op, Op::Lb | Op::Lh | Op::Lw | Op::Lbu | Op::Lhu)
    }

    /// Whether this load sign-extends its result at writeback.
    pub fn is_sign_extended_load(&self) -> bool {
        matches!(self.op, Op::Lb | Op::Lh | Op::Lw)
    }

    /// Whether this is a store.
    pub fn is_store(&self) -> bool {
        matches!(self.op, Op::Sb | Op::Sh | Op::Sw)
    }

    /// Whether this is a conditional branch.
    pub fn is_branch(&self) -> bool {
        self.format == Format::B
    }

    /// Whether this is an unconditional jump (jal or jalr).
    pub fn is_jump(&self) -> bool {
        matches!(self.op, Op::Jal | Op::Jalr)
    }

    /// Whether control flow leaves the fall-through path after execution.
    pub fn redirects(&self) -> bool {
        self.new_pc != self.pc.wrapping_add(4)
    }

    /// Whether [`execute`](Self::execute) has already run on this instruction.
    ///
    /// Held instructions must not re-execute while a latch stalls.
    pub fn is_executed(&self) -> bool {
        self.executed
    }

    pub(crate) fn set_rs1_v(&mut self, value: u32) {
        self.rs1_v = value;
    }

    pub(crate) fn set_rs2_v(&mut self, value: u32) {
        self.rs2_v = value;
    }

    /// First operand value as read or forwarded at decode.
    pub fn rs1_v(&self) -> u32 {
        self.rs1_v
    }

    /// Second operand value as read or forwarded at decode.
    pub fn rs2_v(&self) -> u32 {
        self.rs2_v
    }

    pub(crate) fn set_rd_v(&mut self, value: u32) {
        self.rd_v = value;
    }

    /// Result value (ALU output, link address, or loaded data).
    pub fn rd_v(&self) -> u32 {
        self.rd_v
    }

    /// Effective address computed at execute, valid for loads and stores.
    pub fn mem_addr(&self) -> u32 {
        self.mem_addr
    }

    /// Memory access width in bytes, zero for non-memory instructions.
    pub fn mem_size(&self) -> u32 {
        self.mem_size
    }

    /// The value this instruction commits to `rd`.
    ///
    /// Narrow signed loads sign-extend here; everything else passes `rd_v`
    /// through. The memory-stage bypass uses the same value so a forwarded
    /// operand always equals the committed one.
    pub fn writeback_value(&self) -> u32 {
        if self.is_sign_extended_load() && self.mem_size < 4 {
            let bits = 8 * self.mem_size;
            let shift = 32 - bits;
            (((self.rd_v << shift) as i32) >> shift) as u32
        } else {
            self.rd_v
        }
    }

    pub(crate) fn set_new_pc(&mut self, target: u32) {
        self.new_pc = target;
    }

    pub(crate) fn set_mem_addr(&mut self, addr: u32) {
        self.mem_addr = addr;
    }

    pub(crate) fn mark_executed(&mut self) {
        self.executed = true;
    }
}

impl fmt::Display for Instruction {
    /// Renders a disassembly line, e.g. `addi t0, zero, 0x5`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ", self.op.mnemonic())?;
        match self.format {
            Format::R => write!(f, "{}, {}, {}", self.rd, self.rs1, self.rs2),
            Format::I => write!(f, "{}, {}, {:#x}", self.rd, self.rs1, self.imm),
            Format::S | Format::B => {
                write!(f, "{}, {}, {:#x}", self.rs1, self.rs2, self.imm)
            }
            Format::U | Format::J => write!(f, "{}, {:#x}", self.rd, self.imm),
        }
    }
}
