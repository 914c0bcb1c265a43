//! Architectural register identifiers.
//!
//! RV32I names 32 general-purpose registers `x0`..`x31`; `x0` is hardwired to
//! zero. `Reg` is a validated 5-bit index that displays as the RISC-V ABI
//! mnemonic (`zero`, `ra`, `sp`, ...), which keeps disassembly, traces, and
//! error messages readable.

use std::fmt;

/// Number of architectural registers.
pub const REG_COUNT: usize = 32;

/// ABI mnemonics indexed by register number.
const ABI_NAMES: [&str; REG_COUNT] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// An architectural register number (0..=31).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Reg(u8);

impl Reg {
    /// The hardwired zero register `x0`.
    pub const ZERO: Self = Self(0);
    /// Return address register `x1`.
    pub const RA: Self = Self(1);
    /// Stack pointer register `x2`.
    pub const SP: Self = Self(2);
    /// Saved/frame register `x8`.
    pub const S0: Self = Self(8);
    /// Saved register `x9`.
    pub const S1: Self = Self(9);
    /// Saved register `x18`.
    pub const S2: Self = Self(18);
    /// Saved register `x19`.
    pub const S3: Self = Self(19);

    /// Builds a register identifier from a raw 5-bit field.
    ///
    /// # Panics
    ///
    /// Panics if `index` does not fit in 5 bits; decode extracts register
    /// fields with a 5-bit mask, so this cannot fire on decoded input.
    pub fn new(index: u32) -> Self {
        assert!(
            (index as usize) < REG_COUNT,
            "register index {index} out of range"
        );
        Self(index as u8)
    }

    /// Register number as a table index.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Whether this is the hardwired zero register.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// The RISC-V ABI mnemonic for this register.
    pub fn name(self) -> &'static str {
        ABI_NAMES[self.index()]
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
