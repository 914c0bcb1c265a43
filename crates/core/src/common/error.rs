//! Fatal-error taxonomy.
//!
//! Every error here aborts the run: the simulator never reports partial
//! architectural state as success. The taxonomy distinguishes:
//! 1. **Decode failures:** A fetched word matches no opcode table entry.
//! 2. **Out-of-range accesses:** An address/size pair outside the backing
//!    store, or an access straddling a cache line boundary.
//! 3. **Invalid register reads:** The simulated program read a register that
//!    was never written (a programming-model error, not a simulator bug).
//! 4. **Load failures:** The program image could not be read or parsed.
//!
//! Single-port contention violations are *not* errors: issuing a request to a
//! busy cache or backing store indicates a core bug and is checked with
//! assertions instead.

use thiserror::Error;

use super::reg::Reg;

/// A fatal simulation failure.
#[derive(Debug, Error)]
pub enum SimError {
    /// A later error annotated with the cycle at which it occurred.
    #[error("cycle {cycle}: {source}")]
    AtCycle {
        /// Cycle count when the error surfaced.
        cycle: u64,
        /// The underlying failure.
        #[source]
        source: Box<SimError>,
    },

    /// A fetched word matched no opcode table entry.
    #[error("no opcode entry matches word {word:#010x} fetched at pc {pc:#010x}")]
    Decode {
        /// The raw instruction word.
        word: u32,
        /// Program counter of the fetch.
        pc: u32,
    },

    /// An address/size pair fell outside the backing store.
    #[error("memory access out of range: {size} byte(s) at {addr:#010x} (image is {len:#x} bytes)")]
    OutOfRange {
        /// Faulting address.
        addr: u32,
        /// Access width in bytes.
        size: u32,
        /// Backing store size in bytes.
        len: usize,
    },

    /// A data or fetch access straddled a cache line boundary.
    #[error("misaligned {size}-byte access at {addr:#010x} crosses a cache line boundary")]
    Misaligned {
        /// Faulting address.
        addr: u32,
        /// Access width in bytes.
        size: u32,
    },

    /// The simulated program read a register before any write made it valid.
    #[error("read of invalid register {reg} by instruction at pc {pc:#010x}")]
    InvalidRegister {
        /// The uninitialized register.
        reg: Reg,
        /// Program counter of the reading instruction.
        pc: u32,
    },

    /// The program image file could not be read.
    #[error("failed to read program image")]
    Io(#[from] std::io::Error),

    /// The program image is a malformed ELF executable.
    #[error("malformed ELF executable")]
    Elf(#[from] object::Error),

    /// A loadable segment does not fit the simulated address space.
    #[error("segment at {addr:#010x}..{end:#010x} does not fit the {len:#x}-byte address space")]
    SegmentOutOfRange {
        /// Segment start address.
        addr: u64,
        /// Segment end address (exclusive).
        end: u64,
        /// Simulated address space size.
        len: usize,
    },
}

impl SimError {
    /// Wraps the error with the cycle count at which it surfaced.
    pub fn at_cycle(self, cycle: u64) -> Self {
        Self::AtCycle {
            cycle,
            source: Box::new(self),
        }
    }
}
