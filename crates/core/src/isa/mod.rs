//! RV32I instruction set support.
//!
//! This module owns everything the pipeline knows about instructions:
//! 1. **Decoding:** Match/mask lookup of 32-bit words into [`Instruction`]s.
//! 2. **Execution:** ALU, branch, and address-generation semantics.
//! 3. **Classification:** Format and operation predicates the hazard and
//!    forwarding units rely on.

pub mod decode;
pub mod execute;
pub mod instruction;

pub use decode::decode;
pub use instruction::{Format, Instruction, Op};
