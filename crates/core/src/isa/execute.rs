//! Instruction execution semantics.
//!
//! [`Instruction::execute`] models the execute stage's combinational work:
//! ALU arithmetic, branch condition evaluation with target computation, and
//! effective address generation for loads and stores. Memory traffic and
//! register writeback happen in later stages.

use crate::isa::instruction::{Instruction, Op};

impl Instruction {
    /// Runs the execute-stage computation for this instruction.
    ///
    /// After this call `rd_v` holds the ALU result or link address, `new_pc`
    /// holds the resolved next PC, and loads/stores have `mem_addr` set. The
    /// call is idempotent-guarded by [`is_executed`](Self::is_executed);
    /// stages must not invoke it twice on a held instruction.
    pub fn execute(&mut self) {
        let a = self.rs1_v();
        let b = self.rs2_v();
        let imm = self.imm();
        let pc = self.pc();

        match self.op() {
            Op::Lui => self.set_rd_v(imm as u32),
            Op::Auipc => self.set_rd_v(pc.wrapping_add(imm as u32)),
            Op::Jal => {
                self.set_rd_v(pc.wrapping_add(4));
                self.set_new_pc(pc.wrapping_add(imm as u32));
            }
            Op::Jalr => {
                self.set_rd_v(pc.wrapping_add(4));
                self.set_new_pc(a.wrapping_add(imm as u32) & !1);
            }
            Op::Beq => self.resolve_branch(a == b),
            Op::Bne => self.resolve_branch(a != b),
            Op::Blt => self.resolve_branch((a as i32) < (b as i32)),
            Op::Bge => self.resolve_branch((a as i32) >= (b as i32)),
            Op::Bltu => self.resolve_branch(a < b),
            Op::Bgeu => self.resolve_branch(a >= b),
            Op::Lb | Op::Lh | Op::Lw | Op::Lbu | Op::Lhu => {
                self.set_mem_addr(a.wrapping_add(imm as u32));
            }
            Op::Sb | Op::Sh | Op::Sw => {
                self.set_mem_addr(a.wrapping_add(imm as u32));
                // The value to store rides in rd_v through the memory stage.
                self.set_rd_v(b);
            }
            Op::Addi => self.set_rd_v(a.wrapping_add(imm as u32)),
            Op::Slti => self.set_rd_v(u32::from((a as i32) < imm)),
            Op::Sltiu => self.set_rd_v(u32::from(a < imm as u32)),
            Op::Xori => self.set_rd_v(a ^ imm as u32),
            Op::Ori => self.set_rd_v(a | imm as u32),
            Op::Andi => self.set_rd_v(a & imm as u32),
            Op::Slli => self.set_rd_v(a << (imm as u32 & 0x1f)),
            Op::Srli => self.set_rd_v(a >> (imm as u32 & 0x1f)),
            Op::Srai => self.set_rd_v(((a as i32) >> (imm as u32 & 0x1f)) as u32),
            Op::Add => self.set_rd_v(a.wrapping_add(b)),
            Op::Sub => self.set_rd_v(a.wrapping_sub(b)),
            Op::Sll => self.set_rd_v(a << (b & 0x1f)),
            Op::Slt => self.set_rd_v(u32::from((a as i32) < (b as i32))),
            Op::Sltu => self.set_rd_v(u32::from(a < b)),
            Op::Xor => self.set_rd_v(a ^ b),
            Op::Srl => self.set_rd_v(a >> (b & 0x1f)),
            Op::Sra => self.set_rd_v(((a as i32) >> (b & 0x1f)) as u32),
            Op::Or => self.set_rd_v(a | b),
            Op::And => self.set_rd_v(a & b),
        }

        self.mark_executed();
    }

    fn resolve_branch(&mut self, taken: bool) {
        if taken {
            let target = self.pc().wrapping_add(self.imm() as u32);
            self.set_new_pc(target);
        }
    }
}
