//! Single-cycle reference model for cross-checking the pipeline.

use crate::common::{Reg, SimError};
use crate::core::units::RegisterFile;
use crate::isa;
use crate::mem::MemoryImage;

/// Executes one instruction per step with no timing model.
///
/// The reference model shares the decode tables, execution semantics and
/// register validity rules with the pipeline, so after both drain on the same
/// program their architectural state must match exactly.
pub struct RefSim {
    image: MemoryImage,
    rf: RegisterFile,
    pc: u32,
    retired: u64,
}

impl RefSim {
    pub fn new(image: MemoryImage, entry: u32) -> Self {
        let mut rf = RegisterFile::new();
        rf.set_stack_pointer(image.stack_pointer());
        for reg in [Reg::RA, Reg::S0, Reg::S1, Reg::S2, Reg::S3] {
            rf.validate(reg);
        }
        Self {
            image,
            rf,
            pc: entry,
            retired: 0,
        }
    }

    /// Executes one instruction. Returns `Ok(false)` once the program ends,
    /// which the model recognises as an all-zero instruction word.
    ///
    /// # Errors
    ///
    /// Propagates decode, register validity and memory range errors.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let word = self.image.read(self.pc, 4)?;
        if word == 0 {
            return Ok(false);
        }
        let mut instr = isa::decode(word, self.pc)?;
        self.rf.read_sources(&mut instr, false, false)?;
        instr.execute();
        if instr.is_load() {
            let value = self.image.read(instr.mem_addr(), instr.mem_size())?;
            instr.set_rd_v(value);
        } else if instr.is_store() {
            self.image.write(instr.rd_v(), instr.mem_addr(), instr.mem_size())?;
        }
        self.rf.writeback(&instr);
        self.retired += 1;
        self.pc = instr.new_pc();
        Ok(true)
    }

    /// Runs until the program ends or `max_steps` instructions have retired.
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Self::step`].
    pub fn run(&mut self, max_steps: u64) -> Result<u64, SimError> {
        while self.retired < max_steps {
            if !self.step()? {
                break;
            }
        }
        Ok(self.retired)
    }

    pub fn register_file(&self) -> &RegisterFile {
        &self.rf
    }

    pub fn memory(&self) -> &MemoryImage {
        &self.image
    }

    pub fn pc(&self) -> u32 {
        self.pc
    }

    pub fn retired(&self) -> u64 {
        self.retired
    }
}
