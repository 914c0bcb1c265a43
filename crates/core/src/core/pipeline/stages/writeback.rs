//! Writeback stage: commit and retire.

use tracing::trace;

use crate::core::pipeline::Pipeline;

pub(crate) fn run(p: &mut Pipeline) {
    let Some(instr) = p.latches.memory_writeback.take() else {
        return;
    };
    p.pipe_active = true;
    p.snapshot.writeback.record(instr.pc(), instr.to_string());
    trace!(stage = "wb", pc = format_args!("{:#010x}", instr.pc()), %instr, "retire");

    p.rf.writeback(&instr);
    p.stats.instructions_retired += 1;
    if instr.is_load() {
        p.stats.inst_load += 1;
    } else if instr.is_store() {
        p.stats.inst_store += 1;
    } else if instr.is_branch() || instr.is_jump() {
        p.stats.inst_branch += 1;
    } else {
        p.stats.inst_alu += 1;
    }
}
