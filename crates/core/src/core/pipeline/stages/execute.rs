//! Execute stage: ALU work, branch targets, address generation.
//!
//! The stage executes its instruction at most once; when the downstream
//! boundary stalls, the already-executed instruction is held in the
//! decode-to-execute latch and only its hazard/bypass contribution is
//! re-armed each cycle.

use tracing::trace;

use crate::core::pipeline::Pipeline;

pub(crate) fn run(p: &mut Pipeline) {
    p.hazards.begin_execute_stage();

    let data = p.latches.decode_execute.take();

    if p.hazards.flush_pending() {
        if let Some(instr) = data {
            trace!(stage = "exe", pc = format_args!("{:#010x}", instr.pc()), "flushed");
            p.stats.instructions_flushed += 1;
            p.snapshot.execute.flushed = true;
        }
        return;
    }

    let Some(mut instr) = data else {
        return;
    };
    p.pipe_active = true;

    if !instr.is_executed() {
        instr.execute();
    }
    trace!(stage = "exe", pc = format_args!("{:#010x}", instr.pc()), %instr, "execute");

    // Loads have no value yet, so their destination is masked; every other
    // producer's result goes straight onto the bypass.
    if instr.writes_rd() {
        if instr.is_load() {
            p.hazards.mask_execute(instr.rd());
        } else {
            p.forwarding.set_bypass_exe(instr.rd(), instr.rd_v());
        }
    }

    p.snapshot.execute.record(instr.pc(), instr.to_string());

    if p.hazards.em_stall {
        p.hazards.de_stall = true;
        p.snapshot.execute.stalled = true;
        p.latches.decode_execute.restore(instr);
        return;
    }

    p.latches.execute_memory.write(instr);
}
