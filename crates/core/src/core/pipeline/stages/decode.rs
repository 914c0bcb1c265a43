//! Decode stage: operand gathering and data-hazard detection.
//!
//! Forwarding applies first; only operands no bypass covers are checked
//! against the pending-register masks and then read from the register file.
//! A pending (non-forwardable) source stalls decode and bubbles execute.

use tracing::trace;

use crate::common::SimError;
use crate::core::pipeline::Pipeline;

pub(crate) fn run(p: &mut Pipeline) -> Result<(), SimError> {
    let data = p.latches.fetch_decode.take();

    // A stalled execute holds its instruction in the decode-to-execute
    // latch, so decode must hold too when it has one.
    if p.hazards.de_stall && data.is_some() {
        p.hazards.fd_stall = true;
    }

    if p.hazards.flush_pending() {
        if let Some(instr) = data {
            trace!(stage = "dec", pc = format_args!("{:#010x}", instr.pc()), "flushed");
            p.stats.instructions_flushed += 1;
            p.snapshot.decode.flushed = true;
        }
        return Ok(());
    }

    let Some(mut instr) = data else {
        return Ok(());
    };
    p.pipe_active = true;
    p.snapshot.decode.record(instr.pc(), instr.to_string());

    if p.hazards.de_stall {
        p.snapshot.decode.stalled = true;
        p.latches.fetch_decode.restore(instr);
        return Ok(());
    }

    let outcome = p.forwarding.read_sources(&mut instr);
    p.snapshot.decode.bypass = Some(outcome.class);

    let rs1_pending = instr.uses_rs1() && !outcome.rs1 && p.hazards.is_pending(instr.rs1());
    let rs2_pending = instr.uses_rs2() && !outcome.rs2 && p.hazards.is_pending(instr.rs2());
    if rs1_pending || rs2_pending {
        trace!(stage = "dec", pc = format_args!("{:#010x}", instr.pc()), "data hazard");
        p.hazards.set_data_stall();
        p.snapshot.decode.stalled = true;
        p.latches.fetch_decode.restore(instr);
        return Ok(());
    }

    p.rf.read_sources(&mut instr, outcome.rs1, outcome.rs2)?;
    trace!(
        stage = "dec",
        pc = format_args!("{:#010x}", instr.pc()),
        %instr,
        bypass = ?outcome.class,
        "issue"
    );
    p.latches.decode_execute.write(instr);
    Ok(())
}
