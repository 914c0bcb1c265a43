//! Memory stage: data-cache access and branch resolution.
//!
//! Loads and stores wider than the configured beat width are issued as
//! successive sub-requests; the execute-to-memory latch holds between
//! beats. Branches resolve here: any instruction whose computed next PC
//! differs from the fall-through raises the flush with its target.
//!
//! This stage also owns two pieces of hazard wire state: it clears last
//! cycle's flush/redirect at entry, and it masks the destination of a load
//! whose value is not yet available so decode stalls consumers instead of
//! forwarding garbage.

use tracing::trace;

use crate::common::SimError;
use crate::core::pipeline::Pipeline;

pub(crate) fn run(p: &mut Pipeline) -> Result<(), SimError> {
    p.hazards.begin_memory_stage();

    let Some(mut instr) = p.latches.execute_memory.take() else {
        return Ok(());
    };
    p.pipe_active = true;

    if instr.is_load() || instr.is_store() {
        let size = instr.mem_size();

        if p.mem.is_dcache_busy() {
            trace!(stage = "mem", pc = format_args!("{:#010x}", instr.pc()), "dcache busy");
            hold_for_memory(p, instr);
            return Ok(());
        }

        if !p.mem_state.awaiting {
            let offset = p.mem_state.beats_done * p.mem_beat_bytes;
            let addr = instr.mem_addr() + offset;
            let num_bytes = p.mem_beat_bytes.min(size - offset);
            if instr.is_load() {
                p.mem.process_load(addr, num_bytes)?;
            } else {
                p.mem.process_store(instr.rd_v() >> (8 * offset), addr, num_bytes)?;
            }
            p.mem_state.awaiting = true;
        }

        if let Some(data) = p.mem.memory_request_status() {
            if instr.is_load() {
                p.mem_state.value |= data << (8 * p.mem_state.beats_done * p.mem_beat_bytes);
            }
            p.mem_state.awaiting = false;
            p.mem_state.beats_done += 1;
        }

        let complete = p.mem_state.beats_done * p.mem_beat_bytes >= size;
        if !complete {
            hold_for_memory(p, instr);
            return Ok(());
        }
        if instr.is_load() {
            instr.set_rd_v(p.mem_state.value);
        }
        p.mem_state.beats_done = 0;
        p.mem_state.value = 0;
    }

    if instr.is_jump() || instr.is_branch() {
        if instr.redirects() {
            trace!(
                stage = "mem",
                pc = format_args!("{:#010x}", instr.pc()),
                target = format_args!("{:#010x}", instr.new_pc()),
                "redirect"
            );
            p.hazards.set_mispredict(instr.new_pc());
            p.stats.branch_mispredictions += 1;
        } else if instr.is_branch() {
            p.stats.branch_predictions += 1;
        }
    }

    // The value is final now; consumers in decode can take it this cycle.
    if instr.writes_rd() {
        p.forwarding.set_bypass_mem(instr.rd(), instr.writeback_value());
    }

    p.snapshot.memory.record(instr.pc(), instr.to_string());
    p.latches.memory_writeback.write(instr);
    Ok(())
}

/// Stalls the execute-to-memory boundary for one more cycle, keeping the
/// in-progress access's destination masked against consumers.
fn hold_for_memory(p: &mut Pipeline, instr: crate::isa::Instruction) {
    if instr.is_load() && instr.writes_rd() {
        p.hazards.mask_memory(instr.rd());
    }
    p.hazards.set_memory_stall();
    p.snapshot.memory.record(instr.pc(), instr.to_string());
    p.snapshot.memory.stalled = true;
    p.snapshot.memory.waiting_cache = true;
    p.latches.execute_memory.restore(instr);
}
