//! Fetch stage: instruction-cache access and PC sequencing.
//!
//! Fetch predicts PC+4 (static not-taken). A pending flush redirects the PC
//! before anything else; a fetched word of all zeros is an empty slot, not a
//! decode error, and leaves the PC in place so a drained program idles.

use tracing::trace;

use crate::common::SimError;
use crate::core::pipeline::Pipeline;
use crate::isa;

pub(crate) fn run(p: &mut Pipeline) -> Result<(), SimError> {
    if let Some(target) = p.hazards.redirect_target() {
        // Any in-flight request is for the wrong path; the cache finishes
        // it on its own and the busy check below delays re-issue.
        p.fetch_state.awaiting = false;
        p.fetch_state.pc = target;
        p.snapshot.fetch.flushed = true;
        trace!(stage = "fetch", target = format_args!("{target:#010x}"), "redirect");
    }

    if p.hazards.fd_stall {
        p.snapshot.fetch.stalled = true;
        return Ok(());
    }

    if p.mem.is_icache_busy() {
        p.hazards.set_fetch_stall();
        p.pipe_active = true;
        p.snapshot.fetch.waiting_cache = true;
        return Ok(());
    }

    let pc = p.fetch_state.pc;
    let Some(word) = p.mem.fetch(&mut p.fetch_state.awaiting, pc)? else {
        p.hazards.set_fetch_stall();
        p.pipe_active = true;
        p.snapshot.fetch.waiting_cache = true;
        return Ok(());
    };

    if word == 0 {
        // Ran off the end of the program: keep fetching the empty word
        // until the back of the pipeline drains.
        return Ok(());
    }

    let instr = isa::decode(word, pc)?;
    trace!(stage = "fetch", pc = format_args!("{pc:#010x}"), %instr, "fetched");
    p.pipe_active = true;
    p.stats.instructions_fetched += 1;
    p.snapshot.fetch.record(pc, instr.to_string());
    p.latches.fetch_decode.write(instr);
    p.fetch_state.pc = pc.wrapping_add(4);
    Ok(())
}
