//! Pipeline latch discipline tests.
//!
//! A latch exposes only what was clocked in: intra-cycle writes stay in the
//! pending slot, stalls (skipped clocks) keep the current instruction
//! visible, and ownership moves with `take`/`restore`.

use pipesim_core::core::pipeline::{Latch, Latches};
use pipesim_core::isa::decode;

use crate::common::encode;

fn bubble_free_instr() -> pipesim_core::isa::Instruction {
    decode(encode::addi(5, 0, 1), 0).unwrap()
}

#[test]
fn writes_are_invisible_until_clocked() {
    let mut latch = Latch::default();
    latch.write(bubble_free_instr());
    assert!(latch.current().is_none());
    assert!(!latch.is_empty());

    latch.clock();
    assert!(latch.current().is_some());
}

#[test]
fn clock_with_empty_pending_inserts_a_bubble() {
    let mut latch = Latch::default();
    latch.write(bubble_free_instr());
    latch.clock();
    assert!(latch.current().is_some());

    // Upstream produced nothing this cycle.
    latch.clock();
    assert!(latch.current().is_none());
    assert!(latch.is_empty());
}

#[test]
fn skipped_clock_keeps_the_instruction_visible() {
    let mut latch = Latch::default();
    latch.write(bubble_free_instr());
    latch.clock();

    // Stall: the stage takes, decides to hold, restores, and the boundary
    // skips its clock. Next cycle sees the same instruction.
    let instr = latch.take().unwrap();
    let pc = instr.pc();
    latch.restore(instr);
    assert_eq!(latch.current().unwrap().pc(), pc);
}

#[test]
fn take_moves_ownership_out() {
    let mut latch = Latch::default();
    latch.write(bubble_free_instr());
    latch.clock();

    assert!(latch.take().is_some());
    assert!(latch.take().is_none());
    assert!(latch.is_empty());
}

#[test]
fn all_empty_reflects_every_slot() {
    let mut latches = Latches::default();
    assert!(latches.all_empty());

    latches.execute_memory.write(bubble_free_instr());
    assert!(!latches.all_empty());

    latches.execute_memory.clock();
    assert!(!latches.all_empty());

    let _ = latches.execute_memory.take();
    assert!(latches.all_empty());
}
