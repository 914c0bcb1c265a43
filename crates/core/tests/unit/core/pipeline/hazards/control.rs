//! Control hazard tests: static not-taken prediction, flush exactness,
//! and redirect targets.

use crate::common::encode;
use crate::common::harness::{boot, reg, reg_valid, run_to_drain};

#[test]
fn taken_branch_flushes_exactly_the_wrong_path() {
    let mut pipe = boot(&[
        encode::addi(5, 0, 1),    // 0x00
        encode::beq(5, 5, 12),    // 0x04: always taken, target 0x10
        encode::addi(6, 0, 99),   // 0x08: wrong path
        encode::addi(7, 0, 99),   // 0x0c: wrong path
        encode::addi(28, 0, 7),   // 0x10: branch target
    ]);
    let stats = run_to_drain(&mut pipe);

    // The two wrong-path slots die; nothing they would have written lands.
    assert!(!reg_valid(&pipe, 6));
    assert!(!reg_valid(&pipe, 7));
    assert_eq!(reg(&pipe, 28), 7);

    assert_eq!(stats.instructions_retired, 3);
    assert_eq!(stats.instructions_flushed, 2);
    assert_eq!(stats.instructions_fetched, 5);
    assert_eq!(stats.branch_mispredictions, 1);
    assert_eq!(stats.branch_predictions, 0);
}

#[test]
fn not_taken_branch_costs_nothing() {
    let mut pipe = boot(&[
        encode::addi(5, 0, 1),
        encode::bne(5, 5, 12),    // never taken
        encode::addi(6, 0, 2),
        encode::addi(7, 0, 3),
    ]);
    let stats = run_to_drain(&mut pipe);

    assert_eq!(reg(&pipe, 6), 2);
    assert_eq!(reg(&pipe, 7), 3);
    assert_eq!(stats.instructions_retired, 4);
    assert_eq!(stats.instructions_flushed, 0);
    assert_eq!(stats.branch_predictions, 1);
    assert_eq!(stats.branch_mispredictions, 0);
}

#[test]
fn backward_branch_builds_a_loop() {
    // x5 counts 3 down to 0; x6 accumulates.
    let mut pipe = boot(&[
        encode::addi(5, 0, 3),     // 0x00
        encode::addi(6, 0, 0),     // 0x04
        encode::add(6, 6, 5),      // 0x08: loop body
        encode::addi(5, 5, -1),    // 0x0c
        encode::bne(5, 0, -8),     // 0x10: back to 0x08
    ]);
    let stats = run_to_drain(&mut pipe);

    assert_eq!(reg(&pipe, 6), 6); // 3 + 2 + 1
    assert_eq!(reg(&pipe, 5), 0);
    // Two taken iterations, one fall-through.
    assert_eq!(stats.branch_mispredictions, 2);
    assert_eq!(stats.branch_predictions, 1);
}

#[test]
fn jal_and_jalr_redirect() {
    let mut pipe = boot(&[
        encode::addi(5, 0, 20),   // 0x00: address of the landing pad
        encode::jalr(1, 5, 0),    // 0x04: jump to 0x14, link 0x08
        encode::addi(6, 0, 99),   // 0x08: skipped
        encode::addi(7, 0, 99),   // 0x0c: skipped
        encode::addi(7, 0, 1),    // 0x10: skipped
        encode::addi(28, 1, 0),   // 0x14: copy the link address
    ]);
    let stats = run_to_drain(&mut pipe);

    assert_eq!(reg(&pipe, 28), 8);
    assert!(!reg_valid(&pipe, 6));
    assert_eq!(stats.branch_mispredictions, 1);
    assert_eq!(
        stats.instructions_fetched,
        stats.instructions_retired + stats.instructions_flushed
    );
}

#[test]
fn redirect_target_becomes_the_next_fetch_pc() {
    let mut pipe = boot(&[
        encode::addi(5, 0, 1),
        encode::beq(5, 5, 8),     // 0x04 -> 0x0c
        encode::addi(6, 0, 99),
        encode::addi(28, 0, 5),   // 0x0c
    ]);
    let stats = run_to_drain(&mut pipe);

    assert_eq!(reg(&pipe, 28), 5);
    assert!(!reg_valid(&pipe, 6));
    // The wrong-path slot dies, and so does the speculatively fetched copy
    // of the target itself; the refetched copy retires.
    assert_eq!(stats.instructions_flushed, 2);
    assert_eq!(stats.instructions_retired, 3);
}
