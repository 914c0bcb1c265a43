//! Reference simulator tests.

use pipesim_core::common::Reg;
use pipesim_core::mem::MemoryImage;
use pipesim_core::RefSim;

use crate::common::encode;

fn image_with(program: &[u32]) -> MemoryImage {
    let mut image = MemoryImage::new(1 << 16);
    for (i, word) in program.iter().enumerate() {
        image.write(*word, (i * 4) as u32, 4).unwrap();
    }
    image
}

#[test]
fn steps_one_instruction_at_a_time() {
    let image = image_with(&[encode::addi(5, 0, 3), encode::addi(6, 5, 4)]);
    let mut sim = RefSim::new(image, 0);

    assert!(sim.step().unwrap());
    assert_eq!(sim.pc(), 4);
    assert_eq!(sim.register_file().peek(Reg::new(5)), 3);

    assert!(sim.step().unwrap());
    assert_eq!(sim.register_file().peek(Reg::new(6)), 7);

    // The zero word past the program ends the run.
    assert!(!sim.step().unwrap());
    assert_eq!(sim.retired(), 2);
}

#[test]
fn follows_taken_branches() {
    let image = image_with(&[
        encode::addi(5, 0, 1),
        encode::beq(5, 5, 12),   // 0x04 -> 0x10
        encode::addi(6, 0, 99),  // never executed
        encode::addi(7, 0, 99),  // never executed
        encode::addi(28, 0, 7),  // 0x10
    ]);
    let mut sim = RefSim::new(image, 0);
    let retired = sim.run(1_000).unwrap();

    assert_eq!(retired, 3);
    assert_eq!(sim.register_file().peek(Reg::new(28)), 7);
    assert!(!sim.register_file().is_valid(Reg::new(6)));
}

#[test]
fn loads_and_stores_hit_memory_directly() {
    let image = image_with(&[
        encode::addi(5, 0, -2),
        encode::addi(6, 0, 512),
        encode::sw(5, 6, 0),
        encode::lw(7, 6, 0),
        encode::lb(28, 6, 0),    // sign-extended low byte
    ]);
    let mut sim = RefSim::new(image, 0);
    sim.run(1_000).unwrap();

    assert_eq!(sim.memory().read(512, 4).unwrap(), 0xffff_fffe);
    assert_eq!(sim.register_file().peek(Reg::new(7)), 0xffff_fffe);
    assert_eq!(sim.register_file().peek(Reg::new(28)), 0xffff_fffe);
}

#[test]
fn boot_seeding_matches_the_pipeline() {
    let image = image_with(&[]);
    let sp = image.stack_pointer();
    let sim = RefSim::new(image, 0);

    assert_eq!(sim.register_file().peek(Reg::SP), sp);
    for reg in [Reg::RA, Reg::S0, Reg::S1, Reg::S2, Reg::S3] {
        assert!(sim.register_file().is_valid(reg));
    }
}

#[test]
fn invalid_register_reads_are_errors_here_too() {
    let image = image_with(&[encode::add(5, 6, 7)]);
    let mut sim = RefSim::new(image, 0);
    assert!(sim.step().is_err());
}

#[test]
fn step_budget_bounds_the_run() {
    let image = image_with(&[encode::beq(0, 0, 0)]);
    // A zero-offset branch spins on itself forever.
    let mut sim = RefSim::new(image, 0);
    let retired = sim.run(50).unwrap();
    assert_eq!(retired, 50);
}
