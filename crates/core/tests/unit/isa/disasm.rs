//! Disassembly rendering tests.
//!
//! The `Display` impl backs the trace output and the per-cycle snapshot, so
//! the format is pinned down here.

use pipesim_core::isa::decode;
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::encode;

#[rstest]
#[case(encode::add(6, 5, 7), "add t1, t0, t2")]
#[case(encode::sub(10, 11, 12), "sub a0, a1, a2")]
#[case(encode::addi(5, 0, 5), "addi t0, zero, 0x5")]
#[case(encode::jalr(1, 5, 0), "jalr ra, t0, 0x0")]
#[case(encode::lw(5, 2, 8), "lw t0, sp, 0x8")]
#[case(encode::sw(5, 2, 8), "sw sp, t0, 0x8")]
#[case(encode::beq(5, 6, 16), "beq t0, t1, 0x10")]
#[case(encode::lui(10, 0x12345), "lui a0, 0x12345000")]
#[case(encode::jal(1, 2048), "jal ra, 0x800")]
fn renders_abi_names_and_hex_immediates(#[case] word: u32, #[case] expected: &str) {
    let instr = decode(word, 0).unwrap();
    assert_eq!(instr.to_string(), expected);
}

#[test]
fn every_table_entry_has_a_mnemonic() {
    // One representative word per opcode family; the mnemonic leads the
    // rendering for all of them.
    for (word, mnemonic) in [
        (encode::lui(1, 1), "lui"),
        (encode::auipc(1, 1), "auipc"),
        (encode::jal(1, 8), "jal"),
        (encode::jalr(1, 1, 0), "jalr"),
        (encode::beq(1, 2, 8), "beq"),
        (encode::lb(1, 2, 0), "lb"),
        (encode::lhu(1, 2, 0), "lhu"),
        (encode::sb(1, 2, 0), "sb"),
        (encode::andi(1, 2, 1), "andi"),
        (encode::srai(1, 2, 1), "srai"),
        (encode::sltu(1, 2, 3), "sltu"),
    ] {
        let instr = decode(word, 0).unwrap();
        assert!(
            instr.to_string().starts_with(mnemonic),
            "expected {mnemonic}, got {instr}"
        );
    }
}
