//! RV32I instruction decoder.
//!
//! Decoding is a linear scan of a match/mask table followed by format-driven
//! field extraction. The table covers the full RV32I base set; anything that
//! misses every entry is a [`SimError::Decode`].

use crate::common::{Reg, SimError};
use crate::isa::instruction::{Format, Instruction, Op};

/// Total width of an instruction in bits.
const INSTRUCTION_WIDTH: u32 = 32;

struct IsaEntry {
    op: Op,
    format: Format,
    mtch: u32,
    mask: u32,
}

const fn e(op: Op, format: Format, mtch: u32, mask: u32) -> IsaEntry {
    IsaEntry {
        op,
        format,
        mtch,
        mask,
    }
}

/// The RV32I base set. Match/mask pairs follow the standard encodings.
#[rustfmt::skip]
const ISA_TABLE: &[IsaEntry] = &[
    e(Op::Lui,   Format::U, 0x0000_0037, 0x0000_007f),
    e(Op::Auipc, Format::U, 0x0000_0017, 0x0000_007f),
    e(Op::Jal,   Format::J, 0x0000_006f, 0x0000_007f),
    e(Op::Jalr,  Format::I, 0x0000_0067, 0x0000_707f),
    e(Op::Beq,   Format::B, 0x0000_0063, 0x0000_707f),
    e(Op::Bne,   Format::B, 0x0000_1063, 0x0000_707f),
    e(Op::Blt,   Format::B, 0x0000_4063, 0x0000_707f),
    e(Op::Bge,   Format::B, 0x0000_5063, 0x0000_707f),
    e(Op::Bltu,  Format::B, 0x0000_6063, 0x0000_707f),
    e(Op::Bgeu,  Format::B, 0x0000_7063, 0x0000_707f),
    e(Op::Lb,    Format::I, 0x0000_0003, 0x0000_707f),
    e(Op::Lh,    Format::I, 0x0000_1003, 0x0000_707f),
    e(Op::Lw,    Format::I, 0x0000_2003, 0x0000_707f),
    e(Op::Lbu,   Format::I, 0x0000_4003, 0x0000_707f),
    e(Op::Lhu,   Format::I, 0x0000_5003, 0x0000_707f),
    e(Op::Sb,    Format::S, 0x0000_0023, 0x0000_707f),
    e(Op::Sh,    Format::S, 0x0000_1023, 0x0000_707f),
    e(Op::Sw,    Format::S, 0x0000_2023, 0x0000_707f),
    e(Op::Addi,  Format::I, 0x0000_0013, 0x0000_707f),
    e(Op::Slti,  Format::I, 0x0000_2013, 0x0000_707f),
    e(Op::Sltiu, Format::I, 0x0000_3013, 0x0000_707f),
    e(Op::Xori,  Format::I, 0x0000_4013, 0x0000_707f),
    e(Op::Ori,   Format::I, 0x0000_6013, 0x0000_707f),
    e(Op::Andi,  Format::I, 0x0000_7013, 0x0000_707f),
    e(Op::Slli,  Format::I, 0x0000_1013, 0xfe00_707f),
    e(Op::Srli,  Format::I, 0x0000_5013, 0xfe00_707f),
    e(Op::Srai,  Format::I, 0x4000_5013, 0xfe00_707f),
    e(Op::Add,   Format::R, 0x0000_0033, 0xfe00_707f),
    e(Op::Sub,   Format::R, 0x4000_0033, 0xfe00_707f),
    e(Op::Sll,   Format::R, 0x0000_1033, 0xfe00_707f),
    e(Op::Slt,   Format::R, 0x0000_2033, 0xfe00_707f),
    e(Op::Sltu,  Format::R, 0x0000_3033, 0xfe00_707f),
    e(Op::Xor,   Format::R, 0x0000_4033, 0xfe00_707f),
    e(Op::Srl,   Format::R, 0x0000_5033, 0xfe00_707f),
    e(Op::Sra,   Format::R, 0x4000_5033, 0xfe00_707f),
    e(Op::Or,    Format::R, 0x0000_6033, 0xfe00_707f),
    e(Op::And,   Format::R, 0x0000_7033, 0xfe00_707f),
];

/// Decodes one 32-bit instruction word fetched from `pc`.
///
/// # Errors
///
/// Returns [`SimError::Decode`] when no table entry matches the word. A
/// zero word never reaches here; the fetch stage treats it as an empty slot.
pub fn decode(word: u32, pc: u32) -> Result<Instruction, SimError> {
    let entry = ISA_TABLE
        .iter()
        .find(|entry| word & entry.mask == entry.mtch)
        .ok_or(SimError::Decode { word, pc })?;

    let rd = Reg::new((word >> 7) & 0x1f);
    let rs1 = Reg::new((word >> 15) & 0x1f);
    let rs2 = Reg::new((word >> 20) & 0x1f);

    let imm = match entry.format {
        Format::R => 0,
        Format::I => decode_i_type_imm(word),
        Format::S => decode_s_type_imm(word),
        Format::B => decode_b_type_imm(word),
        Format::U => decode_u_type_imm(word),
        Format::J => decode_j_type_imm(word),
    };

    Ok(Instruction::new(
        entry.op,
        entry.format,
        rd,
        rs1,
        rs2,
        imm,
        pc,
    ))
}

/// I-type: `imm[11:0] | rs1 | funct3 | rd | opcode`.
fn decode_i_type_imm(word: u32) -> i32 {
    (word as i32) >> 20
}

/// S-type: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`.
fn decode_s_type_imm(word: u32) -> i32 {
    let low = (word >> 7) & 0x1f;
    let high = (word >> 25) & 0x7f;
    sign_extend((high << 5) | low, 12)
}

/// B-type: `imm[12] | imm[10:5] | rs2 | rs1 | funct3 | imm[4:1] | imm[11] | opcode`.
///
/// Bit 0 of the offset is always zero and not encoded.
fn decode_b_type_imm(word: u32) -> i32 {
    let bit_11 = (word >> 7) & 0x1;
    let bits_4_1 = (word >> 8) & 0xf;
    let bits_10_5 = (word >> 25) & 0x3f;
    let bit_12 = (word >> 31) & 0x1;

    let combined = (bit_12 << 12) | (bit_11 << 11) | (bits_10_5 << 5) | (bits_4_1 << 1);
    sign_extend(combined, 13)
}

/// U-type: `imm[31:12] | rd | opcode`. The low 12 bits are zero.
fn decode_u_type_imm(word: u32) -> i32 {
    (word & 0xffff_f000) as i32
}

/// J-type: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`.
fn decode_j_type_imm(word: u32) -> i32 {
    let bits_19_12 = (word >> 12) & 0xff;
    let bit_11 = (word >> 20) & 0x1;
    let bits_10_1 = (word >> 21) & 0x3ff;
    let bit_20 = (word >> 31) & 0x1;

    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, 21)
}

/// Sign extends a `bits`-wide value to 32 bits.
fn sign_extend(val: u32, bits: u32) -> i32 {
    let shift = INSTRUCTION_WIDTH - bits;
    ((val as i32) << shift) >> shift
}
