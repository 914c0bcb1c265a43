//! Program loader tests.
//!
//! Flat binaries and error paths are covered directly; ELF parsing is
//! exercised through a minimal hand-assembled RV32 executable.

use std::io::Write;

use pipesim_core::common::SimError;
use pipesim_core::sim::load_program;
use tempfile::NamedTempFile;

use crate::common::encode;

#[test]
fn flat_binary_loads_at_the_given_entry() {
    let words = [encode::addi(5, 0, 1), encode::addi(6, 0, 2)];
    let mut bytes = Vec::new();
    for word in words {
        bytes.extend_from_slice(&word.to_le_bytes());
    }

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&bytes).unwrap();

    let program = load_program(file.path(), 1 << 16, Some(0x100)).unwrap();
    assert_eq!(program.entry, 0x100);
    assert_eq!(program.image.read(0x100, 4).unwrap(), words[0]);
    assert_eq!(program.image.read(0x104, 4).unwrap(), words[1]);
    // Everything around the program stays zero.
    assert_eq!(program.image.read(0xfc, 4).unwrap(), 0);
    assert_eq!(program.image.read(0x108, 4).unwrap(), 0);
}

#[test]
fn flat_binary_defaults_to_entry_zero() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&encode::addi(5, 0, 7).to_le_bytes()).unwrap();

    let program = load_program(file.path(), 1 << 16, None).unwrap();
    assert_eq!(program.entry, 0);
    assert_eq!(program.image.read(0, 4).unwrap(), encode::addi(5, 0, 7));
}

#[test]
fn missing_file_is_an_io_error() {
    let err = load_program(std::path::Path::new("/nonexistent/program.bin"), 1 << 16, None)
        .unwrap_err();
    assert!(matches!(err, SimError::Io(_)));
}

#[test]
fn oversized_flat_binary_is_rejected() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0u8; 64]).unwrap();

    let err = load_program(file.path(), 32, None).unwrap_err();
    assert!(matches!(err, SimError::SegmentOutOfRange { .. }));
}

#[test]
fn truncated_elf_is_a_parse_error() {
    // The ELF magic routes the file down the ELF path; the rest of the
    // header is missing.
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&[0x7f, b'E', b'L', b'F']).unwrap();

    let err = load_program(file.path(), 1 << 16, None).unwrap_err();
    assert!(matches!(err, SimError::Elf(_)));
}

#[test]
fn minimal_elf_loads_segment_and_entry() {
    let code = encode::addi(5, 0, 9).to_le_bytes();
    let elf = build_elf32(0x1000, &code);

    let mut file = NamedTempFile::new().unwrap();
    file.write_all(&elf).unwrap();

    let program = load_program(file.path(), 1 << 16, None).unwrap();
    assert_eq!(program.entry, 0x1000);
    assert_eq!(program.image.read(0x1000, 4).unwrap(), encode::addi(5, 0, 9));
}

/// Assembles a minimal little-endian ELF32 executable: one program header
/// describing one PT_LOAD segment at `vaddr`, entry at `vaddr`.
fn build_elf32(vaddr: u32, payload: &[u8]) -> Vec<u8> {
    let ehsize: u32 = 52;
    let phentsize: u32 = 32;
    let offset = ehsize + phentsize; // payload right after the headers

    let mut out = Vec::new();
    // e_ident
    out.extend_from_slice(&[0x7f, b'E', b'L', b'F', 1, 1, 1, 0]);
    out.extend_from_slice(&[0; 8]);
    out.extend_from_slice(&2u16.to_le_bytes()); // e_type = EXEC
    out.extend_from_slice(&0xf3u16.to_le_bytes()); // e_machine = RISC-V
    out.extend_from_slice(&1u32.to_le_bytes()); // e_version
    out.extend_from_slice(&vaddr.to_le_bytes()); // e_entry
    out.extend_from_slice(&ehsize.to_le_bytes()); // e_phoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_shoff
    out.extend_from_slice(&0u32.to_le_bytes()); // e_flags
    out.extend_from_slice(&(ehsize as u16).to_le_bytes()); // e_ehsize
    out.extend_from_slice(&(phentsize as u16).to_le_bytes()); // e_phentsize
    out.extend_from_slice(&1u16.to_le_bytes()); // e_phnum
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shentsize
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shnum
    out.extend_from_slice(&0u16.to_le_bytes()); // e_shstrndx

    // Program header: PT_LOAD
    out.extend_from_slice(&1u32.to_le_bytes()); // p_type
    out.extend_from_slice(&offset.to_le_bytes()); // p_offset
    out.extend_from_slice(&vaddr.to_le_bytes()); // p_vaddr
    out.extend_from_slice(&vaddr.to_le_bytes()); // p_paddr
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes()); // p_filesz
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes()); // p_memsz
    out.extend_from_slice(&5u32.to_le_bytes()); // p_flags = R+X
    out.extend_from_slice(&4u32.to_le_bytes()); // p_align

    out.extend_from_slice(payload);
    out
}
