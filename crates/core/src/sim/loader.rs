//! Loads guest programs into a [`MemoryImage`].
//!
//! Two formats are accepted: RV32 ELF executables, from which the entry point
//! and every loadable segment are taken, and raw flat binaries, which are
//! copied to a caller-supplied load address.

use std::fs;
use std::path::Path;

use object::{Object, ObjectSegment};
use tracing::debug;

use crate::common::SimError;
use crate::mem::MemoryImage;

/// A program placed in memory, ready to run.
#[derive(Debug)]
pub struct Program {
    /// Memory with every segment copied in.
    pub image: MemoryImage,
    /// Address of the first instruction.
    pub entry: u32,
}

/// Loads `path` into a fresh image of `mem_size` bytes.
///
/// Files starting with the ELF magic are parsed as executables; anything else
/// is treated as a flat binary loaded at `flat_entry` (address zero when the
/// caller gives none).
///
/// # Errors
///
/// Returns [`SimError::Io`] when the file cannot be read, [`SimError::Elf`]
/// when ELF parsing fails, and [`SimError::SegmentOutOfRange`] when a segment
/// does not fit in the image.
pub fn load_program(
    path: &Path,
    mem_size: usize,
    flat_entry: Option<u32>,
) -> Result<Program, SimError> {
    let bytes = fs::read(path)?;
    if bytes.starts_with(&ELF_MAGIC) {
        load_elf(&bytes, mem_size)
    } else {
        load_flat(&bytes, mem_size, flat_entry.unwrap_or(0))
    }
}

const ELF_MAGIC: [u8; 4] = [0x7f, b'E', b'L', b'F'];

fn load_elf(bytes: &[u8], mem_size: usize) -> Result<Program, SimError> {
    let file = object::File::parse(bytes)?;
    let entry = file.entry() as u32;
    let mut image = MemoryImage::new(mem_size);
    for segment in file.segments() {
        let addr = segment.address() as u32;
        let data = segment.data()?;
        if data.is_empty() {
            continue;
        }
        debug!(
            addr = format_args!("{addr:#010x}"),
            len = data.len(),
            "loading segment"
        );
        image.load_segment(addr, data)?;
    }
    debug!(entry = format_args!("{entry:#010x}"), "loaded elf");
    Ok(Program { image, entry })
}

fn load_flat(bytes: &[u8], mem_size: usize, entry: u32) -> Result<Program, SimError> {
    let mut image = MemoryImage::new(mem_size);
    image.load_segment(entry, bytes)?;
    debug!(
        entry = format_args!("{entry:#010x}"),
        len = bytes.len(),
        "loaded flat binary"
    );
    Ok(Program { image, entry })
}
