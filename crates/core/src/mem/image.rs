//! Flat little-endian byte image of the simulated address space.

use std::fmt;

use crate::common::SimError;

/// The simulated address space as one contiguous byte array.
///
/// All accesses are little-endian and range-checked; the pipeline surfaces a
/// violation as [`SimError::OutOfRange`] rather than wrapping or panicking.
/// Word-granularity access goes through [`MemoryImage::read`] and
/// [`MemoryImage::write`] (at most 4 bytes); line transfers of any width go
/// through the slice methods.
#[derive(Clone)]
pub struct MemoryImage {
    data: Vec<u8>,
}

impl fmt::Debug for MemoryImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryImage")
            .field("len", &self.data.len())
            .finish()
    }
}

impl MemoryImage {
    /// Creates a zero-filled image of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0; size],
        }
    }

    /// Size of the address space in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image has zero size.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Initial stack pointer: the last 32-byte-aligned address in the image.
    pub fn stack_pointer(&self) -> u32 {
        ((self.data.len() - 1) & !31) as u32
    }

    fn check(&self, addr: u32, num_bytes: u32) -> Result<(), SimError> {
        let end = u64::from(addr) + u64::from(num_bytes);
        if end > self.data.len() as u64 {
            return Err(SimError::OutOfRange {
                addr,
                size: num_bytes,
                len: self.data.len(),
            });
        }
        Ok(())
    }

    /// Reads `num_bytes` starting at `addr`, little-endian.
    ///
    /// The value is carried in a `u32`, so `num_bytes` must be at most 4;
    /// wider transfers use [`MemoryImage::read_into`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the access overruns the image.
    pub fn read(&self, addr: u32, num_bytes: u32) -> Result<u32, SimError> {
        debug_assert!(num_bytes <= 4, "word read of {num_bytes} bytes");
        self.check(addr, num_bytes)?;
        let mut value: u32 = 0;
        for i in 0..num_bytes {
            let byte = self.data[(addr + i) as usize];
            value |= u32::from(byte) << (8 * i);
        }
        Ok(value)
    }

    /// Writes the low `num_bytes` of `value` at `addr`, little-endian.
    ///
    /// The value is carried in a `u32`, so `num_bytes` must be at most 4;
    /// wider transfers use [`MemoryImage::write_from`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the access overruns the image.
    pub fn write(&mut self, value: u32, addr: u32, num_bytes: u32) -> Result<(), SimError> {
        debug_assert!(num_bytes <= 4, "word write of {num_bytes} bytes");
        self.check(addr, num_bytes)?;
        for i in 0..num_bytes {
            self.data[(addr + i) as usize] = (value >> (8 * i)) as u8;
        }
        Ok(())
    }

    /// Copies `buf.len()` bytes starting at `addr` into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the access overruns the image.
    pub fn read_into(&self, addr: u32, buf: &mut [u8]) -> Result<(), SimError> {
        self.check(addr, buf.len() as u32)?;
        let start = addr as usize;
        buf.copy_from_slice(&self.data[start..start + buf.len()]);
        Ok(())
    }

    /// Writes `bytes` starting at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OutOfRange`] when the access overruns the image.
    pub fn write_from(&mut self, addr: u32, bytes: &[u8]) -> Result<(), SimError> {
        self.check(addr, bytes.len() as u32)?;
        let start = addr as usize;
        self.data[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    /// Copies a program segment into the image at `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SegmentOutOfRange`] when the segment does not fit.
    pub fn load_segment(&mut self, addr: u32, bytes: &[u8]) -> Result<(), SimError> {
        let start = addr as usize;
        let end = start + bytes.len();
        if end > self.data.len() {
            return Err(SimError::SegmentOutOfRange {
                addr: u64::from(addr),
                end: end as u64,
                len: self.data.len(),
            });
        }
        self.data[start..end].copy_from_slice(bytes);
        Ok(())
    }
}
