//! The backing side of the memory hierarchy.
//!
//! [`MemoryImage`] is the flat byte store holding the loaded program and its
//! data. [`BackingStore`] wraps an image with the timed single-request
//! protocol the caches talk to. [`MemoryUnit`] composes the store with the
//! instruction and data caches and is what the pipeline clocks each cycle.

pub mod image;
pub mod store;
pub mod unit;

pub use image::MemoryImage;
pub use store::BackingStore;
pub use unit::MemoryUnit;
