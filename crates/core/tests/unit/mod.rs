//! Unit tests for the simulator components.





/// Tests for the memory image, the timed backing store, and the caches.
pub mod mem;


/// Tests for statistics accounting and report formatting.
pub mod stats_reporting;
