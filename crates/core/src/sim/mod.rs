//! Program loading and the reference simulator.

pub mod loader;
pub mod refsim;

pub use loader::{load_program, Program};
pub use refsim::RefSim;
