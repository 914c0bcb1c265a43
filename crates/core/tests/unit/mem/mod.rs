//! Memory hierarchy tests.

pub mod cache;
