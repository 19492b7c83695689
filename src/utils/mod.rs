//! Small helpers shared across the crate.

pub mod json_path;

pub use json_path::Probe;
