//! Report rendering.

pub mod generator;

pub use generator::{write_data, write_report};
