//! Cross-indicator analysis modules.
//!
//! Statistics and quality checks computed over a whole collected snapshot,
//! as opposed to the per-series figures in [`crate::summary`].

pub mod aggregator;
pub mod quality;

pub use aggregator::*;
pub use quality::data_quality_report;
