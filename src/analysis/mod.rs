//! Tools that run an engine repeatedly to compare configurations.

pub mod averaging;
pub mod sweep;

pub use averaging::{average_runs, AveragedHistory};
pub use sweep::{RateRange, RateSweep, SweepCell, SweepResult};
