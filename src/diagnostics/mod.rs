//! Reports describing a training run.
//!
//! `TrainingReport` is returned by the trainer: how many stages were
//! produced, why the loop stopped, the per-stage sample statistics, and a
//! timing breakdown.

pub mod timing;
pub mod training;

pub use timing::{format_elapsed, StageTiming, TimingBreakdown};
pub use training::{StageReport, StopReason, TrainingReport};
