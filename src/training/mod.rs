//! Stage-by-stage cascade training.
//!
//! - [`params`] – counts, limits and stage hyperparameters of a run.
//! - `builder` – assembles the labeled samples for the next stage, keeping
//!   only windows the partial cascade still accepts.
//! - `trainer` – the stage loop and convergence check.

mod builder;
pub mod params;
mod trainer;

pub use builder::{BuildError, BuildOutcome, TrainingSet, TrainingSetBuilder};
pub use params::TrainingParams;
pub use trainer::{CascadeTrainer, TrainError};
